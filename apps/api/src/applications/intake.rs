//! Turns a submitted form into the initial `PipelineState`.
//!
//! Resume and description problems that make a run pointless are rejected
//! here, before any completion call is made.

use reqwest::Client;
use tracing::warn;

use crate::applications::form::{split_questions, split_skills, ApplicationForm};
use crate::errors::AppError;
use crate::extract::{extract_job_metadata, fetch_job_description, load_resume_text};
use crate::pipeline::{JobPosting, PipelineState, UserProfile};

/// Resumes shorter than this still run, with a warning.
pub const SHORT_RESUME_CHARS: usize = 50;

pub struct PreparedRun {
    pub state: PipelineState,
    pub resume_filename: Option<String>,
    pub warnings: Vec<String>,
}

pub async fn prepare_run(page_client: &Client, form: ApplicationForm) -> Result<PreparedRun, AppError> {
    let mut warnings = Vec::new();

    let (resume_text, resume_filename) = match &form.resume_file {
        Some(upload) => (
            load_resume_text(&upload.filename, upload.data.clone()).await?,
            Some(upload.filename.clone()),
        ),
        None => (form.resume_text.trim().to_string(), None),
    };

    let mut description = form.job_description.trim().to_string();
    let job_url = form.job_url.trim();
    if description.is_empty() && !job_url.is_empty() {
        match fetch_job_description(page_client, job_url).await {
            Ok(text) => description = text.trim().to_string(),
            Err(e) => {
                warn!("Job description fetch failed for {}: {}", job_url, e);
                warnings.push(format!(
                    "Could not fetch the job description from {job_url}: {e}. Paste it instead."
                ));
            }
        }
    }

    let state = build_state(&form, resume_text, description, &mut warnings)?;
    Ok(PreparedRun {
        state,
        resume_filename,
        warnings,
    })
}

/// Validates resolved texts and assembles the state. Blank job fields are
/// filled from the description when the heuristics find them.
pub fn build_state(
    form: &ApplicationForm,
    resume_text: String,
    description: String,
    warnings: &mut Vec<String>,
) -> Result<PipelineState, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text is empty. Upload a PDF/DOCX/TXT/MD resume or paste the text.".to_string(),
        ));
    }
    if resume_text.chars().count() < SHORT_RESUME_CHARS {
        warnings.push("Resume text looks very short; results may be poor.".to_string());
    }
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is empty. Paste it or provide a job URL.".to_string(),
        ));
    }

    let meta = extract_job_metadata(&description);
    let pick = |given: &str, found: Option<String>| {
        let given = given.trim();
        if given.is_empty() {
            found.unwrap_or_default()
        } else {
            given.to_string()
        }
    };

    let name = form.name.trim();
    let user = UserProfile {
        name: if name.is_empty() {
            UserProfile::default().name
        } else {
            name.to_string()
        },
        headline: form.headline.trim().to_string(),
        location: form.location.trim().to_string(),
        resume_text,
        key_skills: split_skills(&form.skills),
        constraints: form.constraints.trim().to_string(),
    };

    let job_url = form.job_url.trim();
    let job = JobPosting {
        title: pick(&form.job_title, meta.title),
        company: pick(&form.job_company, meta.company),
        location: pick(&form.job_location, meta.location),
        description,
        source_url: (!job_url.is_empty()).then(|| job_url.to_string()),
    };

    Ok(PipelineState::new(user, job, split_questions(&form.questions)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::form::ResumeUpload;
    use crate::extract::documents::tests::docx_bytes;

    const RESUME: &str = "Jane Doe. Five years building Python backend services on AWS and Postgres.";
    const JD: &str = "Job Title: Backend Engineer\nCompany: Acme\nLocation: Remote\nPython, AWS.";

    #[test]
    fn test_blank_job_fields_are_filled_from_description() {
        let mut warnings = Vec::new();
        let state = build_state(
            &ApplicationForm::default(),
            RESUME.to_string(),
            JD.to_string(),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(state.user.name, "Candidate");
        assert_eq!(state.job.title, "Backend Engineer");
        assert_eq!(state.job.company, "Acme");
        assert_eq!(state.job.location, "Remote");
        assert!(state.job.source_url.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_given_fields_win_over_heuristics() {
        let form = ApplicationForm {
            name: " Jane ".to_string(),
            job_title: "Staff Engineer".to_string(),
            skills: "Python, AWS".to_string(),
            questions: "Why Acme?\n\nWhat is your notice period?".to_string(),
            job_url: "https://jobs.example.com/1".to_string(),
            ..ApplicationForm::default()
        };
        let mut warnings = Vec::new();
        let state = build_state(&form, RESUME.to_string(), JD.to_string(), &mut warnings).unwrap();

        assert_eq!(state.user.name, "Jane");
        assert_eq!(state.job.title, "Staff Engineer");
        assert_eq!(state.job.company, "Acme");
        assert_eq!(state.user.key_skills, vec!["Python", "AWS"]);
        assert_eq!(state.questions.len(), 2);
        assert_eq!(state.job.source_url.as_deref(), Some("https://jobs.example.com/1"));
    }

    #[test]
    fn test_empty_resume_is_rejected() {
        let mut warnings = Vec::new();
        let err = build_state(&ApplicationForm::default(), "  ".to_string(), JD.to_string(), &mut warnings)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Resume text is empty")));
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let mut warnings = Vec::new();
        let err = build_state(&ApplicationForm::default(), RESUME.to_string(), String::new(), &mut warnings)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Job description is empty")));
    }

    #[test]
    fn test_short_resume_only_warns() {
        let mut warnings = Vec::new();
        let state = build_state(
            &ApplicationForm::default(),
            "Rust dev".to_string(),
            JD.to_string(),
            &mut warnings,
        );
        assert!(state.is_ok());
        assert_eq!(warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_pasted_resume_text_is_used_without_upload() {
        let form = ApplicationForm {
            resume_text: format!("  {RESUME}  "),
            job_description: JD.to_string(),
            ..ApplicationForm::default()
        };
        let run = prepare_run(&Client::new(), form).await.unwrap();
        assert_eq!(run.state.user.resume_text, RESUME);
        assert!(run.resume_filename.is_none());
    }

    #[tokio::test]
    async fn test_docx_upload_becomes_resume_text() {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{RESUME}</w:t></w:r></w:p></w:body></w:document>"#
        );
        let form = ApplicationForm {
            resume_file: Some(ResumeUpload {
                filename: "cv.docx".to_string(),
                data: docx_bytes(&xml),
            }),
            job_description: JD.to_string(),
            ..ApplicationForm::default()
        };
        let run = prepare_run(&Client::new(), form).await.unwrap();
        assert_eq!(run.state.user.resume_text, RESUME);
        assert_eq!(run.resume_filename.as_deref(), Some("cv.docx"));
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let form = ApplicationForm {
            resume_file: Some(ResumeUpload {
                filename: "cv.pages".to_string(),
                data: bytes::Bytes::from_static(b"data"),
            }),
            job_description: JD.to_string(),
            ..ApplicationForm::default()
        };
        let result = prepare_run(&Client::new(), form).await;
        assert!(matches!(result, Err(AppError::Validation(ref m)) if m.contains(".pages")));
    }
}
