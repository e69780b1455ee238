use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// An uploaded resume document.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Raw fields of the application form. Unknown fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub constraints: String,
    /// Comma separated.
    pub skills: String,
    pub job_title: String,
    pub job_company: String,
    pub job_location: String,
    pub job_url: String,
    pub job_description: String,
    /// One question per line.
    pub questions: String,
    pub resume_file: Option<ResumeUpload>,
    pub resume_text: String,
}

impl ApplicationForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ApplicationForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "resume_file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume_file: {e}")))?;
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() && !data.is_empty() {
                    form.resume_file = Some(ResumeUpload { filename, data });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
            form.set_text(&name, value);
        }

        Ok(form)
    }

    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "headline" => &mut self.headline,
            "location" => &mut self.location,
            "constraints" => &mut self.constraints,
            "skills" => &mut self.skills,
            "job_title" => &mut self.job_title,
            "job_company" => &mut self.job_company,
            "job_location" => &mut self.job_location,
            "job_url" => &mut self.job_url,
            "job_description" => &mut self.job_description,
            "questions" => &mut self.questions,
            "resume_text" => &mut self.resume_text,
            _ => return,
        };
        *slot = value;
    }
}

/// Non-empty, trimmed entries of a comma separated list.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Non-empty, trimmed lines.
pub fn split_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
