use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted pipeline run: the inputs plus every stage output.
/// `fit_reasons` and `fit_gaps` hold JSON-encoded string arrays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_title: String,
    pub job_company: String,
    pub job_location: String,
    pub job_url: Option<String>,
    pub resume_filename: Option<String>,
    pub resume_text: String,
    pub job_description: String,
    /// Newline-separated.
    pub questions: String,
    pub fit_score: Option<i32>,
    pub fit_level: Option<String>,
    #[serde(skip_serializing)]
    pub fit_reasons: Option<String>,
    #[serde(skip_serializing)]
    pub fit_gaps: Option<String>,
    pub job_parsed_markdown: Option<String>,
    pub tailored_resume_md: Option<String>,
    pub cover_letter: Option<String>,
    pub qna: Option<String>,
}

/// A stored run as returned to its owner, with reasons and gaps decoded.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub row: ApplicationRow,
    pub fit_reasons: Vec<String>,
    pub fit_gaps: Vec<String>,
}

impl From<ApplicationRow> for ApplicationDetail {
    fn from(row: ApplicationRow) -> Self {
        let fit_reasons = decode_list(row.fit_reasons.as_deref());
        let fit_gaps = decode_list(row.fit_gaps.as_deref());
        Self {
            row,
            fit_reasons,
            fit_gaps,
        }
    }
}

/// Missing or undecodable columns read as empty.
fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationSummaryRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_title: String,
    pub job_company: String,
    pub fit_score: Option<i32>,
    pub fit_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(reasons: Option<&str>) -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            job_title: "Backend Engineer".to_string(),
            job_company: "Acme".to_string(),
            job_location: "Remote".to_string(),
            job_url: None,
            resume_filename: Some("cv.pdf".to_string()),
            resume_text: "Python".to_string(),
            job_description: "Python, AWS".to_string(),
            questions: String::new(),
            fit_score: Some(84),
            fit_level: Some("Strong Fit".to_string()),
            fit_reasons: reasons.map(String::from),
            fit_gaps: Some("[]".to_string()),
            job_parsed_markdown: None,
            tailored_resume_md: None,
            cover_letter: None,
            qna: None,
        }
    }

    #[test]
    fn test_detail_decodes_reason_lists() {
        let detail = ApplicationDetail::from(row(Some(r#"["Python","AWS"]"#)));
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["fit_reasons"], serde_json::json!(["Python", "AWS"]));
        assert_eq!(value["fit_gaps"], serde_json::json!([]));
        assert_eq!(value["job_company"], "Acme");
    }

    #[test]
    fn test_undecodable_lists_read_as_empty() {
        let detail = ApplicationDetail::from(row(Some("not json")));
        assert!(detail.fit_reasons.is_empty());
        let detail = ApplicationDetail::from(row(None));
        assert!(detail.fit_reasons.is_empty());
    }
}
