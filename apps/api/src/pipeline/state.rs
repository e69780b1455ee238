//! Pipeline state: the record threaded through every stage of a run.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

/// Score assigned when the fit response cannot be decoded.
pub const FALLBACK_FIT_SCORE: u8 = 60;

/// The candidate side of a run. Read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub resume_text: String,
    pub key_skills: Vec<String>,
    pub constraints: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_CANDIDATE_NAME.to_string(),
            headline: String::new(),
            location: String::new(),
            resume_text: String::new(),
            key_skills: Vec::new(),
            constraints: String::new(),
        }
    }
}

/// The job side of a run. Title, company and location may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub source_url: Option<String>,
}

/// Match strength between candidate and posting.
///
/// `Unknown` is reserved for fit responses that could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum FitLevel {
    #[serde(rename = "Strong Fit")]
    Strong,
    #[serde(rename = "Moderate Fit")]
    Moderate,
    #[serde(rename = "Weak Fit")]
    Weak,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl FitLevel {
    pub fn label(&self) -> &'static str {
        match self {
            FitLevel::Strong => "Strong Fit",
            FitLevel::Moderate => "Moderate Fit",
            FitLevel::Weak => "Weak Fit",
            FitLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for FitLevel {
    type Error = String;

    /// Accepts the four labels case-insensitively, ignoring surrounding whitespace.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "strong fit" => Ok(FitLevel::Strong),
            "moderate fit" => Ok(FitLevel::Moderate),
            "weak fit" => Ok(FitLevel::Weak),
            "unknown" => Ok(FitLevel::Unknown),
            _ => Err(format!("unrecognized fit level: {value:?}")),
        }
    }
}

/// Output of the ScoreFit stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitAssessment {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub level: FitLevel,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl FitAssessment {
    /// The degraded assessment used when the model's output is not decodable.
    /// The raw response is kept as the single reason so nothing is lost.
    pub fn unparsed(raw: &str) -> Self {
        Self {
            score: FALLBACK_FIT_SCORE,
            level: FitLevel::Unknown,
            reasons: vec![raw.to_string()],
            gaps: Vec::new(),
        }
    }

    /// Maps any decoded JSON object onto an assessment, field by field.
    ///
    /// A missing or non-numeric score reads as `FALLBACK_FIT_SCORE`, an
    /// unrecognized level as `Unknown`, and a scalar reason or gap list as a
    /// single entry. Returns `None` only when `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            score: fields
                .get("score")
                .and_then(coerce_score)
                .unwrap_or(FALLBACK_FIT_SCORE),
            level: fields
                .get("level")
                .and_then(Value::as_str)
                .and_then(|label| FitLevel::try_from(label.to_string()).ok())
                .unwrap_or(FitLevel::Unknown),
            reasons: string_list(fields.get("reasons")),
            gaps: string_list(fields.get("gaps")),
        })
    }
}

/// Integers, floats and numeric strings (optionally ending in `%`), rounded
/// and clamped into 0–100.
fn coerce_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }?;
    raw.is_finite()
        .then(|| raw.round().clamp(0.0, 100.0) as u8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(list_entry).collect(),
        Some(other) => list_entry(other).into_iter().collect(),
    }
}

fn list_entry(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        other => Some(other.to_string()),
    }
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_score(&value).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "score must be a number between 0 and 100, got {value}"
        ))
    })
}

/// The aggregate record of one run.
///
/// `user`, `job` and `questions` are supplied by the caller. Every other field
/// is written by exactly one stage, in pipeline order, and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub user: UserProfile,
    pub job: JobPosting,
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_parsed_markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailored_resume_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qna: Option<String>,
}

impl PipelineState {
    pub fn new(user: UserProfile, job: JobPosting, questions: Vec<String>) -> Self {
        Self {
            user,
            job,
            questions,
            job_parsed_markdown: None,
            fit: None,
            tailored_resume_md: None,
            cover_letter: None,
            qna: None,
        }
    }
}
