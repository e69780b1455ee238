//! Heuristic job metadata extraction. Used only to fill title/company/location
//! when the caller left them blank.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobMetadata {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("job metadata pattern must compile"))
        .collect()
}

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)Job Title[:\-]\s*(.+)",
        r"(?i)Position[:\-]\s*(.+)",
        r"(?i)Role[:\-]\s*(.+)",
    ])
});

static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(?i)Company[:\-]\s*(.+)", r"(?i)About\s+([A-Z][A-Za-z0-9 &]+)"])
});

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r"(?i)Location[:\-]\s*(.+)", r"(?i)based in\s+([A-Za-z ,]+)"])
});

/// First capture of the first matching pattern, trimmed.
fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

pub fn extract_job_metadata(description: &str) -> JobMetadata {
    let text = description.trim();
    JobMetadata {
        title: first_capture(&TITLE_PATTERNS, text),
        company: first_capture(&COMPANY_PATTERNS, text),
        location: first_capture(&LOCATION_PATTERNS, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_fields_are_extracted() {
        let jd = "Job Title: Senior Backend Engineer\nCompany: Acme Corp\nLocation: Berlin, Germany\n\nWe build APIs.";
        let meta = extract_job_metadata(jd);
        assert_eq!(meta.title.as_deref(), Some("Senior Backend Engineer"));
        assert_eq!(meta.company.as_deref(), Some("Acme Corp"));
        assert_eq!(meta.location.as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn test_labels_are_case_insensitive_and_accept_dash() {
        let meta = extract_job_metadata("POSITION- Data Engineer\nlocation: Remote");
        assert_eq!(meta.title.as_deref(), Some("Data Engineer"));
        assert_eq!(meta.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_prose_fallbacks() {
        let jd = "About Globex & Co\nWe are a team based in Austin, Texas\nand we ship daily.";
        let meta = extract_job_metadata(jd);
        assert_eq!(meta.company.as_deref(), Some("Globex & Co"));
        assert_eq!(meta.location.as_deref(), Some("Austin, Texas"));
        assert!(meta.title.is_none());
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(
            extract_job_metadata("Build great things with us."),
            JobMetadata::default()
        );
    }
}
