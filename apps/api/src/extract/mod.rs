// Input extraction collaborators for the pipeline: resume documents, job pages,
// and the heuristic job metadata fallback. None of this calls the LLM.

pub mod documents;
pub mod job_metadata;
pub mod job_page;

use thiserror::Error;

pub use documents::load_resume_text;
pub use job_metadata::extract_job_metadata;
pub use job_page::fetch_job_description;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported resume file type: {0}. Use PDF/DOCX/TXT/MD")]
    UnsupportedFileType(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),

    #[error("Failed to fetch job page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
