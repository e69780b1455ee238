// Generation pipeline: ParseJob → ScoreFit → TailorResume → WriteCoverLetter → AnswerQuestions.
// All completion calls go through the injected TextCompletionClient, never llm_client directly.

pub mod json_extract;
pub mod prompts;
pub mod runner;
pub mod stages;
pub mod state;

use thiserror::Error;

use crate::llm_client::LlmError;

pub use runner::PipelineRunner;
pub use stages::{Stage, StateField};
pub use state::{JobPosting, PipelineState, UserProfile};

/// Failures that abort a run. Malformed model output is not one of them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage {stage} failed: completion call error: {source}")]
    Completion {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("stage {stage} requires `{}` but it has not been produced", .field.name())]
    MissingInput { stage: Stage, field: StateField },

    #[error("invalid stage plan: {0}")]
    InvalidPlan(String),
}
