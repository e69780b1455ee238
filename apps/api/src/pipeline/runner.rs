//! Pipeline Runner: executes the five stages as a fixed linear sequence.
//!
//! There is no retry, no per-stage timeout and no partial result: the first
//! stage error aborts the run and the state built so far is dropped.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};
use uuid::Uuid;

use crate::llm_client::TextCompletionClient;
use crate::pipeline::stages::{Stage, StateField};
use crate::pipeline::state::PipelineState;
use crate::pipeline::PipelineError;

/// Execution order. WriteCoverLetter must follow ScoreFit.
pub const STAGE_ORDER: [Stage; 5] = [
    Stage::ParseJob,
    Stage::ScoreFit,
    Stage::TailorResume,
    Stage::WriteCoverLetter,
    Stage::AnswerQuestions,
];

/// Runs the generation pipeline against an injected completion client.
///
/// Cheap to clone; concurrent runs share only the client.
#[derive(Clone)]
pub struct PipelineRunner {
    client: Arc<dyn TextCompletionClient>,
    plan: &'static [Stage],
}

impl PipelineRunner {
    /// Builds a runner over the fixed stage order, verifying every stage's
    /// declared inputs are available before it runs.
    pub fn new(client: Arc<dyn TextCompletionClient>) -> Result<Self, PipelineError> {
        validate_plan(&STAGE_ORDER)?;
        Ok(Self {
            client,
            plan: &STAGE_ORDER,
        })
    }

    pub fn stages(&self) -> &[Stage] {
        self.plan
    }

    /// Runs every stage in order and returns the completed state.
    pub async fn run(&self, initial: PipelineState) -> Result<PipelineState, PipelineError> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            "Pipeline run {} started ({} stages, {} questions)",
            run_id,
            self.stages().len(),
            initial.questions.len()
        );

        let mut state = initial;
        for stage in self.plan {
            let stage_started = Instant::now();
            state = match stage.run(self.client.as_ref(), state).await {
                Ok(next) => next,
                Err(e) => {
                    error!("Pipeline run {} aborted at {}: {}", run_id, stage, e);
                    return Err(e);
                }
            };
            info!(
                "Pipeline run {}: {} finished in {}ms",
                run_id,
                stage,
                stage_started.elapsed().as_millis()
            );
        }

        info!(
            "Pipeline run {} completed in {}ms",
            run_id,
            started.elapsed().as_millis()
        );
        Ok(state)
    }
}

/// Checks that each stage only reads caller inputs or fields written by an
/// earlier stage, and that no field is written twice.
pub fn validate_plan(plan: &[Stage]) -> Result<(), PipelineError> {
    let mut available: Vec<StateField> = StateField::CALLER_INPUTS.to_vec();

    for stage in plan {
        if let Some(missing) = stage.reads().iter().find(|f| !available.contains(*f)) {
            return Err(PipelineError::InvalidPlan(format!(
                "{stage} reads `{}` before any stage writes it",
                missing.name()
            )));
        }
        for field in stage.writes() {
            if available.contains(field) {
                return Err(PipelineError::InvalidPlan(format!(
                    "{stage} overwrites `{}`",
                    field.name()
                )));
            }
            available.push(*field);
        }
    }

    Ok(())
}
