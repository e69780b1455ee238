//! The five generation stages.
//!
//! Each stage consumes the state, makes at most one completion call, writes its
//! own output field and hands the state back. Prompt construction is split out
//! into `build_*_prompt` functions that take exactly the inputs the stage reads.

use std::fmt;

use tracing::info;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::TextCompletionClient;
use crate::pipeline::json_extract::parse_fit_assessment;
use crate::pipeline::prompts::{
    fill_template, ANSWER_QUESTIONS_TEMPLATE, COVER_LETTER_TEMPLATE, PARSE_JOB_TEMPLATE,
    SCORE_FIT_TEMPLATE, TAILOR_RESUME_TEMPLATE,
};
use crate::pipeline::state::{FitAssessment, JobPosting, PipelineState, UserProfile};
use crate::pipeline::PipelineError;

/// A field of `PipelineState`, used to declare stage inputs and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    User,
    Job,
    Questions,
    JobParsedMarkdown,
    Fit,
    TailoredResumeMd,
    CoverLetter,
    Qna,
}

impl StateField {
    /// Fields the caller supplies before the run starts.
    pub const CALLER_INPUTS: [StateField; 3] =
        [StateField::User, StateField::Job, StateField::Questions];

    pub fn name(&self) -> &'static str {
        match self {
            StateField::User => "user",
            StateField::Job => "job",
            StateField::Questions => "questions",
            StateField::JobParsedMarkdown => "job_parsed_markdown",
            StateField::Fit => "fit",
            StateField::TailoredResumeMd => "tailored_resume_md",
            StateField::CoverLetter => "cover_letter",
            StateField::Qna => "qna",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseJob,
    ScoreFit,
    TailorResume,
    WriteCoverLetter,
    AnswerQuestions,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ParseJob => "parse_job",
            Stage::ScoreFit => "score_fit",
            Stage::TailorResume => "tailor_resume",
            Stage::WriteCoverLetter => "write_cover_letter",
            Stage::AnswerQuestions => "answer_questions",
        }
    }

    /// State fields this stage reads.
    pub fn reads(&self) -> &'static [StateField] {
        match self {
            Stage::ParseJob => &[StateField::Job],
            Stage::ScoreFit => &[StateField::User, StateField::Job],
            Stage::TailorResume => &[StateField::User, StateField::Job],
            Stage::WriteCoverLetter => &[StateField::User, StateField::Job, StateField::Fit],
            Stage::AnswerQuestions => &[StateField::User, StateField::Job, StateField::Questions],
        }
    }

    /// State fields this stage writes.
    pub fn writes(&self) -> &'static [StateField] {
        match self {
            Stage::ParseJob => &[StateField::JobParsedMarkdown],
            Stage::ScoreFit => &[StateField::Fit],
            Stage::TailorResume => &[StateField::TailoredResumeMd],
            Stage::WriteCoverLetter => &[StateField::CoverLetter],
            Stage::AnswerQuestions => &[StateField::Qna],
        }
    }

    pub async fn run(
        self,
        client: &dyn TextCompletionClient,
        state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        match self {
            Stage::ParseJob => parse_job(client, state).await,
            Stage::ScoreFit => score_fit(client, state).await,
            Stage::TailorResume => tailor_resume(client, state).await,
            Stage::WriteCoverLetter => write_cover_letter(client, state).await,
            Stage::AnswerQuestions => answer_questions(client, state).await,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn complete(
    client: &dyn TextCompletionClient,
    stage: Stage,
    prompt: &str,
) -> Result<String, PipelineError> {
    client
        .complete(prompt)
        .await
        .map_err(|source| PipelineError::Completion { stage, source })
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

pub async fn parse_job(
    client: &dyn TextCompletionClient,
    mut state: PipelineState,
) -> Result<PipelineState, PipelineError> {
    let prompt = build_parse_job_prompt(&state.job);
    state.job_parsed_markdown = Some(complete(client, Stage::ParseJob, &prompt).await?);
    Ok(state)
}

/// Never fails on malformed output: an undecodable response becomes the
/// `Unknown` sentinel assessment. Only a failed completion call is an error.
pub async fn score_fit(
    client: &dyn TextCompletionClient,
    mut state: PipelineState,
) -> Result<PipelineState, PipelineError> {
    let prompt = build_score_fit_prompt(&state.user, &state.job);
    let raw = complete(client, Stage::ScoreFit, &prompt).await?;
    let fit = parse_fit_assessment(&raw);
    info!("Fit assessed: {}/100 ({})", fit.score, fit.level);
    state.fit = Some(fit);
    Ok(state)
}

pub async fn tailor_resume(
    client: &dyn TextCompletionClient,
    mut state: PipelineState,
) -> Result<PipelineState, PipelineError> {
    let prompt = build_tailor_resume_prompt(&state.user, &state.job);
    state.tailored_resume_md = Some(complete(client, Stage::TailorResume, &prompt).await?);
    Ok(state)
}

pub async fn write_cover_letter(
    client: &dyn TextCompletionClient,
    mut state: PipelineState,
) -> Result<PipelineState, PipelineError> {
    let fit = state.fit.as_ref().ok_or(PipelineError::MissingInput {
        stage: Stage::WriteCoverLetter,
        field: StateField::Fit,
    })?;
    let prompt = build_cover_letter_prompt(&state.user, &state.job, fit);
    state.cover_letter = Some(complete(client, Stage::WriteCoverLetter, &prompt).await?);
    Ok(state)
}

/// The only stage allowed to skip: with no questions there is no call and `qna`
/// stays absent.
pub async fn answer_questions(
    client: &dyn TextCompletionClient,
    mut state: PipelineState,
) -> Result<PipelineState, PipelineError> {
    if state.questions.is_empty() {
        info!("No application questions supplied, skipping");
        return Ok(state);
    }
    let prompt = build_answer_questions_prompt(&state.user, &state.job, &state.questions);
    state.qna = Some(complete(client, Stage::AnswerQuestions, &prompt).await?);
    Ok(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

pub fn build_parse_job_prompt(job: &JobPosting) -> String {
    fill_template(
        PARSE_JOB_TEMPLATE,
        &[
            ("title", job.title.as_str()),
            ("company", job.company.as_str()),
            ("location", job.location.as_str()),
            ("description", job.description.as_str()),
        ],
    )
}

pub fn build_score_fit_prompt(user: &UserProfile, job: &JobPosting) -> String {
    let candidate = candidate_block(user, true);
    let job_block = format!(
        "Title: {}\nCompany: {}\nLocation: {}",
        job.title, job.company, job.location
    );
    fill_template(
        SCORE_FIT_TEMPLATE,
        &[
            ("candidate", candidate.as_str()),
            ("resume_text", user.resume_text.as_str()),
            ("job", job_block.as_str()),
            ("description", job.description.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn build_tailor_resume_prompt(user: &UserProfile, job: &JobPosting) -> String {
    let job_line = job_line(job);
    fill_template(
        TAILOR_RESUME_TEMPLATE,
        &[
            ("resume_text", user.resume_text.as_str()),
            ("job_line", job_line.as_str()),
            ("description", job.description.as_str()),
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
        ],
    )
}

pub fn build_cover_letter_prompt(
    user: &UserProfile,
    job: &JobPosting,
    fit: &FitAssessment,
) -> String {
    let candidate = candidate_block(user, false);
    let job_line = job_line(job);
    let score = fit.score.to_string();
    let reasons = fit.reasons.join("; ");
    let gaps = fit.gaps.join("; ");
    fill_template(
        COVER_LETTER_TEMPLATE,
        &[
            ("candidate", candidate.as_str()),
            ("resume_text", user.resume_text.as_str()),
            ("job_line", job_line.as_str()),
            ("description", job.description.as_str()),
            ("score", score.as_str()),
            ("level", fit.level.label()),
            ("reasons", reasons.as_str()),
            ("gaps", gaps.as_str()),
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
        ],
    )
}

pub fn build_answer_questions_prompt(
    user: &UserProfile,
    job: &JobPosting,
    questions: &[String],
) -> String {
    let candidate = candidate_block(user, true);
    let job_line = job_line(job);
    let numbered = number_questions(questions);
    fill_template(
        ANSWER_QUESTIONS_TEMPLATE,
        &[
            ("candidate", candidate.as_str()),
            ("resume_text", user.resume_text.as_str()),
            ("job_line", job_line.as_str()),
            ("description", job.description.as_str()),
            ("questions", numbered.as_str()),
        ],
    )
}

fn candidate_block(user: &UserProfile, with_skills: bool) -> String {
    let mut lines = vec![
        format!("Name: {}", user.name),
        format!("Headline: {}", user.headline),
        format!("Location: {}", user.location),
    ];
    if with_skills {
        lines.push(format!("Key skills: {}", user.key_skills.join(", ")));
    }
    lines.push(format!("Constraints: {}", user.constraints));
    lines.join("\n")
}

fn job_line(job: &JobPosting) -> String {
    format!("{} at {} in {}", job.title, job.company, job.location)
}

/// Renders questions as `1. ...` lines, preserving order.
fn number_questions(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}
