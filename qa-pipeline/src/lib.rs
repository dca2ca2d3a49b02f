//! Question-answering pipeline over the Medicare Advantage plan table.
//!
//! Public API: [`answer_question`]. Given one natural-language question it
//! produces one natural-language answer, orchestrating the LLM client and
//! the plan store. Two designs are supported, selected by
//! [`cfg::PipelineConfig::mode`]:
//!
//! - **Two-pass** (default): ask the model for a SELECT, normalize and
//!   screen it, execute it, then ask the model to summarize the rows. The
//!   executed SQL is logged and returned for provenance.
//! - **Agent-orchestrated**: the model drives `run_read_only_query` tool
//!   calls itself within an iteration budget.
//!
//! The pipeline performs no retries and applies no timeouts of its own;
//! remote-client defaults govern, and any upstream failure surfaces
//! immediately as a [`PipelineError`].

mod agent;
mod api_types;
pub mod cfg;
mod error;
mod llm;
mod normalize;
mod prompt;
mod two_pass;

pub use api_types::{AskOptions, QaAnswer};
pub use cfg::{PipelineConfig, QaMode};
pub use error::PipelineError;
pub use llm::ChatModel;
pub use normalize::strip_code_fences;

use plan_store::PlanQueries;

/// Answer one question using defaults from the given config.
///
/// Convenience wrapper over [`answer_with_opts`].
pub async fn answer_question<M, S>(
    model: &M,
    store: &S,
    config: &PipelineConfig,
    question: &str,
) -> Result<QaAnswer, PipelineError>
where
    M: ChatModel,
    S: PlanQueries,
{
    answer_with_opts(model, store, config, question, AskOptions::default()).await
}

/// Answer one question, overriding config knobs per call.
///
/// Any `AskOptions` field set to `0` is replaced by the corresponding value
/// from `config`.
///
/// # Errors
/// - [`PipelineError::EmptyQuestion`] for blank input (checked before any
///   remote call)
/// - [`PipelineError::Llm`] / [`PipelineError::Store`] for upstream
///   failures
/// - [`PipelineError::StepBudgetExhausted`] when the agent design runs out
///   of iterations
pub async fn answer_with_opts<M, S>(
    model: &M,
    store: &S,
    config: &PipelineConfig,
    question: &str,
    opts: AskOptions,
) -> Result<QaAnswer, PipelineError>
where
    M: ChatModel,
    S: PlanQueries,
{
    if question.trim().is_empty() {
        return Err(PipelineError::EmptyQuestion);
    }

    let row_limit = if opts.row_limit == 0 {
        config.row_limit
    } else {
        opts.row_limit
    };
    let max_steps = if opts.max_steps == 0 {
        config.max_steps
    } else {
        opts.max_steps
    };

    match config.mode {
        QaMode::TwoPass => two_pass::run(model, store, question, row_limit).await,
        QaMode::Agent => agent::run(model, store, question, max_steps, row_limit).await,
    }
}
