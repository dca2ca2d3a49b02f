//! Public API types re-used by external crates (e.g., the HTTP API layer).

/// Options that control a single question run.
///
/// Setting a field to `0` means: "use the value from env-config".
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    /// Cap on rows fetched by an ad-hoc query. If `0`, falls back to
    /// `QA_ROW_LIMIT` from env.
    pub row_limit: usize,
    /// Iteration budget for the agent-orchestrated design. If `0`, falls
    /// back to `QA_MAX_STEPS` from env.
    pub max_steps: usize,
}

/// Final answer together with provenance of how it was produced.
#[derive(Clone, Debug)]
pub struct QaAnswer {
    /// Natural-language answer text.
    pub answer: String,
    /// The SQL that actually ran, when the run executed one.
    pub sql: Option<String>,
    /// Number of result rows handed to the summarization stage.
    pub result_count: Option<usize>,
    /// True when ad-hoc execution was unavailable and the run fell back to
    /// the full-table fetch.
    pub degraded: bool,
}
