//! Typed errors for plan-table access.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Ad-hoc query execution is disabled or unsupported by the server.
    /// Callers are expected to degrade to [`crate::PlanQueries::fetch_all`].
    #[error("ad-hoc query execution is unavailable")]
    AdhocUnavailable,

    /// The statement failed the read-only screen.
    #[error("rejected statement: {0}")]
    RejectedStatement(String),

    /// The query result could not be decoded into JSON rows.
    #[error("result decode error: {0}")]
    Decode(String),
}
