//! Data access for the Medicare Advantage plan table.
//!
//! [`PlanQueries`] defines the read interface the question-answering
//! pipeline consumes; [`PlanStore`] is the Postgres implementation. The
//! table itself (`cms_landscape_2025`) is static reference data loaded
//! out-of-band — this crate only ever reads it.
//!
//! Two read paths exist:
//!
//! - [`PlanQueries::run_read_query`] executes one model-generated SELECT,
//!   screened by [`ensure_read_only`], with rows returned as JSON.
//! - [`PlanQueries::fetch_all`] is the typed full-table fetch used when
//!   ad-hoc execution is unavailable.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod errors;
mod record;
mod store;

use serde_json::Value;

pub use errors::StoreError;
pub use record::{PLAN_TABLE, PlanRecord, SCHEMA_SUMMARY};
pub use store::{PlanStore, ensure_read_only};

/// Read interface over the plan table.
///
/// Implement this trait to swap Postgres for another backend (or a test
/// fake) without touching pipeline code.
pub trait PlanQueries: Send + Sync + 'static {
    /// Execute one ad-hoc read-only SELECT, returning at most `row_limit`
    /// rows as JSON objects.
    ///
    /// # Errors
    /// - [`StoreError::RejectedStatement`] if `sql` is not a single SELECT
    /// - [`StoreError::AdhocUnavailable`] when ad-hoc execution is disabled
    ///   or the server lacks the capability
    /// - [`StoreError::Sqlx`] for any other database failure
    fn run_read_query(
        &self,
        sql: &str,
        row_limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Fetch the entire plan table, ordered by id.
    fn fetch_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PlanRecord>, StoreError>> + Send;
}
