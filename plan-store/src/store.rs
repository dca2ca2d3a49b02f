//! Postgres implementation of [`PlanQueries`].
//!
//! Uses [`sqlx`] with the `postgres` feature. The `sqlx::query`
//! (runtime-verified) form is used deliberately so that no `DATABASE_URL`
//! is needed at compile time.
//!
//! Ad-hoc queries are wrapped in `json_agg` so arbitrary SELECT shapes come
//! back as one JSON array without dynamic column decoding. A coarse keyword
//! screen rejects anything that is not a single SELECT; real enforcement is
//! the read-only database role the pool should connect as.

use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use crate::{PlanQueries, errors::StoreError, record::{PLAN_TABLE, PlanRecord}};

/// Statement keywords that disqualify a query from the ad-hoc read path.
const WRITE_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "create", "truncate", "grant", "revoke",
    "copy", "vacuum",
];

/// Postgres-backed plan store.
#[derive(Clone, Debug)]
pub struct PlanStore {
    pool: PgPool,
    adhoc_enabled: bool,
}

impl PlanStore {
    /// Connect eagerly so a bad `DATABASE_URL` fails at startup.
    ///
    /// `adhoc_enabled` gates the ad-hoc SELECT path; with it off, every
    /// [`PlanQueries::run_read_query`] call reports
    /// [`StoreError::AdhocUnavailable`] and callers degrade to the
    /// full-table fetch.
    pub async fn connect(url: &str, adhoc_enabled: bool) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        info!(adhoc_enabled, "plan store connected");
        Ok(Self {
            pool,
            adhoc_enabled,
        })
    }

    /// Build the pool without touching the network. Useful for tests and
    /// tooling that never reach the query paths.
    pub fn connect_lazy(url: &str, adhoc_enabled: bool) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(5).connect_lazy(url)?;
        Ok(Self {
            pool,
            adhoc_enabled,
        })
    }
}

impl PlanQueries for PlanStore {
    async fn run_read_query(&self, sql: &str, row_limit: usize) -> Result<Vec<Value>, StoreError> {
        let statement = ensure_read_only(sql)?;

        if !self.adhoc_enabled {
            return Err(StoreError::AdhocUnavailable);
        }

        // json_agg collapses any SELECT shape into one row with one JSON
        // array column; the inner LIMIT bounds the payload.
        let wrapped = format!(
            "SELECT COALESCE(json_agg(t), '[]'::json) AS rows \
             FROM (SELECT * FROM ({statement}) AS q LIMIT {row_limit}) AS t"
        );
        debug!(%statement, row_limit, "executing ad-hoc read query");

        let row = match sqlx::query(&wrapped).fetch_one(&self.pool).await {
            Ok(row) => row,
            Err(sqlx::Error::Database(db))
                if matches!(
                    db.code().as_deref(),
                    // undefined_function, insufficient_privilege,
                    // feature_not_supported
                    Some("42883") | Some("42501") | Some("0A000")
                ) =>
            {
                return Err(StoreError::AdhocUnavailable);
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value = row.try_get("rows")?;
        match value {
            Value::Array(items) => Ok(items),
            other => Err(StoreError::Decode(format!(
                "expected JSON array of rows, got {other}"
            ))),
        }
    }

    async fn fetch_all(&self) -> Result<Vec<PlanRecord>, StoreError> {
        let sql = format!(
            "SELECT id, contract_id, plan_id, org_name, plan_name, state, county, \
             monthly_premium, drug_deductible, star_rating \
             FROM {PLAN_TABLE} ORDER BY id"
        );
        let rows = sqlx::query_as::<_, PlanRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "fetched full plan table");
        Ok(rows)
    }
}

/// Screen `sql` down to one bare SELECT (or WITH … SELECT) statement.
///
/// Returns the trimmed statement with any trailing semicolon removed, ready
/// to embed as a subquery.
///
/// # Errors
/// [`StoreError::RejectedStatement`] for empty input, multiple statements,
/// non-SELECT statements, or write keywords anywhere in the text.
pub fn ensure_read_only(sql: &str) -> Result<&str, StoreError> {
    let statement = sql.trim().trim_end_matches(';').trim_end();
    if statement.is_empty() {
        return Err(StoreError::RejectedStatement("empty statement".into()));
    }
    if statement.contains(';') {
        return Err(StoreError::RejectedStatement(
            "multiple statements are not allowed".into(),
        ));
    }

    let lower = statement.to_ascii_lowercase();
    if !(lower.starts_with("select") || lower.starts_with("with")) {
        return Err(StoreError::RejectedStatement(
            "only SELECT queries are allowed".into(),
        ));
    }

    for word in lower.split(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        if WRITE_KEYWORDS.contains(&word) {
            return Err(StoreError::RejectedStatement(format!(
                "write keyword `{word}` is not allowed"
            )));
        }
    }

    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_select() {
        let sql = "SELECT org_name FROM cms_landscape_2025 WHERE county ILIKE 'Cook' \
                   ORDER BY monthly_premium ASC LIMIT 5;";
        let out = ensure_read_only(sql).unwrap();
        assert!(out.starts_with("SELECT"));
        assert!(!out.ends_with(';'));
    }

    #[test]
    fn accepts_cte_select() {
        assert!(ensure_read_only("WITH c AS (SELECT 1 AS n) SELECT n FROM c").is_ok());
    }

    #[test]
    fn rejects_writes_and_compounds() {
        assert!(ensure_read_only("").is_err());
        assert!(ensure_read_only("DELETE FROM cms_landscape_2025").is_err());
        assert!(ensure_read_only("SELECT 1; DROP TABLE cms_landscape_2025").is_err());
        assert!(ensure_read_only("WITH x AS (DELETE FROM t RETURNING *) SELECT * FROM x").is_err());
        assert!(ensure_read_only("UPDATE cms_landscape_2025 SET monthly_premium = 0").is_err());
    }

    #[test]
    fn keyword_screen_is_word_scoped() {
        // Keywords as substrings of longer words must pass.
        assert!(
            ensure_read_only(
                "SELECT * FROM cms_landscape_2025 WHERE plan_name ILIKE '%updated%'"
            )
            .is_ok()
        );
        assert!(ensure_read_only("SELECT last_updated_premium FROM cms_landscape_2025").is_ok());
        // The bare keyword anywhere is still rejected.
        assert!(ensure_read_only("SELECT 1 UNION SELECT 2 FROM pg_catalog.pg_tables, (SELECT 1) AS x WHERE 'a' = 'insert'").is_err());
    }
}
