//! The two-pass design: generate SQL, execute it, summarize the rows.
//!
//! The exact query that ran is always known here; it is logged and handed
//! back to the caller for provenance.

use plan_store::{PlanQueries, StoreError};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    api_types::QaAnswer, error::PipelineError, llm::ChatModel, normalize::strip_code_fences,
    prompt,
};

pub(crate) async fn run<M, S>(
    model: &M,
    store: &S,
    question: &str,
    row_limit: usize,
) -> Result<QaAnswer, PipelineError>
where
    M: ChatModel,
    S: PlanQueries,
{
    // Stage 1: draft the query.
    let system = prompt::sql_generation_system(row_limit);
    let user = prompt::sql_generation_user(question);
    let raw = model.generate_fast(&user, Some(&system)).await?;
    let sql = strip_code_fences(&raw);
    info!(%sql, "generated query");

    // Stage 2: execute, degrading to the full table when ad-hoc execution
    // is not available.
    let (rows, degraded) = match store.run_read_query(&sql, row_limit).await {
        Ok(rows) => (rows, false),
        Err(StoreError::AdhocUnavailable) => {
            warn!("ad-hoc query execution unavailable; falling back to full table fetch");
            let all = store.fetch_all().await?;
            let rows = all
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<Value>, _>>()?;
            (rows, true)
        }
        Err(e) => return Err(e.into()),
    };
    info!(rows = rows.len(), degraded, "query executed");

    // Stage 3: summarize.
    let user = prompt::summarize_user(question, &sql, &rows, degraded);
    let answer = model
        .generate_slow(&user, Some(prompt::ANALYST_PERSONA))
        .await?;

    Ok(QaAnswer {
        answer,
        sql: Some(sql),
        result_count: Some(rows.len()),
        degraded,
    })
}
