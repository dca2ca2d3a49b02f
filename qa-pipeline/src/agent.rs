//! The agent-orchestrated design: the model drives its own queries.
//!
//! The model is handed a fixed capability list — exactly one tool,
//! `run_read_only_query` — and an iteration budget. Every call it makes
//! goes through the same read-only screen as the two-pass design; failures
//! are reported back to the model as tool output so it can correct itself
//! instead of aborting the whole request.

use llm_service::{ChatMessage, ToolCall, ToolSpec};
use plan_store::{PlanQueries, StoreError};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::{api_types::QaAnswer, error::PipelineError, llm::ChatModel, prompt};

/// Name of the single permitted capability.
pub const RUN_READ_ONLY_QUERY: &str = "run_read_only_query";

/// The capability list offered to the model.
pub(crate) fn tool_specs() -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: RUN_READ_ONLY_QUERY,
        description: "Execute one read-only SQL SELECT against the Medicare Advantage plan \
                      table and return the matching rows as JSON.",
        parameters: json!({
            "type": "object",
            "properties": {
                "sql": {
                    "type": "string",
                    "description": "A single PostgreSQL SELECT statement."
                }
            },
            "required": ["sql"]
        }),
    }]
}

pub(crate) async fn run<M, S>(
    model: &M,
    store: &S,
    question: &str,
    max_steps: usize,
    row_limit: usize,
) -> Result<QaAnswer, PipelineError>
where
    M: ChatModel,
    S: PlanQueries,
{
    let tools = tool_specs();
    let mut messages = vec![
        ChatMessage::system(prompt::agent_system()),
        ChatMessage::user(question.trim()),
    ];

    let mut last_sql: Option<String> = None;
    let mut last_count: Option<usize> = None;

    for step in 0..max_steps {
        let turn = model.chat_slow(&messages, &tools).await?;

        if turn.tool_calls.is_empty() {
            if let Some(answer) = turn.content {
                info!(step, "agent produced final answer");
                return Ok(QaAnswer {
                    answer,
                    sql: last_sql,
                    result_count: last_count,
                    degraded: false,
                });
            }
            // Neither text nor calls; give the model another round within
            // the budget rather than failing outright.
            warn!(step, "agent turn carried neither content nor tool calls");
            continue;
        }

        messages.push(ChatMessage::assistant(
            turn.content.clone(),
            turn.tool_calls.clone(),
        ));

        for call in turn.tool_calls {
            let output = execute_tool(store, &call, row_limit, &mut last_sql, &mut last_count).await;
            debug!(step, tool = %call.name, "tool call executed");
            messages.push(ChatMessage::tool(call.id, output));
        }
    }

    Err(PipelineError::StepBudgetExhausted(max_steps))
}

/// Run one requested tool call, folding every failure into text the model
/// can react to. Failed queries are reported inline rather than aborting
/// the request; the model may retry with new SQL.
async fn execute_tool<S: PlanQueries>(
    store: &S,
    call: &ToolCall,
    row_limit: usize,
    last_sql: &mut Option<String>,
    last_count: &mut Option<usize>,
) -> String {
    if call.name != RUN_READ_ONLY_QUERY {
        return format!("error: unknown tool `{}`", call.name);
    }

    let Some(sql) = call.arguments.get("sql").and_then(Value::as_str) else {
        return "error: missing required string argument `sql`".to_string();
    };

    match store.run_read_query(sql, row_limit).await {
        Ok(rows) => {
            *last_sql = Some(sql.to_string());
            *last_count = Some(rows.len());
            info!(%sql, rows = rows.len(), "agent query executed");
            Value::Array(rows).to_string()
        }
        Err(StoreError::RejectedStatement(reason)) => {
            warn!(%sql, %reason, "agent query rejected");
            format!("error: statement rejected: {reason}")
        }
        Err(StoreError::AdhocUnavailable) => {
            "error: ad-hoc query execution is unavailable".to_string()
        }
        Err(e) => {
            warn!(%sql, error = %e, "agent query failed");
            format!("error: query failed: {e}")
        }
    }
}
