//! End-to-end pipeline tests against scripted model and store fakes.
//!
//! The fakes panic on unscripted calls, so every test also proves which
//! backends a given input is allowed to touch.

use std::collections::VecDeque;
use std::sync::Mutex;

use llm_service::{ChatMessage, ChatTurn, LlmServiceError, ToolCall, ToolSpec};
use plan_store::{PlanQueries, PlanRecord, StoreError};
use qa_pipeline::{
    AskOptions, ChatModel, PipelineConfig, PipelineError, QaMode, answer_question,
    answer_with_opts,
};
use serde_json::{Value, json};

/// Scripted model: pops pre-baked responses and records every prompt.
#[derive(Default)]
struct FakeModel {
    fast: Mutex<VecDeque<String>>,
    slow: Mutex<VecDeque<String>>,
    turns: Mutex<VecDeque<ChatTurn>>,
    seen_fast: Mutex<Vec<(String, Option<String>)>>,
    seen_slow: Mutex<Vec<(String, Option<String>)>>,
    seen_chats: Mutex<Vec<Vec<(&'static str, Option<String>)>>>,
}

impl FakeModel {
    fn with_fast(self, response: &str) -> Self {
        self.fast.lock().unwrap().push_back(response.to_string());
        self
    }

    fn with_slow(self, response: &str) -> Self {
        self.slow.lock().unwrap().push_back(response.to_string());
        self
    }

    fn with_turn(self, turn: ChatTurn) -> Self {
        self.turns.lock().unwrap().push_back(turn);
        self
    }
}

impl ChatModel for FakeModel {
    async fn generate_fast(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        self.seen_fast
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.map(str::to_string)));
        Ok(self
            .fast
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted generate_fast call"))
    }

    async fn generate_slow(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmServiceError> {
        self.seen_slow
            .lock()
            .unwrap()
            .push((prompt.to_string(), system.map(str::to_string)));
        Ok(self
            .slow
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted generate_slow call"))
    }

    async fn chat_slow(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatTurn, LlmServiceError> {
        self.seen_chats.lock().unwrap().push(
            messages
                .iter()
                .map(|m| (m.role, m.content.clone()))
                .collect(),
        );
        Ok(self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted chat_slow call"))
    }
}

/// In-memory store mirroring the production read screen.
#[derive(Default)]
struct FakeStore {
    rows: Vec<Value>,
    table: Vec<PlanRecord>,
    adhoc_enabled: bool,
    seen_queries: Mutex<Vec<(String, usize)>>,
}

impl PlanQueries for FakeStore {
    async fn run_read_query(&self, sql: &str, row_limit: usize) -> Result<Vec<Value>, StoreError> {
        plan_store::ensure_read_only(sql)?;
        if !self.adhoc_enabled {
            return Err(StoreError::AdhocUnavailable);
        }
        self.seen_queries
            .lock()
            .unwrap()
            .push((sql.to_string(), row_limit));
        Ok(self.rows.iter().take(row_limit).cloned().collect())
    }

    async fn fetch_all(&self) -> Result<Vec<PlanRecord>, StoreError> {
        Ok(self.table.clone())
    }
}

fn two_pass_config() -> PipelineConfig {
    PipelineConfig {
        mode: QaMode::TwoPass,
        max_steps: 10,
        row_limit: 10,
        debug: false,
    }
}

fn agent_config(max_steps: usize) -> PipelineConfig {
    PipelineConfig {
        mode: QaMode::Agent,
        max_steps,
        row_limit: 10,
        debug: false,
    }
}

fn cook_county_row() -> Value {
    json!({
        "org_name": "Humana",
        "plan_name": "Humana Gold Plus",
        "county": "Cook",
        "monthly_premium": 25.0
    })
}

fn sample_record() -> PlanRecord {
    PlanRecord {
        id: 7,
        contract_id: "H1234".into(),
        plan_id: "001".into(),
        org_name: "Humana".into(),
        plan_name: "Humana Gold Plus".into(),
        state: "IL".into(),
        county: "Cook".into(),
        monthly_premium: 25.0,
        drug_deductible: 150.0,
        star_rating: Some(4.5),
    }
}

#[tokio::test]
async fn blank_question_touches_no_backend() {
    let model = FakeModel::default();
    let store = FakeStore::default();

    let err = answer_question(&model, &store, &two_pass_config(), "   ")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::EmptyQuestion));
    assert!(err.is_client_error());
    assert!(store.seen_queries.lock().unwrap().is_empty());
    assert!(model.seen_fast.lock().unwrap().is_empty());
}

#[tokio::test]
async fn two_pass_strips_fences_and_carries_provenance() {
    let generated = "SELECT org_name, plan_name, monthly_premium FROM cms_landscape_2025 \
                     WHERE county ILIKE 'Cook' ORDER BY monthly_premium ASC LIMIT 5";
    let model = FakeModel::default()
        .with_fast(&format!("```sql\n{generated}\n```"))
        .with_slow("The lowest premium in Cook County is Humana Gold Plus (Humana) at $25.00.");
    let store = FakeStore {
        rows: vec![cook_county_row()],
        adhoc_enabled: true,
        ..Default::default()
    };

    let qa = answer_question(
        &model,
        &store,
        &two_pass_config(),
        "Which plan in Cook County has the lowest premium?",
    )
    .await
    .unwrap();

    // Fences are gone before the store sees the statement.
    let seen = store.seen_queries.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, generated);

    assert_eq!(qa.sql.as_deref(), Some(generated));
    assert_eq!(qa.result_count, Some(1));
    assert!(!qa.degraded);
    assert!(qa.answer.contains("$25.00"));
    assert!(qa.answer.contains("Humana"));

    // Summarization got the question, the SQL, and the rows.
    let slow = model.seen_slow.lock().unwrap();
    let (prompt, system) = &slow[0];
    assert!(prompt.contains("lowest premium"));
    assert!(prompt.contains(generated));
    assert!(prompt.contains("Humana Gold Plus"));
    assert!(system.as_deref().unwrap().contains("Medicare Advantage Analyst"));
}

#[tokio::test]
async fn two_pass_zero_rows_still_summarizes() {
    let model = FakeModel::default()
        .with_fast("SELECT * FROM cms_landscape_2025 WHERE county ILIKE 'Nowhere'")
        .with_slow("No matching plans were found for that county.");
    let store = FakeStore {
        adhoc_enabled: true,
        ..Default::default()
    };

    let qa = answer_question(&model, &store, &two_pass_config(), "Plans in Nowhere County?")
        .await
        .unwrap();

    assert_eq!(qa.result_count, Some(0));
    assert!(qa.answer.contains("No matching plans"));
    let slow = model.seen_slow.lock().unwrap();
    assert!(slow[0].0.contains("(0 rows)"));
}

#[tokio::test]
async fn two_pass_degrades_to_full_table_when_adhoc_unavailable() {
    let model = FakeModel::default()
        .with_fast("SELECT * FROM cms_landscape_2025 WHERE county ILIKE 'Cook'")
        .with_slow("Based on the full table, Humana Gold Plus has the lowest premium at $25.00.");
    let store = FakeStore {
        adhoc_enabled: false,
        table: vec![sample_record()],
        ..Default::default()
    };

    let qa = answer_question(&model, &store, &two_pass_config(), "Lowest premium in Cook?")
        .await
        .unwrap();

    assert!(qa.degraded);
    assert_eq!(qa.result_count, Some(1));
    let slow = model.seen_slow.lock().unwrap();
    assert!(slow[0].0.contains("ENTIRE plan table"));
}

#[tokio::test]
async fn two_pass_surfaces_rejected_statements() {
    let model = FakeModel::default().with_fast("DROP TABLE cms_landscape_2025");
    let store = FakeStore {
        adhoc_enabled: true,
        ..Default::default()
    };

    let err = answer_question(&model, &store, &two_pass_config(), "Drop everything")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Store(StoreError::RejectedStatement(_))
    ));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn options_override_config_row_limit() {
    let model = FakeModel::default()
        .with_fast("SELECT * FROM cms_landscape_2025")
        .with_slow("Here are the plans.");
    let store = FakeStore {
        rows: vec![cook_county_row(); 5],
        adhoc_enabled: true,
        ..Default::default()
    };

    let qa = answer_with_opts(
        &model,
        &store,
        &two_pass_config(),
        "List some plans",
        AskOptions {
            row_limit: 3,
            max_steps: 0,
        },
    )
    .await
    .unwrap();

    assert_eq!(store.seen_queries.lock().unwrap()[0].1, 3);
    assert_eq!(qa.result_count, Some(3));
}

#[tokio::test]
async fn agent_runs_tool_calls_then_answers() {
    let sql = "SELECT org_name, plan_name FROM cms_landscape_2025 \
               WHERE county ILIKE 'Cook' ORDER BY monthly_premium ASC LIMIT 1";
    let model = FakeModel::default()
        .with_turn(ChatTurn::new(
            None,
            vec![ToolCall {
                id: "call_1".into(),
                name: "run_read_only_query".into(),
                arguments: json!({ "sql": sql }),
            }],
        ))
        .with_turn(ChatTurn::new(
            Some("Humana Gold Plus has the lowest premium at $25.00.".into()),
            Vec::new(),
        ));
    let store = FakeStore {
        rows: vec![cook_county_row()],
        adhoc_enabled: true,
        ..Default::default()
    };

    let qa = answer_question(&model, &store, &agent_config(10), "Lowest premium in Cook?")
        .await
        .unwrap();

    assert!(qa.answer.contains("$25.00"));
    assert_eq!(qa.sql.as_deref(), Some(sql));
    assert_eq!(qa.result_count, Some(1));

    // Second round saw the tool result appended after the assistant turn.
    let chats = model.seen_chats.lock().unwrap();
    assert_eq!(chats.len(), 2);
    let roles: Vec<_> = chats[1].iter().map(|(role, _)| *role).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "tool"]);
    assert!(chats[1][3].1.as_deref().unwrap().contains("Humana"));
}

#[tokio::test]
async fn agent_reports_bad_calls_back_to_the_model() {
    let model = FakeModel::default()
        .with_turn(ChatTurn::new(
            None,
            vec![ToolCall {
                id: "call_1".into(),
                name: "shell_exec".into(),
                arguments: json!({ "cmd": "rm -rf /" }),
            }],
        ))
        .with_turn(ChatTurn::new(
            Some("I could not run that request.".into()),
            Vec::new(),
        ));
    let store = FakeStore {
        adhoc_enabled: true,
        ..Default::default()
    };

    let qa = answer_question(&model, &store, &agent_config(10), "Do something odd")
        .await
        .unwrap();

    assert_eq!(qa.sql, None);
    let chats = model.seen_chats.lock().unwrap();
    let tool_output = chats[1][3].1.as_deref().unwrap();
    assert!(tool_output.starts_with("error: unknown tool"));
}

#[tokio::test]
async fn agent_budget_exhaustion_is_an_error() {
    let call = || {
        ChatTurn::new(
            None,
            vec![ToolCall {
                id: "call_1".into(),
                name: "run_read_only_query".into(),
                arguments: json!({ "sql": "SELECT 1" }),
            }],
        )
    };
    let model = FakeModel::default().with_turn(call()).with_turn(call());
    let store = FakeStore {
        adhoc_enabled: true,
        ..Default::default()
    };

    let err = answer_question(&model, &store, &agent_config(2), "Loop forever")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::StepBudgetExhausted(2)));
}
