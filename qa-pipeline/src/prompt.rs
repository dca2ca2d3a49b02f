//! Prompt builders: analyst persona, schema block, and per-stage prompts.

use plan_store::SCHEMA_SUMMARY;
use serde_json::Value;

/// Persona and output policy shared by the summarization stage and the
/// agent design.
pub const ANALYST_PERSONA: &str = "\
You are an expert Medicare Advantage Analyst with deep knowledge of Medicare plans and CMS data.
Answer in a polite, professional summary.
Format dollar amounts as currency (e.g. $25.00).
Do not expose internal database ids unless specifically asked.
When comparing plans, present the information in a clear, organized manner.
If the data contains no matching plans, say that no matching plans were found; never invent data.";

/// System prompt for the SQL-generation stage of the two-pass design.
pub fn sql_generation_system(row_limit: usize) -> String {
    format!(
        "You write PostgreSQL queries over Medicare Advantage plan data.\n\n\
         {SCHEMA_SUMMARY}\n\n\
         Rules:\n\
         - Respond with a single SQL SELECT statement and nothing else: no prose, no markdown fences.\n\
         - Read only; never emit INSERT, UPDATE, DELETE, or DDL.\n\
         - Return at most {row_limit} rows unless the question needs an aggregate.\n\
         - For cheapest/lowest questions, ORDER BY the relevant column ASC with a LIMIT.\n\
         - Match text columns case-insensitively (ILIKE) and do not assume suffixes like \"County\"."
    )
}

/// User prompt for the SQL-generation stage.
pub fn sql_generation_user(question: &str) -> String {
    format!("Question: {}", question.trim())
}

/// User prompt for the summarization stage: the original question, the
/// query that ran, and the serialized result rows.
///
/// When `degraded` is set the model is told the rows are the entire table
/// rather than the query output, so it can caveat the answer.
pub fn summarize_user(question: &str, sql: &str, rows: &[Value], degraded: bool) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push_str("\n\nSQL executed:\n");
    out.push_str(sql);
    out.push_str(&format!("\n\nResults ({} rows):\n", rows.len()));
    out.push_str(&Value::Array(rows.to_vec()).to_string());
    if degraded {
        out.push_str(
            "\n\nNote: ad-hoc query execution was unavailable, so the results above are the \
             ENTIRE plan table rather than the output of the SQL. Answer from these rows and \
             caveat that the query could not be run as written.",
        );
    }
    out.push_str("\n\nAnswer the question using only the results above.");
    out
}

/// System prompt for the agent-orchestrated design: persona, schema, and
/// the tool discipline.
pub fn agent_system() -> String {
    format!(
        "{ANALYST_PERSONA}\n\n\
         You have access to the plan database through the run_read_only_query tool.\n\n\
         {SCHEMA_SUMMARY}\n\n\
         IMPORTANT INSTRUCTIONS:\n\
         1. For questions about plans, costs, or ratings, ALWAYS query the database first\n\
         2. Verify your SQL is a single SELECT and correct before executing it\n\
         3. If a query fails, fix it and try again instead of guessing an answer\n\
         4. When you have the data you need, reply with the final answer as plain text"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sql_system_carries_schema_and_rules() {
        let system = sql_generation_system(10);
        assert!(system.contains("cms_landscape_2025"));
        assert!(system.contains("monthly_premium"));
        assert!(system.contains("at most 10 rows"));
        assert!(system.contains("no markdown fences"));
    }

    #[test]
    fn summarize_includes_rows_and_degraded_note() {
        let rows = vec![json!({"org_name": "Humana", "monthly_premium": 25.0})];
        let clean = summarize_user("lowest premium?", "SELECT 1", &rows, false);
        assert!(clean.contains("\"org_name\":\"Humana\""));
        assert!(clean.contains("(1 rows)"));
        assert!(!clean.contains("ENTIRE plan table"));

        let degraded = summarize_user("lowest premium?", "SELECT 1", &rows, true);
        assert!(degraded.contains("ENTIRE plan table"));
    }

    #[test]
    fn persona_fixes_output_policy() {
        assert!(ANALYST_PERSONA.contains("no matching plans were found"));
        assert!(ANALYST_PERSONA.contains("Do not expose internal database ids"));
        assert!(ANALYST_PERSONA.contains("$25.00"));
    }
}
