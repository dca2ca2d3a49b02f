use qa_pipeline::QaAnswer;
use serde::Serialize;
use serde_json::Value;

/// Response payload for /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Final natural-language answer.
    pub response: String,
    /// Query provenance, present only when debug output is enabled and a
    /// query actually ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Provenance of the answer: what ran and how much came back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub sql: String,
    pub result_count: usize,
}

impl ChatResponse {
    pub fn from_answer(qa: QaAnswer, include_debug: bool) -> Self {
        let debug = match (include_debug, qa.sql, qa.result_count) {
            (true, Some(sql), Some(result_count)) => Some(DebugInfo { sql, result_count }),
            _ => None,
        };
        Self {
            response: qa.answer,
            debug,
        }
    }
}

/// Pull a non-empty `message` string out of the raw request body.
///
/// A missing field, a non-string value, and an empty string all fail the
/// same way.
pub fn parse_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_only_non_empty_strings() {
        assert_eq!(
            parse_message(&json!({"message": "lowest premium?"})),
            Some("lowest premium?")
        );
        assert_eq!(parse_message(&json!({"message": "  padded  "})), Some("padded"));

        assert_eq!(parse_message(&json!({})), None);
        assert_eq!(parse_message(&json!({"message": ""})), None);
        assert_eq!(parse_message(&json!({"message": "   "})), None);
        assert_eq!(parse_message(&json!({"message": 42})), None);
        assert_eq!(parse_message(&json!({"message": ["q"]})), None);
        assert_eq!(parse_message(&json!({"message": null})), None);
    }

    #[test]
    fn debug_field_is_opt_in() {
        let qa = QaAnswer {
            answer: "done".into(),
            sql: Some("SELECT 1".into()),
            result_count: Some(1),
            degraded: false,
        };
        assert!(ChatResponse::from_answer(qa.clone(), false).debug.is_none());

        let with_debug = ChatResponse::from_answer(qa, true);
        let v = serde_json::to_value(&with_debug).unwrap();
        assert_eq!(v["debug"]["sql"], "SELECT 1");
        assert_eq!(v["debug"]["resultCount"], 1);
    }
}
