//! Provider-neutral chat message, tool, and turn types.
//!
//! Both provider clients translate these into their own wire format and
//! normalize their responses back into [`ChatTurn`], so callers never see
//! provider-specific payloads. Tool-call arguments are always a decoded
//! [`serde_json::Value`], regardless of whether the provider ships them as
//! a JSON string (OpenAI) or an object (Ollama).

use serde_json::Value;

/// One message in a chat conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// "system" | "user" | "assistant" | "tool".
    pub role: &'static str,
    /// Text content; `None` for assistant turns that only carry tool calls.
    pub content: Option<String>,
    /// Tool invocations requested by an assistant turn.
    pub tool_calls: Vec<ToolCall>,
    /// For `role == "tool"`: id of the call this message answers.
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant turn as returned by the model, preserving tool calls so
    /// it can be replayed into the next request.
    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant",
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// The result of one tool execution, answering `call_id`.
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool",
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A single tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Provider-assigned call id (synthesized for providers without one).
    pub id: String,
    /// Tool name as declared in the matching [`ToolSpec`].
    pub name: String,
    /// Decoded arguments object; `Value::Null` when undecodable.
    pub arguments: Value,
}

/// Declaration of one callable tool, offered to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the arguments object.
    pub parameters: Value,
}

/// Normalized outcome of one chat completion round.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Assistant text, if any. Empty strings are normalized to `None`.
    pub content: Option<String>,
    /// Requested tool invocations, in provider order.
    pub tool_calls: Vec<ToolCall>,
}

impl ChatTurn {
    /// Normalize raw provider output: blank content plus no tool calls is
    /// still a turn, but blank content alongside tool calls becomes `None`.
    pub fn new(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        let content = content.filter(|c| !c.trim().is_empty());
        Self {
            content,
            tool_calls,
        }
    }
}

/// Decode tool-call arguments shipped as a JSON string.
///
/// Returns `Value::Null` when the payload is not valid JSON, leaving it to
/// the caller to report the malformed call back to the model.
pub fn decode_string_arguments(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_dropped() {
        let turn = ChatTurn::new(Some("  ".into()), Vec::new());
        assert!(turn.content.is_none());

        let turn = ChatTurn::new(Some("answer".into()), Vec::new());
        assert_eq!(turn.content.as_deref(), Some("answer"));
    }

    #[test]
    fn string_arguments_decode_or_null() {
        let v = decode_string_arguments(r#"{"sql": "SELECT 1"}"#);
        assert_eq!(v["sql"], "SELECT 1");

        assert_eq!(decode_string_arguments("not json"), Value::Null);
    }
}
