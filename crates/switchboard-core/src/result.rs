//! # Tool Result Envelope
//!
//! Every call that goes through the dispatcher produces exactly one
//! [`ToolResult`]: an ordered list of text blocks plus an error flag. The
//! wire shape matches what MCP clients expect (`content` / `isError`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments passed to a tool: a JSON object keyed by parameter name.
pub type Arguments = Map<String, Value>;

/// A single block of tool output.
///
/// Blocks are always text. Structured payloads are rendered as pretty-printed
/// JSON with sorted keys so output is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    /// Create a plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Render a JSON value as a pretty-printed, key-sorted text block.
    pub fn json(value: &Value) -> Self {
        let rendered = serde_json::to_string_pretty(&sort_keys(value))
            .unwrap_or_else(|_| value.to_string());
        ContentBlock::Text { text: rendered }
    }

    /// Borrow the text of this block.
    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Result envelope returned for every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result carrying a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    /// Successful result carrying a JSON payload rendered as text.
    pub fn json(value: &Value) -> Self {
        Self {
            content: vec![ContentBlock::json(value)],
            is_error: false,
        }
    }

    /// Failed result carrying a single descriptive text block.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
        }
    }

    /// Whether this result reports a failure.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// All text blocks joined with newlines.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rebuild a value with object keys in lexicographic order at every depth.
///
/// `serde_json::Map` only sorts when the `preserve_order` feature is off, and
/// feature unification can turn it on from another crate in the graph.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_block_sorts_keys_recursively() {
        let block = ContentBlock::json(&json!({"zeta": 1, "alpha": {"b": 2, "a": 1}}));
        let text = block.as_text();

        let alpha = text.find("\"alpha\"").unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);

        let inner_a = text.find("\"a\"").unwrap();
        let inner_b = text.find("\"b\"").unwrap();
        assert!(inner_a < inner_b);
        assert!(text.contains('\n'), "expected pretty-printed output");
    }

    #[test]
    fn error_result_sets_flag() {
        let result = ToolResult::error("Error: nope");
        assert!(result.is_error());
        assert_eq!(result.text_content(), "Error: nope");
    }

    #[test]
    fn serializes_with_mcp_field_names() {
        let result = ToolResult::text("hi");
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(
            wire,
            json!({"content": [{"type": "text", "text": "hi"}], "isError": false})
        );
    }

    #[test]
    fn text_content_joins_blocks() {
        let result = ToolResult {
            content: vec![ContentBlock::text("one"), ContentBlock::text("two")],
            is_error: false,
        };
        assert_eq!(result.text_content(), "one\ntwo");
    }
}
