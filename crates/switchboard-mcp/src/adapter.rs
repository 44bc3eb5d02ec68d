//! Conversions between registry types and MCP protocol types.

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use std::sync::Arc;
use switchboard_core::{ContentBlock, ToolResult};
use switchboard_tools::RegistryEntry;

use crate::error::{McpError, McpResult};

/// Publish a registry entry as an MCP tool definition.
///
/// The description is read from the contract's `description` field; the
/// contract itself is sent as the input schema.
pub fn to_mcp_tool(entry: &RegistryEntry) -> McpResult<Tool> {
    let Value::Object(schema) = entry.input_contract() else {
        return Err(McpError::invalid_tool(
            entry.name(),
            "input contract is not a JSON object",
        ));
    };

    let description = schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Switchboard tool: {}", entry.name()));

    Ok(Tool::new(
        entry.name().to_string(),
        description,
        Arc::new(schema.clone()),
    ))
}

/// Convert a dispatcher result into the MCP call result.
pub fn to_call_tool_result(result: ToolResult) -> CallToolResult {
    let is_error = result.is_error();
    let content: Vec<Content> = result
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => Content::text(text),
        })
        .collect();

    if is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Arguments as received from the client; absent means empty.
pub fn into_arguments(arguments: Option<JsonObject>) -> switchboard_core::Arguments {
    arguments.unwrap_or_default()
}
