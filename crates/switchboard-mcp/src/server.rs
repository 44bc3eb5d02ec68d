//! MCP server that exposes the Switchboard dispatcher

use crate::adapter::{into_arguments, to_call_tool_result, to_mcp_tool};
use crate::error::{McpError, McpResult};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use std::sync::Arc;
use switchboard_tools::Dispatcher;
use tracing::{debug, info, warn};

/// Name and version the server announces during initialization.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
    pub instructions: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: "switchboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: "Personal data tools for calendar, reminders, contacts, notes, \
                           messages, mail and maps. Tool names are <domain>_<operation>."
                .to_string(),
        }
    }
}

/// MCP server handler backed by a [`Dispatcher`].
///
/// `list_tools` publishes a snapshot of the registry sorted by name and
/// `call_tool` routes through the dispatcher, so every call is bounded by the
/// dispatcher's deadline and failures come back as `isError` results.
#[derive(Clone)]
pub struct BridgeServer {
    dispatcher: Arc<Dispatcher>,
    identity: ServerIdentity,
}

impl BridgeServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            identity: ServerIdentity::default(),
        }
    }

    pub fn with_identity(mut self, identity: ServerIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Every registered tool, sorted by name.
    ///
    /// Entries whose contract cannot be published are skipped with a warning
    /// rather than hiding the rest of the list.
    pub fn tools(&self) -> Vec<Tool> {
        let mut entries = self.dispatcher.registry().list();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
            .iter()
            .filter_map(|entry| match to_mcp_tool(entry) {
                Ok(tool) => Some(tool),
                Err(err) => {
                    warn!(tool = %entry.name(), error = %err, "Skipping unpublishable tool");
                    None
                }
            })
            .collect()
    }

    /// Dispatch a call and convert the envelope for the wire.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        debug!(tool = %name, "MCP tool call");
        let result = self
            .dispatcher
            .dispatch(name, into_arguments(arguments))
            .await;
        to_call_tool_result(result)
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> McpResult<()> {
        info!(
            server = %self.identity.name,
            version = %self.identity.version,
            tools = self.dispatcher.registry().len(),
            "Starting MCP server on stdio"
        );

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|err| McpError::TransportError(err.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|err| McpError::ServerError(err.to_string()))?;
        info!(reason = ?reason, "MCP server stopped");
        Ok(())
    }
}

impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.identity.name.clone(),
                version: self.identity.version.clone(),
                ..Default::default()
            },
            instructions: Some(self.identity.instructions.clone()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_tools::{PlaceholderHandler, ToolRegistry};

    fn server() -> BridgeServer {
        let registry = Arc::new(
            ToolRegistry::new()
                .with_tool(
                    "notes_list",
                    json!({"type": "object", "description": "List notes."}),
                    PlaceholderHandler::shared(),
                )
                .with_tool(
                    "calendar_list",
                    json!({"type": "object", "description": "List events."}),
                    PlaceholderHandler::shared(),
                ),
        );
        BridgeServer::new(Arc::new(Dispatcher::new(registry)))
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "switchboard");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn tools_are_sorted_by_name() {
        let names: Vec<String> = server()
            .tools()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(names, vec!["calendar_list", "notes_list"]);
    }

    #[tokio::test]
    async fn placeholder_call_is_an_error_result() {
        let result = server().call("notes_list", None).await;
        assert_eq!(result.is_error, Some(true));
    }
}
