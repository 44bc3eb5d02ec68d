use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use switchboard_core::{Arguments, CallContext, HandlerError, SharedHandler, ToolHandler, ToolResult};
use tracing::debug;

/// A single registered tool.
///
/// Entries are handed out as snapshots: the contract and handler are
/// `Arc`-shared, so cloning is cheap and a caller holding an entry keeps
/// using the handler it looked up even if the registry replaces it later.
#[derive(Clone)]
pub struct RegistryEntry {
    name: String,
    input_contract: Arc<Value>,
    handler: SharedHandler,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, input_contract: Value, handler: SharedHandler) -> Self {
        Self {
            name: name.into(),
            input_contract: Arc::new(input_contract),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declarative input schema published for this tool.
    ///
    /// The registry never interprets it; validation is left to the protocol
    /// layer or the handler.
    pub fn input_contract(&self) -> &Value {
        &self.input_contract
    }

    pub fn handler(&self) -> SharedHandler {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("input_contract", &self.input_contract)
            .finish_non_exhaustive()
    }
}

/// Concurrent name → handler registry.
///
/// `ToolRegistry` is the only shared mutable structure on the dispatch path.
/// Entries live in a `DashMap` and are replaced whole, so a concurrent lookup
/// observes either the old or the new entry and never a partially built one.
/// Registration is last-write-wins: registering an existing name silently
/// replaces it.
///
/// # Example
///
/// ```rust
/// use switchboard_core::{ToolResult, handler_fn};
/// use switchboard_tools::ToolRegistry;
///
/// let registry = ToolRegistry::new().with_tool(
///     "notes_list",
///     serde_json::json!({"type": "object"}),
///     handler_fn(|_args, _ctx| async { Ok(ToolResult::text("[]")) }),
/// );
///
/// assert!(registry.lookup("notes_list").is_some());
/// assert!(registry.lookup("Notes_List").is_none());
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    entries: DashMap<String, RegistryEntry>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register a tool using the builder pattern.
    ///
    /// # Parameters
    ///
    /// * `name` - Case-sensitive tool name
    /// * `input_contract` - JSON schema describing the tool's arguments
    /// * `handler` - The handler invoked on dispatch
    ///
    /// # Returns
    ///
    /// Self for method chaining
    pub fn with_tool(
        self,
        name: impl Into<String>,
        input_contract: Value,
        handler: SharedHandler,
    ) -> Self {
        self.register(name, input_contract, handler);
        self
    }

    /// Insert or replace the entry for `name`.
    ///
    /// Never fails. Lookups issued after this returns see the new entry;
    /// calls already dispatched keep running against the handler they got.
    pub fn register(&self, name: impl Into<String>, input_contract: Value, handler: SharedHandler) {
        let entry = RegistryEntry::new(name, input_contract, handler);
        let replaced = self.entries.insert(entry.name.clone(), entry).is_some();
        debug!(replaced, tools = self.entries.len(), "Registered tool");
    }

    /// Swap the handler of an existing entry, keeping its input contract.
    ///
    /// Unknown names are ignored so handlers can be armed before or after
    /// the corresponding entry is published.
    ///
    /// # Returns
    ///
    /// `true` if an entry was updated, `false` if `name` is not registered
    pub fn replace_handler(&self, name: &str, handler: SharedHandler) -> bool {
        match self.entries.get_mut(name) {
            Some(mut entry) => {
                entry.handler = handler;
                debug!(tool = %name, "Replaced tool handler");
                true
            }
            None => {
                debug!(tool = %name, "Handler replacement ignored for unknown tool");
                false
            }
        }
    }

    /// Snapshot of the entry registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Snapshot of every entry. Iteration order is unspecified.
    pub fn list(&self) -> Vec<RegistryEntry> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Names of every registered tool, in unspecified order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.entries.len())
            .finish()
    }
}

/// Stand-in handler for tools that are published but not wired up yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderHandler;

impl PlaceholderHandler {
    pub fn shared() -> SharedHandler {
        Arc::new(PlaceholderHandler)
    }
}

#[async_trait]
impl ToolHandler for PlaceholderHandler {
    async fn call(&self, _args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        Ok(ToolResult::error(format!(
            "Error: Tool '{}' is not implemented yet",
            ctx.tool()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_core::handler_fn;

    fn constant(text: &'static str) -> SharedHandler {
        handler_fn(move |_args, _ctx| async move { Ok(ToolResult::text(text)) })
    }

    async fn call(registry: &ToolRegistry, name: &str) -> String {
        let entry = registry.lookup(name).expect("tool registered");
        entry
            .handler()
            .call(Arguments::new(), CallContext::new(name))
            .await
            .unwrap()
            .text_content()
    }

    #[tokio::test]
    async fn register_is_last_write_wins() {
        let registry = ToolRegistry::new();
        registry.register("calendar_list", json!({"v": 1}), constant("first"));
        registry.register("calendar_list", json!({"v": 2}), constant("second"));

        assert_eq!(registry.len(), 1);
        assert_eq!(call(&registry, "calendar_list").await, "second");
        assert_eq!(
            registry.lookup("calendar_list").unwrap().input_contract(),
            &json!({"v": 2})
        );
    }

    #[tokio::test]
    async fn replace_handler_keeps_contract() {
        let registry = ToolRegistry::new();
        registry.register("notes_get", json!({"type": "object"}), PlaceholderHandler::shared());

        assert!(registry.replace_handler("notes_get", constant("real")));

        let entry = registry.lookup("notes_get").unwrap();
        assert_eq!(entry.input_contract(), &json!({"type": "object"}));
        assert_eq!(call(&registry, "notes_get").await, "real");
    }

    #[test]
    fn replace_handler_on_unknown_name_is_noop() {
        let registry = ToolRegistry::new();
        assert!(!registry.replace_handler("mail_send", constant("x")));
        assert!(registry.is_empty());
        assert!(registry.lookup("mail_send").is_none());
    }

    #[tokio::test]
    async fn snapshot_survives_replacement() {
        let registry = ToolRegistry::new();
        registry.register("maps_search", json!({}), constant("old"));
        let snapshot = registry.lookup("maps_search").unwrap();

        registry.replace_handler("maps_search", constant("new"));

        let old = snapshot
            .handler()
            .call(Arguments::new(), CallContext::new("maps_search"))
            .await
            .unwrap();
        assert_eq!(old.text_content(), "old");
        assert_eq!(call(&registry, "maps_search").await, "new");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = ToolRegistry::new().with_tool("mail_list", json!({}), constant("x"));
        assert!(registry.contains("mail_list"));
        assert!(!registry.contains("Mail_List"));
    }

    #[test]
    fn list_and_names_cover_all_entries() {
        let registry = ToolRegistry::new()
            .with_tool("contacts_list", json!({}), constant("a"))
            .with_tool("contacts_get", json!({}), constant("b"));

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["contacts_get", "contacts_list"]);

        let mut listed: Vec<String> = registry
            .list()
            .iter()
            .map(|entry| entry.name().to_string())
            .collect();
        listed.sort();
        assert_eq!(listed, names);
    }

    #[tokio::test]
    async fn placeholder_reports_not_implemented() {
        let result = PlaceholderHandler
            .call(Arguments::new(), CallContext::new("reminders_create"))
            .await
            .unwrap();
        assert!(result.is_error());
        assert_eq!(
            result.text_content(),
            "Error: Tool 'reminders_create' is not implemented yet"
        );
    }
}
