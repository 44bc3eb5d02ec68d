//! Maps tools driven through `maps://` URLs.
//!
//! Maps has no data API worth the name; every operation opens a URL in the
//! application, so the tools are thin templates over the channel.

use crate::channel::ScriptChannel;
use crate::handler::{ScriptHandler, ScriptTemplate};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use switchboard_core::{
    Arguments, CallContext, DomainError, HandlerError, SharedHandler, ToolHandler, ToolResult,
    domain_error_result,
};

const SEARCH: &str = r#"tell application "Maps" to activate
open location "maps://?q={{query|url}}""#;

const DIRECTIONS: &str = r#"tell application "Maps" to activate
open location "maps://?saddr={{from|url}}&daddr={{to|url}}&dirflg={{mode|url}}""#;

const OPEN: &str = r#"tell application "Maps" to activate
open location "maps://?address={{address|url}}""#;

const PIN: &str = r#"tell application "Maps" to activate
open location "maps://?ll={{latitude|url}},{{longitude|url}}&q={{label|url}}""#;

/// Translate a transport mode into the `dirflg` URL parameter.
pub fn direction_flag(mode: &str) -> Option<&'static str> {
    match mode {
        "driving" => Some("d"),
        "walking" => Some("w"),
        "transit" => Some("r"),
        _ => None,
    }
}

/// Templates for every maps tool, keyed by tool name.
pub fn maps_templates() -> Vec<(&'static str, ScriptTemplate)> {
    vec![
        ("maps_search", ScriptTemplate::new(SEARCH)),
        (
            "maps_directions",
            ScriptTemplate::new(DIRECTIONS)
                .with_default("from", "Current Location")
                .with_default("mode", "d"),
        ),
        ("maps_open", ScriptTemplate::new(OPEN)),
        (
            "maps_pin",
            ScriptTemplate::new(PIN).with_default("label", "Dropped Pin"),
        ),
    ]
}

/// Directions handler: validates `mode` and rewrites it to the URL flag.
struct DirectionsHandler {
    inner: ScriptHandler,
}

#[async_trait]
impl ToolHandler for DirectionsHandler {
    async fn call(&self, mut args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        if let Some(mode) = args.get("mode").filter(|mode| !mode.is_null()) {
            let flag = mode.as_str().and_then(direction_flag).ok_or_else(|| {
                DomainError::validation(format!(
                    "Invalid mode {mode}: expected driving, walking or transit"
                ))
            });
            match flag {
                Ok(flag) => {
                    args.insert("mode".to_string(), Value::String(flag.to_string()));
                }
                Err(err) => return Ok(domain_error_result(&err)),
            }
        }
        self.inner.call(args, ctx).await
    }
}

/// Handlers for every maps tool, bound to `channel`.
pub fn maps_handlers(channel: &ScriptChannel) -> Vec<(&'static str, SharedHandler)> {
    maps_templates()
        .into_iter()
        .map(|(name, template)| {
            let inner = ScriptHandler::new(channel.clone(), template);
            let handler: SharedHandler = if name == "maps_directions" {
                Arc::new(DirectionsHandler { inner })
            } else {
                Arc::new(inner)
            };
            (name, handler)
        })
        .collect()
}
