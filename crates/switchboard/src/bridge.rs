//! Assembly of the standard tool registry.
//!
//! Every catalog tool is published with a placeholder handler first. Tools
//! that have a working implementation are then armed in place, so the full
//! tool list is visible to clients whether or not a backend is available.

use crate::config::BridgeConfig;
use std::sync::Arc;
use switchboard_automation::{ScriptChannel, maps_handlers};
use switchboard_tools::{Catalog, CatalogError, Dispatcher, ToolRegistry};
use tracing::{info, warn};

/// Registry holding every catalog tool, with the maps tools bound to
/// `channel` when one is given.
pub fn standard_registry(channel: Option<&ScriptChannel>) -> Result<ToolRegistry, CatalogError> {
    let registry = ToolRegistry::new();
    let published = Catalog::load()?.register_placeholders(&registry);

    let mut armed = 0;
    if let Some(channel) = channel {
        for (name, handler) in maps_handlers(channel) {
            if registry.replace_handler(name, handler) {
                armed += 1;
            } else {
                warn!(tool = name, "Automation handler has no catalog entry");
            }
        }
    }

    info!(published, armed, "Tool registry ready");
    Ok(registry)
}

/// Dispatcher over the standard registry, wired according to `config`.
///
/// With automation enabled the maps tools run through the process-wide
/// script channel.
pub fn standard_dispatcher(config: &BridgeConfig) -> Result<Dispatcher, CatalogError> {
    let channel = config
        .enable_automation
        .then(|| ScriptChannel::global_with_timeout(config.script_timeout));
    let registry = standard_registry(channel)?;
    Ok(Dispatcher::new(Arc::new(registry)).with_default_deadline(config.tool_timeout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_automation_every_tool_is_a_placeholder() {
        let registry = standard_registry(None).unwrap();
        assert_eq!(registry.len(), 37);
        assert!(registry.contains("maps_search"));
    }

    #[test]
    fn dispatcher_uses_configured_deadline() {
        let config = BridgeConfig {
            enable_automation: false,
            tool_timeout: std::time::Duration::from_secs(7),
            ..BridgeConfig::default()
        };
        let dispatcher = standard_dispatcher(&config).unwrap();
        assert_eq!(dispatcher.default_deadline().as_secs(), 7);
        assert_eq!(dispatcher.registry().len(), 37);
    }
}
