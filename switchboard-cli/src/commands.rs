//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use switchboard::{Arguments, BridgeConfig, BridgeServer, Catalog, standard_dispatcher};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] switchboard::ConfigError),

    #[error(transparent)]
    Catalog(#[from] switchboard::CatalogError),

    #[error(transparent)]
    Mcp(#[from] switchboard::McpError),

    #[error("Invalid --args: {0}")]
    InvalidArgs(String),

    #[error("Unknown domain '{0}'")]
    UnknownDomain(String),

    #[error("Failed to render result: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to render tool list: {0}")]
    Listing(#[from] std::fmt::Error),
}

/// Serve MCP on stdio until the client disconnects.
pub async fn serve(config: &BridgeConfig) -> Result<(), CliError> {
    info!(config = %config, "Starting switchboard");
    let dispatcher = standard_dispatcher(config)?;
    BridgeServer::new(Arc::new(dispatcher)).serve_stdio().await?;
    Ok(())
}

/// Render the tool list, grouped by domain.
pub fn tools(domain: Option<&str>) -> Result<String, CliError> {
    let catalog = Catalog::load()?;
    let domains: BTreeMap<String, Vec<String>> = match domain {
        Some(domain) => {
            let names = catalog
                .domains()
                .remove(domain)
                .ok_or_else(|| CliError::UnknownDomain(domain.to_string()))?;
            BTreeMap::from([(domain.to_string(), names)])
        }
        None => catalog.domains(),
    };

    let mut out = String::new();
    for (domain, names) in &domains {
        writeln!(out, "{domain} ({})", names.len())?;
        for name in names {
            let description = catalog
                .get(name)
                .map(|spec| spec.description.as_str())
                .unwrap_or_default();
            writeln!(out, "  {name:<22} {description}")?;
        }
    }
    Ok(out)
}

/// Parse the `--args` JSON object; absent means no arguments.
pub fn parse_arguments(raw: Option<&str>) -> Result<Arguments, CliError> {
    let Some(raw) = raw else {
        return Ok(Arguments::new());
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::InvalidArgs(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(CliError::InvalidArgs(err.to_string())),
    }
}

/// Dispatch one call and return the result envelope as JSON.
///
/// The second value tells whether the call failed.
pub async fn call(
    config: &BridgeConfig,
    name: &str,
    args: Option<&str>,
    timeout: Option<Duration>,
) -> Result<(String, bool), CliError> {
    let args = parse_arguments(args)?;
    let dispatcher = standard_dispatcher(config)?;
    let deadline = timeout.unwrap_or(dispatcher.default_deadline());
    info!(
        tool = name,
        deadline = %humantime::format_duration(deadline),
        "One-shot dispatch"
    );

    let result = dispatcher.dispatch_with_deadline(name, args, deadline).await;
    Ok((serde_json::to_string_pretty(&result)?, result.is_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> BridgeConfig {
        BridgeConfig {
            enable_automation: false,
            ..BridgeConfig::default()
        }
    }

    #[test]
    fn arguments_must_be_an_object() {
        assert!(parse_arguments(None).unwrap().is_empty());
        assert_eq!(parse_arguments(Some(r#"{"x": 1}"#)).unwrap().len(), 1);
        assert!(matches!(
            parse_arguments(Some("[1, 2]")),
            Err(CliError::InvalidArgs(msg)) if msg.contains("expected a JSON object")
        ));
        assert!(parse_arguments(Some("{oops")).is_err());
    }

    #[test]
    fn tools_can_be_filtered_by_domain() {
        let listing = tools(Some("maps")).unwrap();
        assert!(listing.starts_with("maps (4)"));
        assert!(listing.contains("maps_directions"));
        assert!(!listing.contains("notes_"));

        assert!(matches!(tools(Some("fax")), Err(CliError::UnknownDomain(_))));
    }

    #[test]
    fn full_listing_covers_every_domain() {
        let listing = tools(None).unwrap();
        for domain in ["calendar", "reminders", "contacts", "notes", "messages", "mail", "maps"] {
            assert!(listing.contains(&format!("{domain} (")), "missing {domain}");
        }
    }

    #[tokio::test]
    async fn unknown_tool_call_reports_failure() {
        let (json, failed) = call(&offline(), "unknown_tool_xyz", None, None).await.unwrap();
        assert!(failed);
        assert!(json.contains("UNKNOWN_TOOL: 'unknown_tool_xyz' is not a registered tool"));
        assert!(json.contains("\"isError\": true"));
    }
}
