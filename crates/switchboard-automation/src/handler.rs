//! Tool handlers backed by scripts run through the [`ScriptChannel`].
//!
//! A [`ScriptTemplate`] is script source with `{{name}}` placeholders filled
//! from the call arguments. `{{name}}` inserts the value escaped for an
//! AppleScript string literal, `{{name|url}}` inserts it percent-encoded for
//! use inside a URL. Placeholders whose argument is missing fail validation
//! unless the template declares a default for them.

use crate::channel::ScriptChannel;
use crate::runner::escape_applescript_string;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use switchboard_core::{
    Arguments, CallContext, DomainError, HandlerError, SharedHandler, ToolHandler, ToolResult,
    domain_error_result,
};
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { name: String, url: bool },
}

/// Script source with argument placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    segments: Vec<Segment>,
    defaults: HashMap<String, String>,
}

impl ScriptTemplate {
    pub fn new(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = source;
        while let Some(open) = rest.find("{{") {
            let Some(close) = rest[open + 2..].find("}}") else {
                break;
            };
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let token = rest[open + 2..open + 2 + close].trim();
            let (name, url) = match token.strip_suffix("|url") {
                Some(name) => (name.trim(), true),
                None => (token, false),
            };
            segments.push(Segment::Placeholder {
                name: name.to_string(),
                url,
            });
            rest = &rest[open + 2 + close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Self {
            segments,
            defaults: HashMap::new(),
        }
    }

    /// Value substituted when `name` is absent from the arguments or `null`.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Fill every placeholder from `args`.
    pub fn render(&self, args: &Arguments) -> Result<String, DomainError> {
        let mut script = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => script.push_str(text),
                Segment::Placeholder { name, url } => {
                    let value = match args.get(name).filter(|value| !value.is_null()) {
                        Some(value) => argument_text(name, value)?,
                        None => self.defaults.get(name).cloned().ok_or_else(|| {
                            DomainError::validation(format!("Missing required parameter: {name}"))
                        })?,
                    };
                    if *url {
                        script.extend(form_urlencoded::byte_serialize(value.as_bytes()));
                    } else {
                        script.push_str(&escape_applescript_string(&value));
                    }
                }
            }
        }
        Ok(script)
    }
}

fn argument_text(name: &str, value: &Value) -> Result<String, DomainError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(DomainError::validation(format!(
            "Parameter '{name}' must be a string, number or boolean"
        ))),
    }
}

/// Tool handler that renders a template and runs it through a channel.
///
/// Validation and automation failures are returned as `Error:` results.
pub struct ScriptHandler {
    channel: ScriptChannel,
    template: ScriptTemplate,
}

impl ScriptHandler {
    pub fn new(channel: ScriptChannel, template: ScriptTemplate) -> Self {
        Self { channel, template }
    }

    pub fn shared(channel: ScriptChannel, template: ScriptTemplate) -> SharedHandler {
        Arc::new(Self::new(channel, template))
    }
}

#[async_trait]
impl ToolHandler for ScriptHandler {
    async fn call(&self, args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        let script = match self.template.render(&args) {
            Ok(script) => script,
            Err(err) => return Ok(domain_error_result(&err)),
        };
        ctx.check_cancelled()?;

        let Some(outcome) = self
            .channel
            .run_unless_cancelled(&script, ctx.cancellation())
            .await
        else {
            return Err(HandlerError::Cancelled);
        };
        match outcome {
            Ok(output) if output.is_empty() => {
                Ok(ToolResult::text(format!("{} completed", ctx.tool())))
            }
            Ok(output) => Ok(ToolResult::text(output)),
            Err(err) => Ok(domain_error_result(&DomainError::from(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn renders_escaped_and_url_placeholders() {
        let template = ScriptTemplate::new(
            r#"display dialog "{{title}}" & open location "maps://?q={{query|url}}""#,
        );
        let script = template
            .render(&args(json!({"title": "Say \"hi\"", "query": "Café & Bar"})))
            .unwrap();
        assert_eq!(
            script,
            r#"display dialog "Say \"hi\"" & open location "maps://?q=Caf%C3%A9+%26+Bar""#
        );
    }

    #[test]
    fn missing_argument_is_validation_error() {
        let template = ScriptTemplate::new("open location \"{{address|url}}\"");
        let err = template.render(&Arguments::new()).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Missing required parameter: address")
        );
    }

    #[test]
    fn defaults_fill_missing_arguments() {
        let template = ScriptTemplate::new("mode={{mode}}").with_default("mode", "driving");
        assert_eq!(template.render(&Arguments::new()).unwrap(), "mode=driving");
        assert_eq!(
            template.render(&args(json!({"mode": "walking"}))).unwrap(),
            "mode=walking"
        );
    }

    #[test]
    fn numbers_and_booleans_are_accepted() {
        let template = ScriptTemplate::new("{{lat}},{{lon}} {{flag}}");
        let script = template
            .render(&args(json!({"lat": 52.5, "lon": -13, "flag": true})))
            .unwrap();
        assert_eq!(script, "52.5,-13 true");
    }

    #[test]
    fn structured_values_are_rejected() {
        let template = ScriptTemplate::new("{{to}}");
        assert!(template.render(&args(json!({"to": ["a"]}))).is_err());
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        let template = ScriptTemplate::new("return \"{{oops\"");
        assert_eq!(template.render(&Arguments::new()).unwrap(), "return \"{{oops\"");
    }
}
