//! Tool name convention.
//!
//! Tool names follow `<domain>_<operation>` (for example `calendar_list` or
//! `reminders_complete`). Clients group tools by the domain prefix, so the
//! convention is checked wherever names are declared rather than left to
//! documentation.

use std::fmt;

/// Maximum accepted tool name length.
pub const MAX_TOOL_NAME_LENGTH: usize = 128;

/// Why a tool name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToolName {
    #[error("Tool name cannot be empty")]
    Empty,
    #[error("Tool name too long ({length} chars, max {max})")]
    TooLong { length: usize, max: usize },
    #[error("Tool name '{0}' may only contain lowercase letters, digits and underscores")]
    InvalidCharacters(String),
    #[error("Tool name '{0}' must have the form <domain>_<operation>")]
    MissingDomain(String),
}

/// A validated `<domain>_<operation>` tool name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolName(String);

impl ToolName {
    pub fn parse(name: &str) -> Result<Self, InvalidToolName> {
        if name.is_empty() {
            return Err(InvalidToolName::Empty);
        }
        if name.len() > MAX_TOOL_NAME_LENGTH {
            return Err(InvalidToolName::TooLong {
                length: name.len(),
                max: MAX_TOOL_NAME_LENGTH,
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(InvalidToolName::InvalidCharacters(name.to_string()));
        }
        match name.split_once('_') {
            Some((domain, operation)) if !domain.is_empty() && !operation.is_empty() => {
                Ok(Self(name.to_string()))
            }
            _ => Err(InvalidToolName::MissingDomain(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The capability group this tool belongs to (`calendar` in `calendar_list`).
    pub fn domain(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(domain, _)| domain)
    }

    /// The operation within the domain (`list` in `calendar_list`).
    pub fn operation(&self) -> &str {
        self.0.split_once('_').map_or("", |(_, operation)| operation)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ToolName {
    type Err = InvalidToolName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
