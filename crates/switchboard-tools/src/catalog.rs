//! # Tool Catalog
//!
//! The input contract of every tool is configuration data, not code. The
//! contracts live in `catalog/tools.json`, are embedded at compile time and
//! parsed once. Publishing the catalog into a registry with placeholder
//! handlers makes every tool discoverable before its implementation is
//! wired in; real handlers are armed later with
//! [`ToolRegistry::replace_handler`].

use crate::registry::{PlaceholderHandler, ToolRegistry};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use switchboard_core::{InvalidToolName, ToolName};
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../catalog/tools.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tool name in catalog: {0}")]
    InvalidName(#[from] InvalidToolName),

    #[error("Tool '{0}' is declared more than once")]
    Duplicate(String),

    #[error("Input schema of '{0}' must be a JSON object")]
    SchemaNotObject(String),
}

/// One declared tool: name, human description and input schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolSpec {
    /// The input schema with the description attached, as published to clients.
    pub fn input_contract(&self) -> Value {
        let mut contract = self.input_schema.clone();
        if let Value::Object(map) = &mut contract {
            map.entry("description")
                .or_insert_with(|| Value::String(self.description.clone()));
        }
        contract
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    tools: Vec<ToolSpec>,
}

/// Validated set of tool declarations.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<ToolSpec>,
}

impl Catalog {
    /// Load the catalog embedded in this crate.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Parse and validate a catalog document.
    ///
    /// Every name must follow `<domain>_<operation>`, appear once, and carry
    /// an object schema.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(source)?;
        let mut seen = HashSet::new();
        for spec in &file.tools {
            ToolName::parse(&spec.name)?;
            if !seen.insert(spec.name.as_str()) {
                return Err(CatalogError::Duplicate(spec.name.clone()));
            }
            if !spec.input_schema.is_object() {
                return Err(CatalogError::SchemaNotObject(spec.name.clone()));
            }
        }
        Ok(Self { specs: file.tools })
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Tool names grouped by domain prefix, both levels sorted.
    pub fn domains(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for spec in &self.specs {
            // names were validated on load
            if let Ok(name) = ToolName::parse(&spec.name) {
                grouped
                    .entry(name.domain().to_string())
                    .or_default()
                    .push(spec.name.clone());
            }
        }
        for names in grouped.values_mut() {
            names.sort();
        }
        grouped
    }

    /// Publish every declared tool with a placeholder handler.
    ///
    /// Entries that already exist are left alone so a handler registered
    /// earlier is never downgraded.
    pub fn register_placeholders(&self, registry: &ToolRegistry) -> usize {
        let mut published = 0;
        for spec in &self.specs {
            if registry.contains(&spec.name) {
                continue;
            }
            registry.register(
                spec.name.clone(),
                spec.input_contract(),
                PlaceholderHandler::shared(),
            );
            published += 1;
        }
        tracing::info!(published, total = self.specs.len(), "Published tool catalog");
        published
    }
}
