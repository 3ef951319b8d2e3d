use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::matcher::Matcher;
use super::registry::{RuleRegistry, TechnologyRule};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleConfigError {
    #[error("technology {0} is defined more than once")]
    DuplicateTechnology(String),
    #[error("technology {technology}: {vendor} matcher is empty")]
    EmptyMatcher { technology: String, vendor: &'static str },
    #[error("technology {0}: discriminator column is blank")]
    BlankColumn(String),
}

/// Rule file layout. A matcher written as a JSON array is an exact set, a
/// plain string is a prefix:
///
/// ```json
/// {
///   "vendor_a_label": "Ericsson",
///   "vendor_b_label": "Huawei",
///   "technologies": [
///     { "id": "2G", "column": "BSC", "vendor_a": "E", "vendor_b": "H",
///       "vendor_a_color": "orange", "vendor_b_color": "gray" },
///     { "id": "5G", "column": "DU_TYPE", "vendor_a": ["BBU5216", "BBU6630"],
///       "vendor_b": ["BBU5900"], "vendor_a_color": "purple", "vendor_b_color": "black" }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default = "default_vendor_a_label")]
    vendor_a_label: String,
    #[serde(default = "default_vendor_b_label")]
    vendor_b_label: String,
    technologies: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    id: String,
    column: String,
    vendor_a: RawMatcher,
    vendor_b: RawMatcher,
    vendor_a_color: String,
    vendor_b_color: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMatcher {
    Set(Vec<String>),
    Prefix(String),
}

fn default_vendor_a_label() -> String {
    "Ericsson".to_string()
}

fn default_vendor_b_label() -> String {
    "Huawei".to_string()
}

impl RawMatcher {
    fn resolve(self, technology: &str, vendor: &'static str) -> Result<Matcher, RuleConfigError> {
        let empty = match &self {
            RawMatcher::Set(values) => values.is_empty(),
            RawMatcher::Prefix(prefix) => prefix.is_empty(),
        };
        if empty {
            return Err(RuleConfigError::EmptyMatcher {
                technology: technology.to_string(),
                vendor,
            });
        }
        Ok(match self {
            RawMatcher::Set(values) => Matcher::exact(values),
            RawMatcher::Prefix(prefix) => Matcher::prefix(prefix),
        })
    }
}

impl RuleRegistry {
    /// Loads a rule set from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading rule file {}", path.display()))?;
        let registry = Self::from_json(&content)
            .with_context(|| format!("parsing rule file {}", path.display()))?;
        Ok(registry)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(content)?;
        Ok(file.into_registry()?)
    }
}

impl RuleFile {
    fn into_registry(self) -> Result<RuleRegistry, RuleConfigError> {
        let mut rules = Vec::with_capacity(self.technologies.len());

        for entry in self.technologies {
            if entry.column.trim().is_empty() {
                return Err(RuleConfigError::BlankColumn(entry.id));
            }
            let vendor_a = entry.vendor_a.resolve(&entry.id, "vendor_a")?;
            let vendor_b = entry.vendor_b.resolve(&entry.id, "vendor_b")?;
            rules.push(TechnologyRule::new(
                entry.id,
                &entry.column,
                vendor_a,
                vendor_b,
                entry.vendor_a_color.as_str(),
                entry.vendor_b_color.as_str(),
            ));
        }

        RuleRegistry::new(self.vendor_a_label, self.vendor_b_label, rules)
    }
}
