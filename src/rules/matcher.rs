use serde::Serialize;
use std::collections::BTreeSet;

use crate::table::CellValue;

/// Predicate over a discriminator value.
///
/// Some vendors are recognised by an enumerated list of hardware codes, others
/// by a leading code shared across the product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    ExactSet { values: BTreeSet<String> },
    Prefix { prefix: String },
}

impl Matcher {
    pub fn exact<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::ExactSet {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Matcher::Prefix {
            prefix: prefix.into(),
        }
    }

    /// Missing and empty cells never match.
    pub fn matches(&self, value: Option<&CellValue>) -> bool {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return false;
        };
        let value = value.to_string();
        match self {
            Matcher::ExactSet { values } => values.contains(&value),
            Matcher::Prefix { prefix } => value.starts_with(prefix.as_str()),
        }
    }
}
