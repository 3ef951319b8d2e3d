use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::config::RuleConfigError;
use super::matcher::Matcher;

/// Display colour for one vendor's markers and legend swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color(s.to_string())
    }
}

/// Which of the two buckets a row landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    A,
    B,
}

/// Classification rule for a single technology sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyRule {
    technology_id: String,
    discriminator_column: String,
    vendor_a: Matcher,
    vendor_b: Matcher,
    vendor_a_color: Color,
    vendor_b_color: Color,
}

impl TechnologyRule {
    pub fn new(
        technology_id: impl Into<String>,
        discriminator_column: &str,
        vendor_a: Matcher,
        vendor_b: Matcher,
        vendor_a_color: impl Into<Color>,
        vendor_b_color: impl Into<Color>,
    ) -> Self {
        Self {
            technology_id: technology_id.into(),
            discriminator_column: discriminator_column.trim().to_uppercase(),
            vendor_a,
            vendor_b,
            vendor_a_color: vendor_a_color.into(),
            vendor_b_color: vendor_b_color.into(),
        }
    }

    pub fn technology_id(&self) -> &str {
        &self.technology_id
    }

    /// Always uppercase.
    pub fn discriminator_column(&self) -> &str {
        &self.discriminator_column
    }

    pub fn matcher(&self, vendor: Vendor) -> &Matcher {
        match vendor {
            Vendor::A => &self.vendor_a,
            Vendor::B => &self.vendor_b,
        }
    }

    pub fn color(&self, vendor: Vendor) -> &Color {
        match vendor {
            Vendor::A => &self.vendor_a_color,
            Vendor::B => &self.vendor_b_color,
        }
    }
}

/// Ordered, immutable set of technology rules plus vendor display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRegistry {
    vendor_a_label: String,
    vendor_b_label: String,
    rules: Vec<TechnologyRule>,
}

impl RuleRegistry {
    /// Builds a registry from rules in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::DuplicateTechnology`] when two rules share a
    /// technology id.
    pub fn new(
        vendor_a_label: impl Into<String>,
        vendor_b_label: impl Into<String>,
        rules: Vec<TechnologyRule>,
    ) -> Result<Self, RuleConfigError> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert(rule.technology_id.as_str()) {
                return Err(RuleConfigError::DuplicateTechnology(
                    rule.technology_id.clone(),
                ));
            }
        }

        Ok(Self {
            vendor_a_label: vendor_a_label.into(),
            vendor_b_label: vendor_b_label.into(),
            rules,
        })
    }

    /// Ericsson / Huawei rules for the 2G, 3G, 4G and 5G sheets of a cell database.
    pub fn reference() -> Self {
        Self {
            vendor_a_label: "Ericsson".to_string(),
            vendor_b_label: "Huawei".to_string(),
            rules: vec![
                TechnologyRule::new(
                    "2G",
                    "BSC",
                    Matcher::prefix("E"),
                    Matcher::prefix("H"),
                    "orange",
                    "gray",
                ),
                TechnologyRule::new(
                    "3G",
                    "RNC",
                    Matcher::prefix("E"),
                    Matcher::prefix("H"),
                    "yellow",
                    "pink",
                ),
                TechnologyRule::new(
                    "4G",
                    "RBS",
                    Matcher::prefix("6"),
                    Matcher::exact(["MTS9604B", "DBS5900", "MTS9303A", "Nokia Ps"]),
                    "green",
                    "red",
                ),
                TechnologyRule::new(
                    "5G",
                    "DU_TYPE",
                    Matcher::exact(["BBU5216", "BBU6630", "BBU6631"]),
                    Matcher::exact(["BBU5900"]),
                    "purple",
                    "black",
                ),
            ],
        }
    }

    pub fn lookup(&self, technology_id: &str) -> Option<&TechnologyRule> {
        self.rules.iter().find(|r| r.technology_id == technology_id)
    }

    /// Rules in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &TechnologyRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn label(&self, vendor: Vendor) -> &str {
        match vendor {
            Vendor::A => &self.vendor_a_label,
            Vendor::B => &self.vendor_b_label,
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_order_is_stable() {
        let registry = RuleRegistry::reference();
        let ids: Vec<_> = registry.iter().map(|r| r.technology_id()).collect();
        assert_eq!(ids, vec!["2G", "3G", "4G", "5G"]);
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let registry = RuleRegistry::reference();
        let rule = registry.lookup("5G").unwrap();
        assert_eq!(rule.discriminator_column(), "DU_TYPE");
        assert_eq!(rule.color(Vendor::A).to_string(), "purple");
        assert!(registry.lookup("6G").is_none());
        assert!(registry.lookup("2g").is_none());
    }

    #[test]
    fn test_discriminator_is_uppercased() {
        let rule = TechnologyRule::new(
            "2G",
            " bsc ",
            Matcher::prefix("E"),
            Matcher::prefix("H"),
            "orange",
            "gray",
        );
        assert_eq!(rule.discriminator_column(), "BSC");
    }

    #[test]
    fn test_new_rejects_duplicate_technology() {
        let rule = || {
            TechnologyRule::new(
                "2G",
                "BSC",
                Matcher::prefix("E"),
                Matcher::prefix("H"),
                "orange",
                "gray",
            )
        };

        let err = RuleRegistry::new("Ericsson", "Huawei", vec![rule(), rule()]).unwrap_err();
        assert_eq!(err, RuleConfigError::DuplicateTechnology("2G".to_string()));

        let registry = RuleRegistry::new("Ericsson", "Huawei", vec![rule()]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reference_ids_are_unique() {
        let reference = RuleRegistry::reference();
        let rebuilt = RuleRegistry::new(
            reference.label(Vendor::A),
            reference.label(Vendor::B),
            reference.iter().cloned().collect(),
        )
        .unwrap();
        assert_eq!(rebuilt, reference);
    }

    #[test]
    fn test_labels() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.label(Vendor::A), "Ericsson");
        assert_eq!(registry.label(Vendor::B), "Huawei");
    }
}
