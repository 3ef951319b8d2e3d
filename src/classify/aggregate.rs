use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::classifier::classify;
use crate::classify::types::{ClassificationResult, LegendEntry, Marker, SkipWarning};
use crate::rules::{RuleRegistry, Vendor};
use crate::table::Workbook;

/// Output of one aggregation run: results in registry order plus skip warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub results: Vec<ClassificationResult>,
    pub warnings: Vec<SkipWarning>,
}

impl Aggregation {
    pub fn result(&self, technology_id: &str) -> Option<&ClassificationResult> {
        self.results
            .iter()
            .find(|r| r.technology_id == technology_id)
    }

    /// Two entries per classified technology, vendor A first.
    pub fn legend(&self, registry: &RuleRegistry) -> Vec<LegendEntry> {
        let mut entries = Vec::with_capacity(self.results.len() * 2);
        for result in &self.results {
            let Some(rule) = registry.lookup(&result.technology_id) else {
                continue;
            };
            for vendor in [Vendor::A, Vendor::B] {
                entries.push(LegendEntry {
                    technology_id: result.technology_id.clone(),
                    vendor,
                    label: registry.label(vendor).to_string(),
                    color: rule.color(vendor).to_string(),
                    count: result.count(vendor),
                });
            }
        }
        entries
    }

    /// Every plottable point with its vendor label and colour.
    pub fn markers(&self, registry: &RuleRegistry) -> Vec<Marker> {
        let mut markers = Vec::new();
        for result in &self.results {
            let Some(rule) = registry.lookup(&result.technology_id) else {
                continue;
            };
            for vendor in [Vendor::A, Vendor::B] {
                markers.extend(result.points(vendor).iter().map(|p| Marker {
                    technology_id: result.technology_id.clone(),
                    vendor,
                    label: registry.label(vendor).to_string(),
                    color: rule.color(vendor).to_string(),
                    lat: p.lat,
                    lon: p.lon,
                }));
            }
        }
        markers
    }
}

/// Classifies every registry technology that the workbook provides.
///
/// Sheets the registry does not know are ignored. A technology that cannot be
/// classified becomes a warning and does not affect the others.
pub fn aggregate<W: Workbook + ?Sized>(registry: &RuleRegistry, workbook: &W) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for rule in registry.iter() {
        let Some(table) = workbook.sheet(rule.technology_id()) else {
            debug!(technology = rule.technology_id(), "Sheet not present, skipping");
            continue;
        };

        match classify(rule, table) {
            Ok(result) => aggregation.results.push(result),
            Err(reason) => {
                let warning = SkipWarning {
                    technology_id: rule.technology_id().to_string(),
                    reason,
                };
                warn!(technology = rule.technology_id(), "{}", warning);
                aggregation.warnings.push(warning);
            }
        }
    }

    let ignored = workbook
        .sheet_names()
        .into_iter()
        .filter(|name| registry.lookup(name).is_none())
        .count();

    info!(
        classified = aggregation.results.len(),
        skipped = aggregation.warnings.len(),
        ignored,
        "Aggregation complete"
    );

    aggregation
}
