//! Output formatting and persistence for classification results.
//!
//! Supports a logged legend summary, a JSON report (optionally gzipped) and
//! CSV marker export.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::classify::{Aggregation, ClassificationResult, LegendEntry, SkipWarning};
use crate::rules::RuleRegistry;

/// Serialized form of one aggregation run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub results: &'a [ClassificationResult],
    pub legend: Vec<LegendEntry>,
    pub warnings: &'a [SkipWarning],
}

impl<'a> Report<'a> {
    pub fn new(aggregation: &'a Aggregation, registry: &RuleRegistry) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            results: &aggregation.results,
            legend: aggregation.legend(registry),
            warnings: &aggregation.warnings,
        }
    }
}

/// Logs the aggregation using Rust's debug pretty-print format.
pub fn print_pretty(aggregation: &Aggregation) {
    debug!("{:#?}", aggregation);
}

/// Logs one line per technology in the shape of the map legend.
pub fn print_legend(aggregation: &Aggregation, registry: &RuleRegistry) {
    for entry in aggregation.legend(registry) {
        info!(
            technology = %entry.technology_id,
            color = %entry.color,
            "{} Number of Cells by Vendor: {} ({})",
            entry.technology_id,
            entry.label,
            entry.count
        );
    }
    for warning in &aggregation.warnings {
        info!("{}", warning);
    }
}

/// Writes the report as JSON, gzip-compressed when `gzip` is set.
pub fn write_report(path: &str, report: &Report<'_>, gzip: bool) -> Result<()> {
    let body = serde_json::to_vec_pretty(report)?;
    let mut file = File::create(path)?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?;
    } else {
        file.write_all(&body)?;
    }

    debug!(path, gzip, bytes = body.len(), "Report written");
    Ok(())
}

/// Appends every plottable marker as a CSV row.
///
/// Creates the file with headers if it does not already exist.
pub fn append_markers(
    path: &str,
    aggregation: &Aggregation,
    registry: &RuleRegistry,
) -> Result<usize> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending marker records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let markers = aggregation.markers(registry);
    for marker in &markers {
        writer.serialize(marker)?;
    }
    writer.flush()?;

    Ok(markers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::aggregate;
    use crate::table::{CellValue, Table};
    use flate2::read::GzDecoder;
    use std::collections::BTreeMap;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> (RuleRegistry, Aggregation) {
        let registry = RuleRegistry::reference();
        let mut book = BTreeMap::new();
        book.insert(
            "2G".to_string(),
            Table::new(
                vec!["BSC".into(), "LATITUDE".into(), "LONGITUDE".into()],
                vec![
                    vec![CellValue::from("E1"), CellValue::Number(40.4), CellValue::Number(49.8)],
                    vec![CellValue::from("H1"), CellValue::Empty, CellValue::Number(49.8)],
                ],
            ),
        );
        book.insert("3G".to_string(), Table::new(vec!["RNC".into()], vec![]));
        let aggregation = aggregate(&registry, &book);
        (registry, aggregation)
    }

    #[test]
    fn test_print_functions_do_not_panic() {
        let (registry, aggregation) = sample();
        print_pretty(&aggregation);
        print_legend(&aggregation, &registry);
    }

    #[test]
    fn test_write_report_json() {
        let path = temp_path("cellmap_test_report.json");
        let _ = fs::remove_file(&path);

        let (registry, aggregation) = sample();
        write_report(&path, &Report::new(&aggregation, &registry), false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["results"][0]["technology_id"], "2G");
        assert_eq!(value["results"][0]["vendor_b_count"], 1);
        assert_eq!(value["legend"][0]["label"], "Ericsson");
        assert_eq!(value["warnings"][0]["reason"]["kind"], "missing_coordinate_column");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_gzip() {
        let path = temp_path("cellmap_test_report.json.gz");
        let _ = fs::remove_file(&path);

        let (registry, aggregation) = sample();
        write_report(&path, &Report::new(&aggregation, &registry), true).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.contains("\"schema_version\": 1"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_markers_writes_header_once() {
        let path = temp_path("cellmap_test_markers.csv");
        let _ = fs::remove_file(&path);

        let (registry, aggregation) = sample();
        assert_eq!(append_markers(&path, &aggregation, &registry).unwrap(), 1);
        append_markers(&path, &aggregation, &registry).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 2 marker rows; the H1 row has no latitude
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "technology_id,vendor,label,color,lat,lon");
        assert_eq!(lines[1], "2G,a,Ericsson,orange,40.4,49.8");

        fs::remove_file(&path).unwrap();
    }
}
