//! Data types produced by classification and aggregation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::rules::Vendor;

/// A plottable location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Why a technology sheet was left out of the result set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("missing coordinate column")]
    MissingCoordinateColumn,
    #[error("missing discriminator column {0}")]
    MissingDiscriminatorColumn(String),
}

/// A skipped technology, surfaced to the caller as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipWarning {
    pub technology_id: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkipWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sheet skipped: {}", self.technology_id, self.reason)
    }
}

/// Counts and points for one technology.
///
/// Counts include matched rows without usable coordinates, so a count is
/// never smaller than the matching point list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub technology_id: String,
    pub vendor_a_count: usize,
    pub vendor_b_count: usize,
    /// Rows matched by both vendors' rules; counted under vendor A only.
    pub overlap_count: usize,
    pub vendor_a_points: Vec<GeoPoint>,
    pub vendor_b_points: Vec<GeoPoint>,
}

impl ClassificationResult {
    pub fn empty(technology_id: &str) -> Self {
        Self {
            technology_id: technology_id.to_string(),
            vendor_a_count: 0,
            vendor_b_count: 0,
            overlap_count: 0,
            vendor_a_points: Vec::new(),
            vendor_b_points: Vec::new(),
        }
    }

    pub fn count(&self, vendor: Vendor) -> usize {
        match vendor {
            Vendor::A => self.vendor_a_count,
            Vendor::B => self.vendor_b_count,
        }
    }

    pub fn points(&self, vendor: Vendor) -> &[GeoPoint] {
        match vendor {
            Vendor::A => &self.vendor_a_points,
            Vendor::B => &self.vendor_b_points,
        }
    }

    pub(crate) fn record(&mut self, vendor: Vendor, point: Option<GeoPoint>) {
        let (count, points) = match vendor {
            Vendor::A => (&mut self.vendor_a_count, &mut self.vendor_a_points),
            Vendor::B => (&mut self.vendor_b_count, &mut self.vendor_b_points),
        };
        *count += 1;
        if let Some(point) = point {
            points.push(point);
        }
    }
}

/// One legend line: a technology/vendor pair with its colour and count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub technology_id: String,
    pub vendor: Vendor,
    pub label: String,
    pub color: String,
    pub count: usize,
}

/// One map marker. Shares `technology_id`, `vendor`, `label` and `color`
/// with [`LegendEntry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub technology_id: String,
    pub vendor: Vendor,
    pub label: String,
    pub color: String,
    pub lat: f64,
    pub lon: f64,
}
