//! Vendor classification of technology sheets.
//!
//! [`classify`] handles one sheet against one rule; [`aggregate`] walks a
//! [`RuleRegistry`](crate::rules::RuleRegistry) over a whole workbook and
//! collects per-technology counts, points and skip warnings.

pub mod aggregate;
pub mod classifier;
pub mod normalize;
pub mod types;

pub use aggregate::{Aggregation, aggregate};
pub use classifier::classify;
pub use types::{
    ClassificationResult, GeoPoint, LegendEntry, Marker, SkipReason, SkipWarning,
};
