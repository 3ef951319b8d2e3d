use tracing::{debug, warn};

use crate::classify::normalize::{ColumnIndex, LATITUDE, LONGITUDE};
use crate::classify::types::{ClassificationResult, GeoPoint, SkipReason};
use crate::rules::{TechnologyRule, Vendor};
use crate::table::{CellValue, Table};

/// Classifies every row of one technology sheet into vendor A, vendor B or neither.
///
/// Headers are normalized before validation; the table itself is only read.
/// A row matching both vendors is counted under vendor A and tallied in
/// `overlap_count`.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the latitude, longitude or discriminator
/// column is absent after normalization.
pub fn classify(
    rule: &TechnologyRule,
    table: &Table,
) -> Result<ClassificationResult, SkipReason> {
    let columns = ColumnIndex::new(table.column_names());

    let (Some(lat_col), Some(lon_col)) = (columns.position(LATITUDE), columns.position(LONGITUDE))
    else {
        return Err(SkipReason::MissingCoordinateColumn);
    };
    let Some(key_col) = columns.position(rule.discriminator_column()) else {
        return Err(SkipReason::MissingDiscriminatorColumn(
            rule.discriminator_column().to_string(),
        ));
    };

    let mut result = ClassificationResult::empty(rule.technology_id());
    let mut unplotted = 0usize;

    for row in table.rows() {
        let key = row.get(key_col);
        let is_a = rule.matcher(Vendor::A).matches(key);
        let is_b = rule.matcher(Vendor::B).matches(key);

        let vendor = match (is_a, is_b) {
            (true, true) => {
                result.overlap_count += 1;
                Vendor::A
            }
            (true, false) => Vendor::A,
            (false, true) => Vendor::B,
            (false, false) => continue,
        };

        let point = coordinates(row.get(lat_col), row.get(lon_col));
        if point.is_none() {
            unplotted += 1;
        }
        result.record(vendor, point);
    }

    if result.overlap_count > 0 {
        warn!(
            technology = rule.technology_id(),
            overlap = result.overlap_count,
            "Rows matched both vendor rules; counted under vendor A"
        );
    }

    debug!(
        technology = rule.technology_id(),
        rows = table.len(),
        vendor_a = result.vendor_a_count,
        vendor_b = result.vendor_b_count,
        unplotted,
        "Technology classified"
    );

    Ok(result)
}

fn coordinates(lat: Option<&CellValue>, lon: Option<&CellValue>) -> Option<GeoPoint> {
    Some(GeoPoint {
        lat: lat?.as_f64()?,
        lon: lon?.as_f64()?,
    })
}
