use std::collections::HashMap;

pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";

/// Misspelled headers seen in cell databases, mapped onto canonical names.
static SYNONYMS: &[(&str, &str)] = &[("LATIDUDE", LATITUDE), ("LONGTITUDE", LONGITUDE)];

/// Trims and uppercases a header, then resolves known misspellings.
pub fn canonical_column(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    SYNONYMS
        .iter()
        .find(|(wrong, _)| *wrong == upper)
        .map(|(_, right)| right.to_string())
        .unwrap_or(upper)
}

/// Canonical column name to position in the original header row.
///
/// When two headers collapse onto the same canonical name the first one wins.
#[derive(Debug, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            positions.entry(canonical_column(header)).or_insert(i);
        }
        Self { positions }
    }

    pub fn position(&self, canonical: &str) -> Option<usize> {
        self.positions.get(canonical).copied()
    }
}
