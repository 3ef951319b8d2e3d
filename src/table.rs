//! In-memory tabular data handed to the classifier.
//!
//! A [`Workbook`] is anything that can list its sheet names and hand out a
//! [`Table`] per sheet. The classifier never mutates a table.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single cell as read from a sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Builds a cell from raw sheet text. Blanks are empty; anything else keeps
    /// its spelling so codes such as `0123` or `1E5` match rules verbatim.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(_) => false,
        }
    }

    /// Numeric view used for coordinates. Text is accepted when it parses as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

/// Whole numbers render without a fractional part so `6630.0` compares as `"6630"`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One sheet: a header row plus data rows. Short rows read as empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Headers exactly as the sheet spelled them.
    pub fn column_names(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }
}

/// Source of per-technology tables.
pub trait Workbook {
    fn sheet_names(&self) -> Vec<&str>;
    fn sheet(&self, name: &str) -> Option<&Table>;
}

impl Workbook for BTreeMap<String, Table> {
    fn sheet_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn sheet(&self, name: &str) -> Option<&Table> {
        self.get(name)
    }
}

impl Workbook for HashMap<String, Table> {
    fn sheet_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn sheet(&self, name: &str) -> Option<&Table> {
        self.get(name)
    }
}
