//! CSV ingestion for cell databases.
//!
//! A workbook is a directory holding one CSV per sheet; the file stem is the
//! sheet name (`2G.csv`, `3G.csv`, ...). Blank cells become
//! [`CellValue::Empty`]; every other cell is kept as text, spelled as written.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::table::{CellValue, Table, Workbook};

/// Sheets read from CSV files, keyed by sheet name.
#[derive(Debug, Default)]
pub struct CsvWorkbook {
    sheets: BTreeMap<String, Table>,
}

impl CsvWorkbook {
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.sheets.insert(name.into(), table);
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl Workbook for CsvWorkbook {
    fn sheet_names(&self) -> Vec<&str> {
        self.sheets.sheet_names()
    }

    fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.get(name)
    }
}

/// Parses one CSV sheet. Rows may be shorter or longer than the header row.
///
/// # Errors
///
/// Returns an error if the input is not readable CSV.
pub fn parse_sheet<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers, Vec::new());

    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(CellValue::parse).collect());
    }

    Ok(table)
}

/// Loads every `*.csv` file in `dir` as a sheet.
pub fn load_workbook_dir(dir: impl AsRef<Path>) -> Result<CsvWorkbook> {
    let dir = dir.as_ref();
    let mut workbook = CsvWorkbook::default();

    for entry in
        fs::read_dir(dir).with_context(|| format!("reading workbook directory {}", dir.display()))?
    {
        let path = entry?.path();

        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let file = fs::File::open(&path)
            .with_context(|| format!("opening sheet {}", path.display()))?;
        let table =
            parse_sheet(file).with_context(|| format!("parsing sheet {}", path.display()))?;

        debug!(sheet = name, rows = table.len(), "Sheet loaded");
        workbook.insert(name, table);
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::aggregate;
    use crate::rules::RuleRegistry;
    use std::env;

    #[test]
    fn test_parse_sheet_types_cells() {
        let data = "BSC,LATITUDE,LONGITUDE\nE001,40.4,49.8\nH002,,49.9\n";
        let table = parse_sheet(data.as_bytes()).unwrap();

        assert_eq!(table.column_names(), ["BSC", "LATITUDE", "LONGITUDE"]);
        assert_eq!(table.len(), 2);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0][0], CellValue::Text("E001".to_string()));
        assert_eq!(rows[0][1], CellValue::Text("40.4".to_string()));
        assert_eq!(rows[1][1], CellValue::Empty);
    }

    #[test]
    fn test_number_like_codes_match_rules_verbatim() {
        let rules = RuleRegistry::from_json(
            r#"{ "technologies": [
                { "id": "2G", "column": "BSC", "vendor_a": ["0123"], "vendor_b": "1E",
                  "vendor_a_color": "orange", "vendor_b_color": "gray" }
            ]}"#,
        )
        .unwrap();
        let data = "BSC,LATITUDE,LONGITUDE\n0123,40.4,49.8\n1E5,40.5,49.9\n";
        let mut book = CsvWorkbook::default();
        book.insert("2G", parse_sheet(data.as_bytes()).unwrap());

        let agg = aggregate(&rules, &book);
        let result = agg.result("2G").unwrap();
        assert_eq!((result.vendor_a_count, result.vendor_b_count), (1, 1));
        assert_eq!(result.vendor_a_points.len(), 1);
        assert_eq!(result.vendor_b_points.len(), 1);
    }

    #[test]
    fn test_parse_sheet_keeps_header_spelling() {
        let data = " bsc , Latidude,LONGTITUDE\n";
        let table = parse_sheet(data.as_bytes()).unwrap();
        assert_eq!(table.column_names(), [" bsc ", " Latidude", "LONGTITUDE"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_sheet_accepts_ragged_rows() {
        let data = "BSC,LATITUDE,LONGITUDE\nE001\n";
        let table = parse_sheet(data.as_bytes()).unwrap();
        assert_eq!(table.rows().next().unwrap().len(), 1);
    }

    #[test]
    fn test_load_workbook_dir_uses_file_stems() {
        let dir = env::temp_dir().join("cellmap_test_workbook_dir");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("2G.csv"), "BSC,LATITUDE,LONGITUDE\nE1,1,2\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let workbook = load_workbook_dir(&dir).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["2G"]);
        assert_eq!(workbook.sheet("2G").unwrap().len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_dir_errors() {
        assert!(load_workbook_dir("/nonexistent/cellmap-workbook").is_err());
    }
}
