//! CSV source files
//!
//! Reads a whole file into memory as raw strings. No type inference happens
//! here; the only interpretation is deciding which cells are blank.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::error::Result;

/// Cell spellings treated as missing, on top of empty cells. These match the
/// NA markers of common dataframe CSV exports.
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A parsed CSV file: header plus records in file order
#[derive(Debug, Clone)]
pub struct SourceTable {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl SourceTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            columns = table.headers.len(),
            records = table.records.len(),
            "Read CSV"
        );
        Ok(table)
    }

    /// Rows may be shorter or longer than the header. Blank lines are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of the first header called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn records(&self) -> impl Iterator<Item = SourceRecord<'_>> {
        self.records.iter().map(|record| SourceRecord { record })
    }
}

/// One CSV row, read only
#[derive(Debug, Clone, Copy)]
pub struct SourceRecord<'a> {
    record: &'a StringRecord,
}

impl<'a> SourceRecord<'a> {
    /// Raw cell at `index`, or `None` for the blank marker (empty, NA
    /// spelling, or past the end of a short row).
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.record
            .get(index)
            .filter(|cell| !cell.is_empty() && !NA_MARKERS.contains(cell))
    }
}
