//! Row-level parsing of the delimited catalog source.

use super::types::{COLUMNS, CatalogError, MedicineRecord};
use std::io::Read;

/// Records recovered from one pass over the source.
#[derive(Debug, Default)]
pub struct CatalogParse {
    /// Retained rows in source order.
    pub records: Vec<MedicineRecord>,
    /// Rows dropped for having too few fields.
    pub skipped: usize,
}

/// Parse comma-delimited catalog text, discarding the header line.
///
/// Fields may be wrapped in double quotes to embed commas, newlines, or `""`-escaped quotes.
/// Rows with fewer than nine fields are dropped with a warning and do not abort the pass;
/// decoding failures (invalid UTF-8, broken quoting) do.
pub fn parse_catalog<R: Read>(reader: R) -> Result<CatalogParse, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = CatalogParse::default();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        match MedicineRecord::from_fields(row.iter()) {
            Some(record) => parsed.records.push(record),
            None => {
                parsed.skipped += 1;
                let line = row.position().map(|position| position.line());
                tracing::warn!(
                    row = index + 1,
                    line,
                    fields = row.len(),
                    expected = COLUMNS.len(),
                    data = ?row.iter().collect::<Vec<_>>(),
                    "Skipping row with insufficient data"
                );
            }
        }
    }

    Ok(parsed)
}
