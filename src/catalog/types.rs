//! Record types and error definitions for the medicine catalog.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Column names of the source file, in the order they appear on each row.
pub const COLUMNS: [&str; 9] = [
    "medicine_name",
    "category_name",
    "slug",
    "generic_name",
    "strength",
    "manufacturer_name",
    "unit",
    "unit_size",
    "price",
];

/// Errors that abort a catalog load attempt.
///
/// None of these reach the HTTP layer: the cache logs them and serves an empty catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured source file does not exist.
    #[error("catalog source not found: {}", path.display())]
    SourceNotFound {
        /// Path that was probed.
        path: PathBuf,
    },
    /// The source exists but could not be read.
    #[error("failed to read catalog source {}: {source}", path.display())]
    SourceRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The source could not be decoded as delimited UTF-8 text.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] csv::Error),
    /// The blocking parse task panicked or was cancelled.
    #[error("catalog parse task failed: {0}")]
    ParseTask(#[from] tokio::task::JoinError),
}

/// Pack size of a medicine: a count when the source value is all digits, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnitSize {
    /// Numeric pack size.
    Count(i64),
    /// Source value that is not a plain digit string (e.g. `"10's"`).
    Text(String),
}

impl UnitSize {
    /// Interpret a raw source field.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(count) = raw.parse() {
                return Self::Count(count);
            }
        }
        Self::Text(raw.to_string())
    }
}

/// Listed price of a medicine: a decimal amount when parseable, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Price {
    /// Parsed decimal amount.
    Amount(f64),
    /// Source value that did not parse as a finite number.
    Text(String),
}

impl Price {
    /// Interpret a raw source field.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => Self::Amount(amount),
            _ => Self::Text(raw.to_string()),
        }
    }
}

/// One row of the medicine catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineRecord {
    /// Brand or trade name.
    pub medicine_name: String,
    /// Dosage form category (tablet, syrup, ...).
    pub category_name: String,
    /// Unique identifier used for direct lookup.
    pub slug: String,
    /// Generic (active ingredient) name.
    pub generic_name: String,
    /// Strength as printed on the pack.
    pub strength: String,
    /// Manufacturer name.
    pub manufacturer_name: String,
    /// Unit of sale.
    pub unit: String,
    /// Number of units per pack.
    pub unit_size: UnitSize,
    /// Listed price.
    pub price: Price,
}

impl MedicineRecord {
    /// Build a record from a source row, mapping fields positionally.
    ///
    /// Returns `None` when the row has fewer fields than [`COLUMNS`]. Extra trailing fields
    /// are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter();
        let mut next = || fields.next().map(str::to_string);
        Some(Self {
            medicine_name: next()?,
            category_name: next()?,
            slug: next()?,
            generic_name: next()?,
            strength: next()?,
            manufacturer_name: next()?,
            unit: next()?,
            unit_size: UnitSize::parse(&next()?),
            price: Price::parse(&next()?),
        })
    }

    /// Whether `needle` (already lowercased) occurs in the name, generic name, or manufacturer.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [
            &self.medicine_name,
            &self.generic_name,
            &self.manufacturer_name,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
