//! Medicine catalog loading: source access, row parsing, and the load-once cache.

mod cache;
pub mod parser;
mod source;
pub mod types;

pub use cache::{Catalog, CatalogCache};
pub use parser::{CatalogParse, parse_catalog};
pub use source::{CatalogSource, FileCatalogSource};
pub use types::{COLUMNS, CatalogError, MedicineRecord, Price, UnitSize};
