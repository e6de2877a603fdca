//! Backing stores the catalog can be read from.

use super::{
    parser::{CatalogParse, parse_catalog},
    types::CatalogError,
};
use async_trait::async_trait;
use std::{io::ErrorKind, path::PathBuf};

/// Interface implemented by catalog backends.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Read and parse every record from the backing store.
    async fn read_catalog(&self) -> Result<CatalogParse, CatalogError>;

    /// Human-readable location used in diagnostics.
    fn describe(&self) -> String;
}

/// Catalog stored as a delimited text file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    /// Read the catalog from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn read_catalog(&self) -> Result<CatalogParse, CatalogError> {
        tracing::debug!(path = %self.path.display(), "Reading catalog source");
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                CatalogError::SourceNotFound {
                    path: self.path.clone(),
                }
            } else {
                CatalogError::SourceRead {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        run_blocking(move || parse_catalog(bytes.as_slice())).await
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Run CPU-bound catalog work on the blocking pool so request workers keep serving.
async fn run_blocking<T, F>(work: F) -> Result<T, CatalogError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
