//! Load-once in-memory cache over a [`CatalogSource`].

use super::{source::CatalogSource, types::MedicineRecord};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Shared, immutable view of the loaded catalog.
pub type Catalog = Arc<[MedicineRecord]>;

/// Lazily populated catalog cache.
///
/// The first call to [`CatalogCache::load`] that produces at least one record installs the
/// result; every later call returns the same [`Catalog`] without touching the source.
/// Concurrent first callers are serialized so the source is read at most once per
/// successful population. Failed or empty loads leave the cache empty and are retried on
/// the next call.
pub struct CatalogCache {
    source: Box<dyn CatalogSource>,
    records: OnceCell<Catalog>,
}

/// Why a load attempt did not populate the cache.
struct Unpopulated;

impl CatalogCache {
    /// Create an empty cache reading from `source`.
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self {
            source,
            records: OnceCell::new(),
        }
    }

    /// Return the catalog, loading it from the source if nothing is cached yet.
    ///
    /// Never fails: source errors are logged and surface as an empty catalog.
    pub async fn load(&self) -> Catalog {
        match self
            .records
            .get_or_try_init(|| self.populate())
            .await
        {
            Ok(records) => Arc::clone(records),
            Err(Unpopulated) => Arc::from(Vec::new()),
        }
    }

    /// Return the cached catalog without triggering a load.
    pub fn cached(&self) -> Option<Catalog> {
        self.records.get().cloned()
    }

    async fn populate(&self) -> Result<Catalog, Unpopulated> {
        let location = self.source.describe();
        let parsed = match self.source.read_catalog().await {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::error!(source = %location, error = %error, "Failed to load medicine catalog");
                return Err(Unpopulated);
            }
        };

        if parsed.records.is_empty() {
            tracing::warn!(
                source = %location,
                skipped = parsed.skipped,
                "Catalog source contained no usable rows"
            );
            return Err(Unpopulated);
        }

        tracing::info!(
            source = %location,
            count = parsed.records.len(),
            skipped = parsed.skipped,
            "Successfully loaded {} medicine entries",
            parsed.records.len()
        );
        Ok(Arc::from(parsed.records))
    }
}
