//! Query service answering search and lookup requests over the cached catalog.

use crate::catalog::{CatalogCache, MedicineRecord};
use async_trait::async_trait;

/// Read-only queries over the medicine catalog used by the HTTP surface.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Records whose name, generic name, or manufacturer contains `query`, ignoring case.
    async fn search(&self, query: &str) -> Vec<MedicineRecord>;

    /// Record whose slug equals `id` exactly.
    async fn get_by_identifier(&self, id: &str) -> Option<MedicineRecord>;
}

/// Catalog queries backed by a [`CatalogCache`].
///
/// Every query loads the catalog through the cache first, so the first request after
/// startup (or after a failed load) pays for reading the source.
pub struct CatalogService {
    cache: CatalogCache,
}

impl CatalogService {
    /// Wrap an existing cache.
    pub fn new(cache: CatalogCache) -> Self {
        Self { cache }
    }

    /// Warm the cache and report how many records are available.
    pub async fn preload(&self) -> usize {
        self.cache.load().await.len()
    }

    /// Number of cached records, without triggering a load.
    pub fn catalog_size(&self) -> usize {
        self.cache.cached().map_or(0, |records| records.len())
    }

    /// Case-insensitive substring search in catalog order. An empty query matches everything.
    pub async fn search(&self, query: &str) -> Vec<MedicineRecord> {
        let records = self.cache.load().await;
        let needle = query.to_lowercase();
        let matches: Vec<MedicineRecord> = records
            .iter()
            .filter(|record| record.matches_lowercase(&needle))
            .cloned()
            .collect();
        tracing::debug!(query, matches = matches.len(), "Catalog search completed");
        matches
    }

    /// First record whose slug equals `id`, compared case-sensitively.
    pub async fn get_by_identifier(&self, id: &str) -> Option<MedicineRecord> {
        let records = self.cache.load().await;
        let found = records.iter().find(|record| record.slug == id).cloned();
        if found.is_none() {
            tracing::debug!(id, "Medicine not found");
        }
        found
    }
}

#[async_trait]
impl CatalogApi for CatalogService {
    async fn search(&self, query: &str) -> Vec<MedicineRecord> {
        CatalogService::search(self, query).await
    }

    async fn get_by_identifier(&self, id: &str) -> Option<MedicineRecord> {
        CatalogService::get_by_identifier(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, CatalogParse, CatalogSource, parse_catalog};
    use std::path::PathBuf;

    const CSV: &str = "medicine_name,category_name,slug,generic_name,strength,manufacturer_name,unit,unit_size,price\n\
        Napa,Tablet,napa,Paracetamol,500 mg,Beximco Pharmaceuticals,Strip,10,1.2\n\
        Ace Plus,Tablet,ace-plus,Paracetamol + Caffeine,500 mg+65 mg,Square Pharmaceuticals,Strip,10,2.5\n\
        Seclo,Capsule,seclo,Omeprazole,20 mg,Square Pharmaceuticals,Strip,14,5\n\
        Parapyrol,Syrup,parapyrol,Cefuroxime,250 mg,Opsonin,Bottle,1,120\n";

    struct StaticSource(Option<&'static str>);

    #[async_trait]
    impl CatalogSource for StaticSource {
        async fn read_catalog(&self) -> Result<CatalogParse, CatalogError> {
            match self.0 {
                Some(body) => parse_catalog(body.as_bytes()),
                None => Err(CatalogError::SourceNotFound {
                    path: PathBuf::from("medicine.csv"),
                }),
            }
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    fn service(body: Option<&'static str>) -> CatalogService {
        CatalogService::new(CatalogCache::new(Box::new(StaticSource(body))))
    }

    fn slugs(records: &[MedicineRecord]) -> Vec<&str> {
        records.iter().map(|record| record.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_query_returns_whole_catalog_in_order() {
        let service = service(Some(CSV));
        let results = service.search("").await;
        assert_eq!(slugs(&results), ["napa", "ace-plus", "seclo", "parapyrol"]);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let service = service(Some(CSV));
        let upper = service.search("PARA").await;
        let lower = service.search("para").await;
        assert_eq!(upper, lower);
        assert_eq!(slugs(&upper), ["napa", "ace-plus", "parapyrol"]);
    }

    #[tokio::test]
    async fn search_covers_manufacturer_only() {
        let service = service(Some(CSV));
        assert_eq!(slugs(&service.search("square").await), ["ace-plus", "seclo"]);
        assert!(service.search("capsule").await.is_empty());
        assert!(service.search("strip").await.is_empty());
    }

    #[tokio::test]
    async fn search_is_idempotent() {
        let service = service(Some(CSV));
        assert_eq!(service.search("ome").await, service.search("ome").await);
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let service = service(Some(CSV));
        let seclo = service.get_by_identifier("seclo").await.expect("seclo");
        assert_eq!(seclo.medicine_name, "Seclo");
        assert!(service.get_by_identifier("Seclo").await.is_none());
        assert!(service.get_by_identifier("secl").await.is_none());
        assert!(service.get_by_identifier("").await.is_none());
    }

    #[tokio::test]
    async fn missing_source_yields_empty_results() {
        let service = service(None);
        assert_eq!(service.preload().await, 0);
        assert!(service.search("").await.is_empty());
        assert!(service.get_by_identifier("napa").await.is_none());
        assert_eq!(service.catalog_size(), 0);
    }

    #[tokio::test]
    async fn catalog_size_reflects_cache() {
        let service = service(Some(CSV));
        assert_eq!(service.catalog_size(), 0);
        assert_eq!(service.preload().await, 4);
        assert_eq!(service.catalog_size(), 4);
    }
}
