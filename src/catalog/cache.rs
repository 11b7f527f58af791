//! Catalog cache and fetch orchestration
//!
//! The cache is an explicit object owned by [`CatalogService`] and shared
//! through `AppState`, not module-level state. The read path never fails:
//! fresh cache, else refetch, else stale cache, else the static fallback.
//!
//! There is deliberately no single-flight around the refresh: two concurrent
//! readers past the TTL both fetch. The fetch is idempotent and the cache
//! write a pure overwrite, so the redundancy is harmless.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::airtable::AirtableClient;
use super::normalize::normalize_all;
use super::{Product, fallback};
use crate::error::{AppError, BoxError};

/// How long a fetched catalog stays fresh
pub const CATALOG_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    products: Vec<Product>,
    expires_at: Instant,
}

/// Time-boxed holder for the last successfully fetched product list
pub struct CatalogCache {
    inner: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(None),
            ttl,
        }
    }

    /// The cached list, only if it has not expired
    pub async fn fresh(&self) -> Option<Vec<Product>> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|e| Instant::now() < e.expires_at)
            .map(|e| e.products.clone())
    }

    /// The cached list regardless of age (stale-serve on upstream failure)
    pub async fn any(&self) -> Option<Vec<Product>> {
        let guard = self.inner.read().await;
        guard.as_ref().map(|e| e.products.clone())
    }

    /// Replace the cache contents and restart the TTL
    pub async fn store(&self, products: Vec<Product>) {
        let mut guard = self.inner.write().await;
        *guard = Some(CacheEntry {
            products,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Drop the cached list so the next read refetches
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

/// Catalog access: cache in front of Airtable, static fallback behind it
#[derive(Clone)]
pub struct CatalogService {
    airtable: AirtableClient,
    cache: Arc<CatalogCache>,
}

impl CatalogService {
    pub fn new(airtable: AirtableClient) -> Self {
        Self {
            airtable,
            cache: Arc::new(CatalogCache::new(CATALOG_TTL)),
        }
    }

    pub fn airtable(&self) -> &AirtableClient {
        &self.airtable
    }

    /// Fetch, normalize, and filter the upstream table. Zero valid records
    /// counts as a failure.
    async fn fetch_catalog(&self) -> Result<Vec<Product>, BoxError> {
        let records = self.airtable.fetch_all().await?;
        let products = normalize_all(&records);
        if products.is_empty() {
            return Err("catalog fetch produced zero valid records".into());
        }
        Ok(products)
    }

    /// The product list. Never fails: fresh cache, refetched data, stale
    /// cache, or the static fallback, in that order.
    pub async fn products(&self) -> Vec<Product> {
        if let Some(products) = self.cache.fresh().await {
            return products;
        }

        match self.fetch_catalog().await {
            Ok(products) => {
                self.cache.store(products.clone()).await;
                tracing::info!(count = products.len(), "catalog refreshed");
                products
            }
            Err(err) => {
                if let Some(stale) = self.cache.any().await {
                    tracing::warn!(error = %err, "catalog fetch failed, serving stale cache");
                    stale
                } else {
                    tracing::warn!(error = %err, "catalog fetch failed, serving static fallback");
                    fallback::catalog()
                }
            }
        }
    }

    /// Find one product by id
    pub async fn find(&self, product_id: &str) -> Result<Product, AppError> {
        self.products()
            .await
            .into_iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
    }

    /// Explicit reload: force a fetch and surface any failure to the caller.
    pub async fn reload(&self) -> Result<Vec<Product>, AppError> {
        let products = self
            .fetch_catalog()
            .await
            .map_err(|e| AppError::Upstream(format!("catalog reload failed: {e}")))?;
        self.cache.store(products.clone()).await;
        tracing::info!(count = products.len(), "catalog reloaded");
        Ok(products)
    }

    /// Invalidate cached data after an external write
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        fallback::catalog().into_iter().take(3).collect()
    }

    #[tokio::test]
    async fn fresh_entries_are_served_unchanged() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        cache.store(sample()).await;

        let first = cache.fresh().await.expect("fresh after store");
        let second = cache.fresh().await.expect("still fresh");
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn expired_entries_are_not_fresh_but_still_stale_servable() {
        let cache = CatalogCache::new(Duration::ZERO);
        cache.store(sample()).await;

        assert!(cache.fresh().await.is_none());
        assert_eq!(cache.any().await.expect("stale entry kept").len(), 3);
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        cache.store(sample()).await;
        cache.clear().await;
        assert!(cache.fresh().await.is_none());
        assert!(cache.any().await.is_none());
    }

    fn unreachable_service() -> CatalogService {
        // Nothing listens on port 9; every fetch fails fast
        let airtable = AirtableClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9".into(),
            "appTEST".into(),
            "Products".into(),
            "pat-test".into(),
        );
        CatalogService::new(airtable)
    }

    #[tokio::test]
    async fn unreachable_upstream_serves_the_static_fallback() {
        let service = unreachable_service();
        let products = service.products().await;
        assert_eq!(products.len(), 20);
    }

    #[tokio::test]
    async fn explicit_reload_surfaces_upstream_failure() {
        let service = unreachable_service();
        let err = service.reload().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn find_falls_back_like_products_does() {
        let service = unreachable_service();
        assert!(service.find("tee-classic").await.is_ok());
        assert!(matches!(
            service.find("no-such-product").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn empty_cache_has_nothing_to_serve() {
        let cache = CatalogCache::new(Duration::from_secs(300));
        assert!(cache.fresh().await.is_none());
        assert!(cache.any().await.is_none());
    }
}
