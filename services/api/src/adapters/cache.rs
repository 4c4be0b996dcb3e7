//! services/api/src/adapters/cache.rs
//!
//! A time-expiring cache in front of any `CatalogService`. Only the full index
//! is cached; detail lookups always go upstream.

use async_trait::async_trait;
use pokedex_core::domain::{EntityDetail, EntityKey, EntitySummary};
use pokedex_core::ports::{CatalogService, PortResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct CachedIndex {
    fetched_at: Instant,
    summaries: Vec<EntitySummary>,
}

pub struct CachedCatalog {
    inner: Arc<dyn CatalogService>,
    ttl: Duration,
    index: Mutex<Option<CachedIndex>>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn CatalogService>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            index: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CatalogService for CachedCatalog {
    async fn fetch_all_summaries(&self) -> PortResult<Vec<EntitySummary>> {
        // Held across the upstream call: concurrent misses wait for one fetch.
        let mut slot = self.index.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!("Serving {} summaries from the index cache", cached.summaries.len());
                return Ok(cached.summaries.clone());
            }
        }

        let summaries = self.inner.fetch_all_summaries().await?;
        *slot = Some(CachedIndex {
            fetched_at: Instant::now(),
            summaries: summaries.clone(),
        });
        Ok(summaries)
    }

    async fn fetch_detail(&self, key: &EntityKey) -> PortResult<EntityDetail> {
        self.inner.fetch_detail(key).await
    }
}
