//! crates/pokedex_core/src/catalog.rs
//!
//! Catalog use cases. Each call fetches from the catalog port and, for lists,
//! runs the query pipeline over the result.

use tracing::debug;

use crate::domain::{EntityDetail, EntityKey, EntitySummary, Page, QuerySpec};
use crate::ports::{CatalogService, PortResult};
use crate::query::paginate;

pub async fn list_summaries(
    catalog: &dyn CatalogService,
    spec: &QuerySpec,
) -> PortResult<Page<EntitySummary>> {
    let all = catalog.fetch_all_summaries().await?;
    let page = paginate(&all, spec);
    debug!(
        "Query {:?} matched {} of {} summaries",
        spec.text,
        page.total_count,
        all.len()
    );
    Ok(page)
}

pub async fn get_detail(catalog: &dyn CatalogService, key: &EntityKey) -> PortResult<EntityDetail> {
    catalog.fetch_detail(key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortField, SortOrder, TypeSlot};
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCatalog {
        fetches: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CatalogService for FixedCatalog {
        async fn fetch_all_summaries(&self) -> PortResult<Vec<EntitySummary>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PortError::UpstreamUnavailable("boom".to_string()));
            }
            Ok(["bulbasaur", "ivysaur", "venusaur"]
                .iter()
                .enumerate()
                .map(|(i, name)| EntitySummary {
                    id: i as u32 + 1,
                    name: name.to_string(),
                    image_url: String::new(),
                })
                .collect())
        }

        async fn fetch_detail(&self, key: &EntityKey) -> PortResult<EntityDetail> {
            match key {
                EntityKey::Id(1) => Ok(EntityDetail {
                    id: 1,
                    name: "bulbasaur".to_string(),
                    base_experience: Some(64),
                    height: 7,
                    weight: 69,
                    image_url: None,
                    abilities: vec![],
                    moves: vec![],
                    types: vec![TypeSlot {
                        slot: 1,
                        name: "grass".to_string(),
                    }],
                    stats: vec![],
                }),
                other => Err(PortError::NotFound(other.to_string())),
            }
        }
    }

    fn catalog(fail: bool) -> FixedCatalog {
        FixedCatalog {
            fetches: AtomicUsize::new(0),
            fail,
        }
    }

    #[tokio::test]
    async fn list_fetches_once_and_paginates() {
        let catalog = catalog(false);
        let spec = QuerySpec::new(None, Some(SortField::Number), SortOrder::Desc, 2, 0).unwrap();

        let page = list_summaries(&catalog, &spec).await.unwrap();

        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.items[0].name, "venusaur");
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn upstream_failures_propagate_every_time() {
        let catalog = catalog(true);
        let spec = QuerySpec::default();
        for _ in 0..2 {
            assert!(matches!(
                list_summaries(&catalog, &spec).await,
                Err(PortError::UpstreamUnavailable(_))
            ));
        }
        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn detail_not_found_propagates() {
        let catalog = catalog(false);
        assert!(get_detail(&catalog, &EntityKey::Id(1)).await.is_ok());
        assert!(matches!(
            get_detail(&catalog, &EntityKey::Name("missingno".to_string())).await,
            Err(PortError::NotFound(_))
        ));
    }
}
