//! services/api/src/adapters/pokeapi.rs
//!
//! This module contains the adapter for the public PokeAPI REST service.
//! It implements the `CatalogService` port from the `core` crate.

use async_trait::async_trait;
use pokedex_core::domain::{Ability, EntityDetail, EntityKey, EntitySummary, Stat, TypeSlot};
use pokedex_core::ports::{CatalogService, PortError, PortResult};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

const ARTWORK_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

static ID_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pokemon/(\d+)/?$").expect("id pattern is a valid regex"));

/// Builds the outbound client shared by all upstream requests.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `CatalogService` port on top of PokeAPI.
#[derive(Clone)]
pub struct PokeApiAdapter {
    client: Client,
    base_url: String,
    fetch_limit: u32,
}

impl PokeApiAdapter {
    /// Creates a new `PokeApiAdapter`. `fetch_limit` bounds the single index request.
    pub fn new(client: Client, base_url: impl Into<String>, fetch_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            fetch_limit,
        }
    }

    async fn get(&self, url: &str) -> PortResult<reqwest::Response> {
        self.client.get(url).send().await.map_err(|e| {
            warn!("PokeAPI request to {} failed: {}", url, e);
            PortError::UpstreamUnavailable(e.to_string())
        })
    }
}

//=========================================================================================
// "Impure" Upstream Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct IndexRecord {
    results: Vec<NamedResource>,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Deserialize)]
struct DetailRecord {
    id: u32,
    name: String,
    base_experience: Option<u32>,
    height: u32,
    weight: u32,
    #[serde(default)]
    sprites: Option<SpritesRecord>,
    #[serde(default)]
    abilities: Vec<AbilityRecord>,
    #[serde(default)]
    moves: Vec<MoveRecord>,
    types: Vec<TypeRecord>,
    stats: Vec<StatRecord>,
}

#[derive(Deserialize)]
struct SpritesRecord {
    front_default: Option<String>,
    other: Option<OtherSprites>,
}

#[derive(Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<ArtworkSprite>,
}

#[derive(Deserialize)]
struct ArtworkSprite {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct AbilityRecord {
    ability: NamedResource,
    is_hidden: bool,
    slot: u32,
}

#[derive(Deserialize)]
struct MoveRecord {
    #[serde(rename = "move")]
    move_: NamedResource,
}

#[derive(Deserialize)]
struct TypeRecord {
    slot: u32,
    #[serde(rename = "type")]
    type_: NamedResource,
}

#[derive(Deserialize)]
struct StatRecord {
    base_stat: u32,
    effort: u32,
    stat: NamedResource,
}

impl NamedResource {
    /// Maps an index entry to a summary, or `None` when it carries no usable id.
    fn to_summary(self) -> Option<EntitySummary> {
        let id = extract_id(&self.url)?;
        if self.name.trim().is_empty() {
            return None;
        }
        Some(EntitySummary {
            id,
            name: self.name,
            image_url: artwork_url(id),
        })
    }
}

impl DetailRecord {
    fn to_domain(self) -> PortResult<EntityDetail> {
        let mut types: Vec<TypeSlot> = self
            .types
            .into_iter()
            .map(|t| TypeSlot {
                slot: t.slot,
                name: t.type_.name,
            })
            .collect();
        if types.is_empty() {
            return Err(malformed(format!("Pokemon {} has no types", self.id)));
        }
        types.sort_by_key(|t| t.slot);

        let mut seen = HashSet::new();
        let mut stats = Vec::with_capacity(self.stats.len());
        for record in self.stats {
            if !seen.insert(record.stat.name.clone()) {
                return Err(malformed(format!(
                    "Pokemon {} lists stat '{}' twice",
                    self.id, record.stat.name
                )));
            }
            stats.push(Stat {
                name: record.stat.name,
                base_value: record.base_stat,
                effort: record.effort,
            });
        }

        let image_url = self.sprites.and_then(|s| {
            s.other
                .and_then(|o| o.official_artwork)
                .and_then(|a| a.front_default)
                .or(s.front_default)
        });

        Ok(EntityDetail {
            id: self.id,
            name: self.name,
            base_experience: self.base_experience,
            height: self.height,
            weight: self.weight,
            image_url,
            abilities: self
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    is_hidden: a.is_hidden,
                    slot: a.slot,
                })
                .collect(),
            moves: self.moves.into_iter().map(|m| m.move_.name).collect(),
            types,
            stats,
        })
    }
}

fn extract_id(url: &str) -> Option<u32> {
    ID_IN_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|id| *id > 0)
}

fn artwork_url(id: u32) -> String {
    format!("{}/{}.png", ARTWORK_URL_TEMPLATE, id)
}

fn malformed(detail: String) -> PortError {
    PortError::UpstreamUnavailable(format!("Malformed upstream payload: {}", detail))
}

//=========================================================================================
// `CatalogService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogService for PokeApiAdapter {
    async fn fetch_all_summaries(&self) -> PortResult<Vec<EntitySummary>> {
        let url = format!("{}/pokemon?limit={}&offset=0", self.base_url, self.fetch_limit);
        let response = self.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::UpstreamUnavailable(format!(
                "PokeAPI index returned {}",
                status
            )));
        }

        let index: IndexRecord = response
            .json()
            .await
            .map_err(|e| malformed(e.to_string()))?;

        let total = index.results.len();
        let summaries: Vec<EntitySummary> = index
            .results
            .into_iter()
            .filter_map(|record| {
                let url = record.url.clone();
                let summary = record.to_summary();
                if summary.is_none() {
                    warn!("Skipping index entry without a usable id: {}", url);
                }
                summary
            })
            .collect();

        debug!("Fetched {} of {} index entries from PokeAPI", summaries.len(), total);
        Ok(summaries)
    }

    async fn fetch_detail(&self, key: &EntityKey) -> PortResult<EntityDetail> {
        let url = format!("{}/pokemon/{}", self.base_url, key);
        let response = self.get(&url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(format!("Pokemon {} not found", key)));
        }
        if !status.is_success() {
            return Err(PortError::UpstreamUnavailable(format!(
                "PokeAPI detail returned {}",
                status
            )));
        }

        let record: DetailRecord = response
            .json()
            .await
            .map_err(|e| malformed(e.to_string()))?;
        record.to_domain()
    }
}
