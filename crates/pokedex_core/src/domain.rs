//! crates/pokedex_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any HTTP client or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::ports::PortError;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_LIMIT: usize = 100;
pub const DEFAULT_PAGE_LIMIT: usize = 20;

//=========================================================================================
// Catalog Entities
//=========================================================================================

/// The minimal list-view representation of a Pokemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    pub id: u32,
    pub name: String,
    pub image_url: String,
}

/// A full Pokemon record as served by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDetail {
    pub id: u32,
    pub name: String,
    pub base_experience: Option<u32>,
    pub height: u32,
    pub weight: u32,
    pub image_url: Option<String>,
    pub abilities: Vec<Ability>,
    pub moves: Vec<String>,
    /// Ordered by slot, never empty.
    pub types: Vec<TypeSlot>,
    /// One entry per stat name.
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
    pub slot: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSlot {
    pub slot: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub base_value: u32,
    pub effort: u32,
}

/// Identifies a single Pokemon on the detail endpoint, either by number or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKey {
    Id(u32),
    Name(String),
}

impl EntityKey {
    /// Parses a path segment. All-digit segments are ids and must be positive;
    /// anything else is a lowercase name made of `[a-z0-9-]`.
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PortError::InvalidInput("Pokemon id or name is required".to_string()));
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return match trimmed.parse::<u32>() {
                Ok(id) if id > 0 => Ok(Self::Id(id)),
                _ => Err(PortError::InvalidInput("Invalid Pokemon ID".to_string())),
            };
        }

        let name = trimmed.to_lowercase();
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(PortError::InvalidInput(format!(
                "Invalid Pokemon name: '{}'",
                trimmed
            )));
        }
        Ok(Self::Name(name))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}

//=========================================================================================
// Query Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Number,
}

impl FromStr for SortField {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "number" => Ok(Self::Number),
            other => Err(PortError::InvalidInput(format!(
                "sortBy must be one of 'name' or 'number', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(PortError::InvalidInput(format!(
                "sortOrder must be one of 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

/// A validated list request. Construct through [`QuerySpec::new`] so the
/// pipeline can rely on `1 <= limit <= MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub text: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

impl QuerySpec {
    pub fn new(
        text: Option<String>,
        sort_field: Option<SortField>,
        sort_order: SortOrder,
        limit: usize,
        offset: usize,
    ) -> Result<Self, PortError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PortError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(Self {
            text,
            sort_field,
            sort_order,
            limit,
            offset,
        })
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            text: None,
            sort_field: None,
            sort_order: SortOrder::Asc,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// One window of a filtered, sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Post-filter, pre-pagination count.
    pub total_count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

//=========================================================================================
// Auth Entities
//=========================================================================================

/// The claims carried by a session token. The signed token is the only
/// persisted form; there is no server-side session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

// Represents a user - returned to the client after login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

/// What a successful login hands back to the shell.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
    pub session: Session,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_key_parses_ids_and_names() {
        assert_eq!(EntityKey::parse("25").unwrap(), EntityKey::Id(25));
        assert_eq!(
            EntityKey::parse(" Mr-Mime ").unwrap(),
            EntityKey::Name("mr-mime".to_string())
        );
    }

    #[test]
    fn entity_key_rejects_zero_and_garbage() {
        assert!(matches!(EntityKey::parse("0"), Err(PortError::InvalidInput(_))));
        assert!(matches!(EntityKey::parse(""), Err(PortError::InvalidInput(_))));
        assert!(matches!(EntityKey::parse("../etc"), Err(PortError::InvalidInput(_))));
        assert!(matches!(
            EntityKey::parse("99999999999"),
            Err(PortError::InvalidInput(_))
        ));
    }

    #[test]
    fn query_spec_bounds_limit() {
        assert!(QuerySpec::new(None, None, SortOrder::Asc, 0, 0).is_err());
        assert!(QuerySpec::new(None, None, SortOrder::Asc, 101, 0).is_err());
        let spec = QuerySpec::new(None, None, SortOrder::Asc, 100, 5000).unwrap();
        assert_eq!(spec.limit, 100);
        assert_eq!(spec.offset, 5000);
    }

    #[test]
    fn sort_params_parse_lowercase_only() {
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert_eq!("number".parse::<SortField>().unwrap(), SortField::Number);
        assert!("id".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("DESC".parse::<SortOrder>().is_err());
    }
}
