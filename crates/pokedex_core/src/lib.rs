pub mod catalog;
pub mod domain;
pub mod gate;
pub mod ports;
pub mod query;

pub use domain::{
    Ability, EntityDetail, EntityKey, EntitySummary, LoginGrant, Page, QuerySpec, Session,
    SortField, SortOrder, Stat, TypeSlot, User,
};
pub use gate::SessionGate;
pub use ports::{CatalogService, CredentialStore, PortError, PortResult, TokenSigner};
