pub mod cache;
pub mod credentials;
pub mod jwt;
pub mod pokeapi;

pub use cache::CachedCatalog;
pub use credentials::StaticCredentialStore;
pub use jwt::JwtTokenSigner;
pub use pokeapi::PokeApiAdapter;
