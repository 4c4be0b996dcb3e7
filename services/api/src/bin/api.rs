//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        pokeapi::http_client, CachedCatalog, JwtTokenSigner, PokeApiAdapter,
        StaticCredentialStore,
    },
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use chrono::Duration as ChronoDuration;
use pokedex_core::{gate::SessionGate, ports::CatalogService};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Catalog Adapter ---
    let client = http_client(Duration::from_secs(config.upstream_timeout_secs))?;
    let pokeapi: Arc<dyn CatalogService> = Arc::new(PokeApiAdapter::new(
        client,
        config.pokeapi_base_url.clone(),
        config.catalog_fetch_limit,
    ));
    let catalog: Arc<dyn CatalogService> = if config.catalog_cache_ttl_secs > 0 {
        info!(
            "Caching the PokeAPI index for {}s",
            config.catalog_cache_ttl_secs
        );
        Arc::new(CachedCatalog::new(
            pokeapi,
            Duration::from_secs(config.catalog_cache_ttl_secs),
        ))
    } else {
        pokeapi
    };

    // --- 3. Initialize the Session Gate ---
    let gate = SessionGate::new(
        Arc::new(StaticCredentialStore::new(
            config.auth_username.clone(),
            config.auth_password.clone(),
        )),
        Arc::new(JwtTokenSigner::new(&config.jwt_secret)),
        ChronoDuration::days(config.session_ttl_days),
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState { catalog, gate });

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
