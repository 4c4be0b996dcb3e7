//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the catalog endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    protocol::{
        AbilityDto, ApiResponse, ErrorReason, ErrorResponse, HttpError, LoginRequest,
        LoginResponse, PokemonDetailDto, PokemonPageDto, PokemonSummaryDto, SessionDto, StatDto,
        TypeDto, UserDto,
    },
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use pokedex_core::{
    catalog,
    domain::{EntityKey, QuerySpec, SortField, SortOrder, DEFAULT_PAGE_LIMIT},
    ports::PortError,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::session_handler,
        list_pokemons_handler,
        get_pokemon_handler,
    ),
    components(
        schemas(
            LoginRequest, LoginResponse, UserDto, SessionDto, ErrorResponse, ErrorReason,
            PokemonPageDto, PokemonSummaryDto, PokemonDetailDto, AbilityDto, TypeDto, StatDto
        )
    ),
    tags(
        (name = "Pokedex API", description = "Browse and search the Pokemon catalog.")
    )
)]
pub struct ApiDoc;

/// Renders the OpenAPI document served under `/api-docs/openapi.json`.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

//=========================================================================================
// Query Parameters
//=========================================================================================

/// Raw list parameters. Everything arrives as text so that bad values are
/// reported through the JSON envelope instead of an extractor rejection.
#[derive(Deserialize, IntoParams, Default)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, 1 to 100. Defaults to 20.
    pub limit: Option<String>,
    /// Zero-based index of the first result. Defaults to 0.
    pub offset: Option<String>,
    /// Case-insensitive substring matched against names and numbers.
    pub search: Option<String>,
    /// `name` or `number`.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_order: Option<String>,
}

impl ListQuery {
    pub fn into_spec(self) -> Result<QuerySpec, PortError> {
        let limit = parse_count("limit", self.limit.as_deref(), DEFAULT_PAGE_LIMIT)?;
        let offset = parse_count("offset", self.offset.as_deref(), 0)?;
        let sort_field = non_empty(self.sort_by)
            .map(|s| s.parse::<SortField>())
            .transpose()?;
        let sort_order = non_empty(self.sort_order)
            .map(|s| s.parse::<SortOrder>())
            .transpose()?
            .unwrap_or_default();

        QuerySpec::new(self.search, sort_field, sort_order, limit, offset)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(name: &str, raw: Option<&str>, default: usize) -> Result<usize, PortError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(default),
        Some(r) => r.parse::<usize>().map_err(|_| {
            PortError::InvalidInput(format!("{} must be a non-negative integer", name))
        }),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List Pokemon with optional search, sort, and pagination.
#[utoipa::path(
    get,
    path = "/api/pokemons",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of results", body = PokemonPageDto),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Upstream catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn list_pokemons_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let spec = query.into_spec()?;
    let page = catalog::list_summaries(app_state.catalog.as_ref(), &spec).await?;
    Ok(Json(ApiResponse::ok(PokemonPageDto::from_page(page, &spec))))
}

/// Fetch one Pokemon by number or name.
#[utoipa::path(
    get,
    path = "/api/pokemons/{id}",
    params(
        ("id" = String, Path, description = "Pokemon number or name.")
    ),
    responses(
        (status = 200, description = "The Pokemon", body = PokemonDetailDto),
        (status = 400, description = "Invalid id or name", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such Pokemon", body = ErrorResponse),
        (status = 502, description = "Upstream catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn get_pokemon_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let key = EntityKey::parse(&id)?;
    let detail = catalog::get_detail(app_state.catalog.as_ref(), &key).await?;
    Ok(Json(ApiResponse::ok(PokemonDetailDto::from(detail))))
}
