//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Every body shares the `{ success, data?, message? }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use pokedex_core::domain::{EntityDetail, EntitySummary, Page, QuerySpec, Session, User};
use pokedex_core::ports::PortError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

//=========================================================================================
// Envelope
//=========================================================================================

/// The success envelope wrapping every `data` payload.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Machine-readable failure category, so clients can tell a malformed request
/// from a rejected login.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    InvalidInput,
    InvalidCredentials,
    Unauthorized,
    NotFound,
    UpstreamUnavailable,
    Internal,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub reason: ErrorReason,
    pub message: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl HttpError {
    pub fn new(status: StatusCode, reason: ErrorReason, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                success: false,
                reason,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorReason::Unauthorized,
            "Authentication required",
        )
    }
}

impl From<PortError> for HttpError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::InvalidInput(message) => {
                Self::new(StatusCode::BAD_REQUEST, ErrorReason::InvalidInput, message)
            }
            PortError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                ErrorReason::InvalidCredentials,
                "Invalid credentials",
            ),
            PortError::Unauthorized => Self::unauthorized(),
            PortError::NotFound(message) => {
                Self::new(StatusCode::NOT_FOUND, ErrorReason::NotFound, message)
            }
            PortError::UpstreamUnavailable(message) => {
                warn!("Upstream catalog unavailable: {}", message);
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    ErrorReason::UpstreamUnavailable,
                    "The Pokemon catalog is unavailable, please try again",
                )
            }
            PortError::Unexpected(message) => {
                error!("Unexpected error: {}", message);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorReason::Internal,
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

//=========================================================================================
// Auth Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    // Missing fields become empty strings so they surface as `invalid_input`.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UserDto {
    pub username: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserDto,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            subject: session.subject,
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        }
    }
}

//=========================================================================================
// Catalog Payloads
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PokemonSummaryDto {
    pub id: u32,
    pub name: String,
    pub image_url: String,
}

impl From<EntitySummary> for PokemonSummaryDto {
    fn from(summary: EntitySummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image_url: summary.image_url,
        }
    }
}

/// One page of the list endpoint. `next` and `previous` are ready-made
/// `offset=..&limit=..` query strings for the neighbouring pages.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PokemonPageDto {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub has_next: bool,
    pub has_previous: bool,
    pub results: Vec<PokemonSummaryDto>,
}

impl PokemonPageDto {
    pub fn from_page(page: Page<EntitySummary>, spec: &QuerySpec) -> Self {
        let next = page
            .has_next
            .then(|| format!("offset={}&limit={}", spec.offset + spec.limit, spec.limit));
        let previous = page.has_previous.then(|| {
            format!(
                "offset={}&limit={}",
                spec.offset.saturating_sub(spec.limit),
                spec.limit
            )
        });

        Self {
            count: page.total_count,
            next,
            previous,
            has_next: page.has_next,
            has_previous: page.has_previous,
            results: page.items.into_iter().map(PokemonSummaryDto::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AbilityDto {
    pub name: String,
    pub is_hidden: bool,
    pub slot: u32,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct TypeDto {
    pub slot: u32,
    pub name: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatDto {
    pub name: String,
    pub base_value: u32,
    pub effort: u32,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetailDto {
    pub id: u32,
    pub name: String,
    pub base_experience: Option<u32>,
    pub height: u32,
    pub weight: u32,
    pub image_url: Option<String>,
    pub abilities: Vec<AbilityDto>,
    pub moves: Vec<String>,
    pub types: Vec<TypeDto>,
    pub stats: Vec<StatDto>,
}

impl From<EntityDetail> for PokemonDetailDto {
    fn from(detail: EntityDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            base_experience: detail.base_experience,
            height: detail.height,
            weight: detail.weight,
            image_url: detail.image_url,
            abilities: detail
                .abilities
                .into_iter()
                .map(|a| AbilityDto {
                    name: a.name,
                    is_hidden: a.is_hidden,
                    slot: a.slot,
                })
                .collect(),
            moves: detail.moves,
            types: detail
                .types
                .into_iter()
                .map(|t| TypeDto {
                    slot: t.slot,
                    name: t.name,
                })
                .collect(),
            stats: detail
                .stats
                .into_iter()
                .map(|s| StatDto {
                    name: s.name,
                    base_value: s.base_value,
                    effort: s.effort,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_core::domain::SortOrder;

    fn page(total: usize, has_next: bool, has_previous: bool) -> Page<EntitySummary> {
        Page {
            items: vec![],
            total_count: total,
            has_next,
            has_previous,
        }
    }

    #[test]
    fn page_links_are_offset_limit_query_strings() {
        let spec = QuerySpec::new(None, None, SortOrder::Asc, 20, 10).unwrap();
        let dto = PokemonPageDto::from_page(page(100, true, true), &spec);
        assert_eq!(dto.next.as_deref(), Some("offset=30&limit=20"));
        // Previous never goes below zero.
        assert_eq!(dto.previous.as_deref(), Some("offset=0&limit=20"));
    }

    #[test]
    fn page_links_are_absent_at_the_edges() {
        let spec = QuerySpec::new(None, None, SortOrder::Asc, 20, 0).unwrap();
        let dto = PokemonPageDto::from_page(page(5, false, false), &spec);
        assert!(dto.next.is_none());
        assert!(dto.previous.is_none());
        assert_eq!(dto.count, 5);
    }

    #[test]
    fn port_errors_map_to_distinct_statuses() {
        let cases = [
            (PortError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (PortError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (PortError::Unauthorized, StatusCode::UNAUTHORIZED),
            (PortError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PortError::UpstreamUnavailable("x".into()), StatusCode::BAD_GATEWAY),
            (PortError::Unexpected("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status, status);
        }
    }

    #[test]
    fn error_body_serializes_reason_in_snake_case() {
        let err = HttpError::from(PortError::InvalidCredentials);
        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["reason"], "invalid_credentials");
    }
}
