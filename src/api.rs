//! HTTP surface for the medicine catalog.
//!
//! - `GET /` – Liveness placeholder returning `{"message": "Hello World"}`.
//! - `POST /search` – Case-insensitive substring search over medicine name, generic name, and
//!   manufacturer. Accepts `{"query": "..."}` and returns `{"results": [...]}` in catalog order,
//!   capped at `SEARCH_RESULT_LIMIT` records (20 by default).
//! - `GET /medicine/:id` – Exact slug lookup. Misses return `404` with
//!   `{"error": "Medicine not found"}`.

use crate::catalog::MedicineRecord;
use crate::config::get_config;
use crate::service::CatalogApi;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the HTTP router exposing the catalog queries.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: CatalogApi + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/search", post(search::<S>))
        .route("/medicine/:id", get(get_medicine::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World",
    })
}

/// Request body for `POST /search`.
#[derive(Deserialize)]
struct SearchRequest {
    /// Substring to look for; an empty string matches every record.
    query: String,
}

/// Response body for `POST /search`.
#[derive(Serialize)]
struct SearchResponse {
    results: Vec<MedicineRecord>,
}

/// Search the catalog and return the first matches in catalog order.
async fn search<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse>
where
    S: CatalogApi,
{
    let limit = get_config().search_result_limit;
    let mut results = service.search(&request.query).await;
    let total = results.len();
    results.truncate(limit);
    tracing::info!(
        query = %request.query,
        total,
        returned = results.len(),
        "Search request completed"
    );
    Json(SearchResponse { results })
}

/// Fetch a single record by slug.
async fn get_medicine<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<MedicineRecord>, AppError>
where
    S: CatalogApi,
{
    service
        .get_by_identifier(&id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Error body shared by failing endpoints.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

enum AppError {
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Medicine not found",
                }),
            )
                .into_response(),
        }
    }
}
