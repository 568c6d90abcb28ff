use crate::error::{ApiError, ErrorResponse};
use crate::models::Event;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /events/{id} handler - Retrieve one event
#[utoipa::path(
    get,
    path = routes::EVENT_ITEM,
    params(
        ("id" = String, Path, description = "Event identifier")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    match state.store.get(&id).await? {
        Some(event) => {
            tracing::info!("Successfully retrieved event with id: {}", id);
            Ok((StatusCode::OK, Json(event)))
        }
        None => {
            tracing::info!("Event not found with id: {}", id);
            Err(ApiError::NotFound(id))
        }
    }
}
