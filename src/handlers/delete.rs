use crate::error::{ApiError, ErrorResponse};
use crate::models::DeleteResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// DELETE /events/{id} handler - Remove an event
#[utoipa::path(
    delete,
    path = routes::EVENT_ITEM,
    params(
        ("id" = String, Path, description = "Event identifier")
    ),
    responses(
        (status = 200, description = "Event deleted", body = DeleteResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    state.store.delete(&id).await?;

    tracing::info!("Deleted event with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            message: "Event deleted successfully".to_string(),
            event_id: id,
        }),
    ))
}
