use crate::error::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::models::{Event, UpdateEventRequest};
use crate::routes;
use crate::state::AppState;
use crate::validation::ValidatedJson;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// PUT /events/{id} handler - Partially update an event
///
/// Only the supplied fields change; `null` counts as not supplied and
/// `eventId` in the body is ignored. Returns the full updated event.
#[utoipa::path(
    put,
    path = routes::EVENT_ITEM,
    params(
        ("id" = String, Path, description = "Event identifier")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "No fields to update", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let changes = request.into_changes();

    // An empty update still reports unknown ids as 404
    if changes.is_empty() {
        return match state.store.get(&id).await? {
            Some(_) => Err(ApiError::NoFieldsToUpdate),
            None => Err(ApiError::NotFound(id)),
        };
    }

    let event = state.store.update(&id, &changes).await?;

    tracing::info!(
        "Updated event with id: {} ({} fields)",
        id,
        changes.fields().len()
    );
    Ok((StatusCode::OK, Json(event)))
}
