use crate::error::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::models::{EqualityFilter, Event, EventStatus, ListQuery};
use crate::routes;
use crate::state::AppState;
use crate::validation::ValidatedQuery;
use axum::{extract::State, http::StatusCode, Json};

/// GET /events handler - List events
///
/// Returns every stored event, or only those whose status matches the
/// `status` query parameter. An empty table yields an empty array.
#[utoipa::path(
    get,
    path = routes::EVENTS,
    params(ListQuery),
    responses(
        (status = 200, description = "List of events", body = [Event]),
        (status = 422, description = "Invalid query string or status filter", body = ValidationErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<(StatusCode, Json<Vec<Event>>), ApiError> {
    let filter = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<EventStatus>().ok())
        .map(EqualityFilter::status);

    let events = state.store.scan(filter.as_ref()).await?;

    tracing::info!("Listed {} events (status: {:?})", events.len(), query.status);

    Ok((StatusCode::OK, Json(events)))
}
