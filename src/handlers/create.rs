use crate::error::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::models::{CreateEventRequest, Event};
use crate::routes;
use crate::state::AppState;
use crate::validation::ValidatedJson;
use axum::{extract::State, http::StatusCode, Json};

/// POST /events handler - Create a new event
///
/// The full event is required. Fails with 409 if the `eventId` is taken;
/// an existing event is never overwritten.
#[utoipa::path(
    post,
    path = routes::EVENTS,
    request_body = Event,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 409, description = "Event with this ID already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = request
        .into_event()
        .ok_or_else(|| anyhow::anyhow!("validated create request is incomplete"))?;

    state.store.put(&event).await?;

    tracing::info!("Created event with id: {}", event.event_id);
    Ok((StatusCode::CREATED, Json(event)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventStore;
    use crate::test_support::{sample_event, sample_payload, send, test_app};

    #[tokio::test]
    async fn test_create_endpoint_success() {
        let (app, store) = test_app();

        let (status, body) = send(&app, "POST", "/events", Some(sample_payload())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, sample_payload());
        assert_eq!(store.get("e1").await.unwrap(), Some(sample_event()));
    }

    #[tokio::test]
    async fn test_create_endpoint_duplicate() {
        let (app, store) = test_app();
        store.put(&sample_event()).await.unwrap();

        let mut payload = sample_payload();
        payload["title"] = serde_json::json!("Replacement");

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            serde_json::json!({"detail": "Event with this ID already exists"})
        );
        assert_eq!(store.get("e1").await.unwrap().unwrap().title, "T");
    }

    #[tokio::test]
    async fn test_create_endpoint_zero_capacity() {
        let (app, store) = test_app();
        let mut payload = sample_payload();
        payload["capacity"] = serde_json::json!(0);

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response_json: ValidationErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_json.detail[0].loc, vec!["body", "capacity"]);
        assert_eq!(response_json.detail[0].kind, "greater_than");
        assert_eq!(store.get("e1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_endpoint_bad_date() {
        let (app, _) = test_app();
        let mut payload = sample_payload();
        payload["date"] = serde_json::json!("15-12-2024");

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response_json: ValidationErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_json.detail[0].loc, vec!["body", "date"]);
        assert_eq!(response_json.detail[0].kind, "string_pattern_mismatch");
    }

    #[tokio::test]
    async fn test_create_endpoint_missing_fields() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/events",
            Some(serde_json::json!({"eventId": "e1", "title": "T"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response_json: ValidationErrorResponse = serde_json::from_value(body).unwrap();
        let missing: Vec<&str> = response_json
            .detail
            .iter()
            .filter(|v| v.kind == "missing")
            .map(|v| v.loc[1].as_str())
            .collect();
        assert_eq!(
            missing,
            vec!["capacity", "date", "description", "location", "organizer", "status"]
        );
    }

    #[tokio::test]
    async fn test_create_endpoint_whole_float_capacity() {
        let (app, store) = test_app();
        let mut payload = sample_payload();
        payload["capacity"] = serde_json::json!(10.0);

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, sample_payload());
        assert_eq!(store.get("e1").await.unwrap(), Some(sample_event()));

        let mut payload = sample_payload();
        payload["eventId"] = serde_json::json!("e2");
        payload["capacity"] = serde_json::json!(10.5);

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response_json: ValidationErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_json.detail[0].kind, "json_type");
    }

    #[tokio::test]
    async fn test_create_endpoint_wrong_type() {
        let (app, _) = test_app();
        let mut payload = sample_payload();
        payload["capacity"] = serde_json::json!("ten");

        let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response_json: ValidationErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response_json.detail[0].loc, vec!["body"]);
        assert_eq!(response_json.detail[0].kind, "json_type");
    }

    #[tokio::test]
    async fn test_create_endpoint_invalid_json() {
        let (app, _) = test_app();

        let response = tower::ServiceExt::oneshot(
            app,
            axum::http::Request::builder()
                .method("POST")
                .uri("/events")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{invalid json}"))
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: ValidationErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.detail[0].kind, "json_invalid");
    }
}
