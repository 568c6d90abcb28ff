use crate::models::RootResponse;
use crate::routes;
use axum::{http::StatusCode, Json};

/// GET / handler - API name and version
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "API information", body = RootResponse)
    ),
    tag = "info"
)]
pub async fn root_handler() -> (StatusCode, Json<RootResponse>) {
    (
        StatusCode::OK,
        Json(RootResponse {
            message: "Event Management API".to_string(),
            version: "1.0".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, test_app};

    #[tokio::test]
    async fn test_root_endpoint() {
        let (app, _) = test_app();

        let (status, body) = send(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"message": "Event Management API", "version": "1.0"})
        );
    }
}
