use axum::{
    Router,
    http::{HeaderValue, Uri},
    routing::get,
};
use lambda_http::request::RequestContext;
use lambda_http::{Request as LambdaRequest, RequestExt};
use tower::util::MapRequest;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, root_handler,
    update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Build the application router with CORS, request tracing and API docs.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_allowed_origins.as_deref());

    Router::new()
        .route(routes::ROOT, get(root_handler))
        .route(routes::HEALTH, get(health_handler))
        .route(routes::EVENTS, get(list_handler).post(create_handler))
        .route(
            routes::EVENT_ITEM,
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .merge(SwaggerUi::new(routes::DOCS).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router wrapped for `lambda_http::run`, with the API Gateway stage removed from
/// request paths before routing.
pub fn lambda_service(
    router: Router,
) -> MapRequest<Router, fn(LambdaRequest) -> LambdaRequest> {
    MapRequest::new(router, strip_stage_prefix as fn(LambdaRequest) -> LambdaRequest)
}

/// `lambda_http` prepends the stage (`/prod/events`) unless
/// `AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH` is set. The `$default` stage is never prepended.
fn strip_stage_prefix(mut request: LambdaRequest) -> LambdaRequest {
    let stage = match request.request_context_ref() {
        Some(RequestContext::ApiGatewayV1(ctx)) => ctx.stage.clone(),
        Some(RequestContext::ApiGatewayV2(ctx)) => ctx.stage.clone(),
        _ => None,
    };
    let Some(stage) = stage.filter(|s| !s.is_empty() && s != "$default") else {
        return request;
    };

    let uri = request.uri();
    let Some(rest) = uri.path().strip_prefix(&format!("/{}", stage)) else {
        return request;
    };
    if !rest.is_empty() && !rest.starts_with('/') {
        return request;
    }
    let path = if rest.is_empty() { "/" } else { rest };
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    let rewritten = path_and_query
        .parse()
        .ok()
        .and_then(|pq| {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).ok()
        });
    match rewritten {
        Some(uri) => *request.uri_mut() = uri,
        None => tracing::warn!("Could not strip stage '{}' from {}", stage, request.uri()),
    }
    request
}

/// `None` allows any origin. Credentials are only allowed with an explicit origin list.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
