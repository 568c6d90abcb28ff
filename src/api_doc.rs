use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse, ValidationErrorResponse};
use crate::handlers;
use crate::models::{DeleteResponse, Event, EventStatus, RootResponse, UpdateEventRequest};
use crate::validation::FieldViolation;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Management API",
        version = "1.0.0",
        description = "A serverless API for managing events with DynamoDB backend"
    ),
    paths(
        handlers::root::root_handler,
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Event,
            EventStatus,
            UpdateEventRequest,
            DeleteResponse,
            RootResponse,
            ErrorResponse,
            ValidationErrorResponse,
            FieldViolation,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "info", description = "API information"),
        (name = "health", description = "Health check operations"),
        (name = "events", description = "Event management operations")
    )
)]
pub struct ApiDoc;
