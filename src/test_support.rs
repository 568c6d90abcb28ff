//! Shared fixtures for router and store tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use crate::config::{Config, HostingMode, StoreBackend};
use crate::models::{EqualityFilter, Event, EventChanges, EventStatus};
use crate::state::AppState;
use crate::store::{self, EventStore, InMemoryEventStore, StoreError};

pub fn sample_event() -> Event {
    Event {
        event_id: "e1".to_string(),
        title: "T".to_string(),
        description: "D".to_string(),
        date: "2024-12-15".to_string(),
        location: "L".to_string(),
        capacity: 10,
        organizer: "O".to_string(),
        status: EventStatus::Active,
    }
}

pub fn sample_payload() -> JsonValue {
    serde_json::to_value(sample_event()).unwrap()
}

pub fn test_config() -> Config {
    Config {
        events_table_name: "EventsTable".to_string(),
        store_backend: StoreBackend::Memory,
        dynamodb_endpoint_url: None,
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
        cors_allowed_origins: None,
        hosting_mode: HostingMode::Http,
    }
}

pub fn app_with_store(store: Arc<dyn EventStore>) -> Router {
    crate::app::router(AppState {
        store,
        config: Arc::new(test_config()),
    })
}

/// Full router over a fresh in-memory store; the returned store shares its data.
pub fn test_app() -> (Router, InMemoryEventStore) {
    let store = InMemoryEventStore::new();
    (app_with_store(Arc::new(store.clone())), store)
}

/// Send one request through the router and decode the JSON response body
/// (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Store whose backend is always unreachable
pub struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Backend("connection refused: unreachable".to_string())
}

#[async_trait]
impl EventStore for UnreachableStore {
    async fn put(&self, _: &Event) -> store::Result<()> {
        Err(unreachable())
    }

    async fn get(&self, _: &str) -> store::Result<Option<Event>> {
        Err(unreachable())
    }

    async fn scan(&self, _: Option<&EqualityFilter>) -> store::Result<Vec<Event>> {
        Err(unreachable())
    }

    async fn update(&self, _: &str, _: &EventChanges) -> store::Result<Event> {
        Err(unreachable())
    }

    async fn delete(&self, _: &str) -> store::Result<()> {
        Err(unreachable())
    }

    async fn health_check(&self) -> store::Result<()> {
        Err(unreachable())
    }
}
