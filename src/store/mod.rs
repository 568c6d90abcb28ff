//! Event persistence.
//!
//! [`EventStore`] is the seam between the HTTP handlers and the item store. Each
//! method maps to exactly one request against the backing store.

mod conversions;
mod dynamodb;
pub mod expression;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EqualityFilter, Event, EventChanges};

pub use dynamodb::DynamoDbEventStore;
pub use memory::InMemoryEventStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Event not found: {0}")]
    NotFound(String),
    #[error("Event already exists: {0}")]
    AlreadyExists(String),
    #[error("No fields to update for event: {0}")]
    EmptyUpdate(String),
    #[error("Store request failed: {0}")]
    Backend(String),
    #[error("Invalid stored item: {0}")]
    InvalidItem(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event. Fails with [`StoreError::AlreadyExists`] if the id is taken.
    async fn put(&self, event: &Event) -> Result<()>;

    /// Fetch an event by id, `None` if absent.
    async fn get(&self, event_id: &str) -> Result<Option<Event>>;

    /// Return every event, optionally restricted to an exact field match.
    async fn scan(&self, filter: Option<&EqualityFilter>) -> Result<Vec<Event>>;

    /// Apply the supplied fields and return the full updated event.
    /// Fails with [`StoreError::EmptyUpdate`] when `changes` is empty, without
    /// touching the store, and with [`StoreError::NotFound`] if the id does not exist.
    async fn update(&self, event_id: &str, changes: &EventChanges) -> Result<Event>;

    /// Remove an event. Fails with [`StoreError::NotFound`] if the id does not exist.
    async fn delete(&self, event_id: &str) -> Result<()>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<()>;
}
