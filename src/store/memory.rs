//! In-memory event store for local runs and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EventStore, Result, StoreError};
use crate::models::{EqualityFilter, Event, EventChanges};

/// Uses a HashMap wrapped in `Arc<RwLock<_>>`. Data is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<String, Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn put(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.event_id) {
            return Err(StoreError::AlreadyExists(event.event_id.clone()));
        }
        events.insert(event.event_id.clone(), event.clone());
        Ok(())
    }

    async fn get(&self, event_id: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(event_id).cloned())
    }

    async fn scan(&self, filter: Option<&EqualityFilter>) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .filter(|event| filter.is_none_or(|f| f.matches(event)))
            .cloned()
            .collect())
    }

    async fn update(&self, event_id: &str, changes: &EventChanges) -> Result<Event> {
        if changes.is_empty() {
            return Err(StoreError::EmptyUpdate(event_id.to_string()));
        }

        let mut events = self.events.write().await;
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| StoreError::NotFound(event_id.to_string()))?;
        event.apply(changes);
        Ok(event.clone())
    }

    async fn delete(&self, event_id: &str) -> Result<()> {
        let mut events = self.events.write().await;
        events
            .remove(event_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(event_id.to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
