//! DynamoDB event store.

use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::ReturnValue;

use super::conversions::{event_to_item, item_to_event, key};
use super::expression::ExpressionBuilder;
use super::{EventStore, Result, StoreError};
use crate::config::Config;
use crate::models::{EqualityFilter, Event, EventChanges, EventField};

/// Event store backed by a single DynamoDB table keyed by `eventId`.
#[derive(Clone)]
pub struct DynamoDbEventStore {
    client: Client,
    table_name: String,
}

impl DynamoDbEventStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Create a store using the AWS default credential chain.
    ///
    /// When `DYNAMODB_ENDPOINT_URL` is configured the client talks to that
    /// endpoint instead, e.g. DynamoDB Local.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = &config.dynamodb_endpoint_url {
            tracing::info!("Using DynamoDB endpoint override: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), &config.events_table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl EventStore for DynamoDbEventStore {
    async fn put(&self, event: &Event) -> Result<()> {
        let mut expr = ExpressionBuilder::new();
        let condition = expr.attribute_not_exists(EventField::EventId);
        let (names, _) = expr.into_parts();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(event_to_item(event)))
            .condition_expression(condition)
            .set_expression_attribute_names(names)
            .send()
            .await
            .map_err(|err| map_put_item_error(err, &event.event_id))?;

        tracing::debug!("Put event with id: {}", event.event_id);
        Ok(())
    }

    async fn get(&self, event_id: &str) -> Result<Option<Event>> {
        let (key_name, key_value) = key(event_id);

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(key_name, key_value)
            .send()
            .await
            .map_err(|err| backend_error("GetItem", err))?;

        output.item.as_ref().map(item_to_event).transpose()
    }

    async fn scan(&self, filter: Option<&EqualityFilter>) -> Result<Vec<Event>> {
        let mut expr = ExpressionBuilder::new();
        let filter_expression = filter.map(|f| expr.equals(f.field, &f.value));
        let (names, values) = expr.into_parts();

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_filter_expression(filter_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|err| backend_error("Scan", err))?;

        if output.last_evaluated_key.is_some() {
            tracing::warn!(
                "Scan of table {} was truncated; only the first page is returned",
                self.table_name
            );
        }

        output
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_event)
            .collect()
    }

    async fn update(&self, event_id: &str, changes: &EventChanges) -> Result<Event> {
        let mut expr = ExpressionBuilder::new();
        let Some(update) = expr.set(&changes.fields()) else {
            return Err(StoreError::EmptyUpdate(event_id.to_string()));
        };
        let condition = expr.attribute_exists(EventField::EventId);
        let (names, values) = expr.into_parts();
        let (key_name, key_value) = key(event_id);

        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(key_name, key_value)
            .update_expression(update)
            .condition_expression(condition)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| map_update_item_error(err, event_id))?;

        let attributes = output.attributes.ok_or_else(|| {
            StoreError::InvalidItem(format!("UpdateItem returned no attributes for {}", event_id))
        })?;

        tracing::debug!("Updated event with id: {}", event_id);
        item_to_event(&attributes)
    }

    async fn delete(&self, event_id: &str) -> Result<()> {
        let mut expr = ExpressionBuilder::new();
        let condition = expr.attribute_exists(EventField::EventId);
        let (names, _) = expr.into_parts();
        let (key_name, key_value) = key(event_id);

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(key_name, key_value)
            .condition_expression(condition)
            .set_expression_attribute_names(names)
            .send()
            .await
            .map_err(|err| map_delete_item_error(err, event_id))?;

        tracing::debug!("Deleted event with id: {}", event_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|err| backend_error("DescribeTable", err))?;
        Ok(())
    }
}

fn backend_error<E, R>(operation: &str, err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: Debug,
{
    StoreError::Backend(format!("{} failed: {}", operation, DisplayErrorContext(&err)))
}

/// A failed existence guard on put means the id is already taken.
fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    event_id: &str,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => {
            StoreError::AlreadyExists(event_id.to_string())
        }
        err => StoreError::Backend(format!("PutItem failed: {}", DisplayErrorContext(&err))),
    }
}

fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    event_id: &str,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            StoreError::NotFound(event_id.to_string())
        }
        err => StoreError::Backend(format!("UpdateItem failed: {}", DisplayErrorContext(&err))),
    }
}

fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    event_id: &str,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => {
            StoreError::NotFound(event_id.to_string())
        }
        err => StoreError::Backend(format!("DeleteItem failed: {}", DisplayErrorContext(&err))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::BehaviorVersion;
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ResourceNotFoundException,
    };

    fn condition_failed() -> ConditionalCheckFailedException {
        ConditionalCheckFailedException::builder()
            .message("The conditional request failed")
            .build()
    }

    fn table_missing() -> ResourceNotFoundException {
        ResourceNotFoundException::builder()
            .message("Requested resource not found")
            .build()
    }

    #[test]
    fn test_put_condition_failure_is_already_exists() {
        let err = SdkError::service_error(
            PutItemError::ConditionalCheckFailedException(condition_failed()),
            (),
        );

        assert_eq!(
            map_put_item_error(err, "e1"),
            StoreError::AlreadyExists("e1".to_string())
        );
    }

    #[test]
    fn test_update_condition_failure_is_not_found() {
        let err = SdkError::service_error(
            UpdateItemError::ConditionalCheckFailedException(condition_failed()),
            (),
        );

        assert_eq!(
            map_update_item_error(err, "ghost"),
            StoreError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_delete_condition_failure_is_not_found() {
        let err = SdkError::service_error(
            DeleteItemError::ConditionalCheckFailedException(condition_failed()),
            (),
        );

        assert_eq!(
            map_delete_item_error(err, "ghost"),
            StoreError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_other_service_errors_are_backend() {
        let put = SdkError::service_error(PutItemError::ResourceNotFoundException(table_missing()), ());
        let update =
            SdkError::service_error(UpdateItemError::ResourceNotFoundException(table_missing()), ());
        let delete =
            SdkError::service_error(DeleteItemError::ResourceNotFoundException(table_missing()), ());

        for mapped in [
            map_put_item_error(put, "e1"),
            map_update_item_error(update, "e1"),
            map_delete_item_error(delete, "e1"),
        ] {
            assert!(
                matches!(&mapped, StoreError::Backend(msg) if msg.contains("Requested resource not found")),
                "unexpected mapping: {:?}",
                mapped
            );
        }
    }

    #[test]
    fn test_transport_failure_is_backend() {
        let err: SdkError<PutItemError, ()> = SdkError::construction_failure("request build failed");

        assert!(matches!(map_put_item_error(err, "e1"), StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_update_without_changes_is_rejected_before_any_request() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        let store = DynamoDbEventStore::new(Client::from_conf(config), "EventsTable");

        let err = store.update("e1", &EventChanges::default()).await.unwrap_err();

        assert_eq!(err, StoreError::EmptyUpdate("e1".to_string()));
    }
}
