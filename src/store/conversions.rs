//! Conversions between events and DynamoDB attribute maps.
//!
//! Pure functions, testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use super::StoreError;
use crate::models::{Event, EventField, FieldValue};

pub type Item = HashMap<String, AttributeValue>;

pub fn to_attribute(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Text(s) => AttributeValue::S(s.clone()),
        FieldValue::Number(n) => AttributeValue::N(n.to_string()),
    }
}

/// Primary key attribute for the given event id.
pub fn key(event_id: &str) -> (String, AttributeValue) {
    (
        EventField::EventId.as_str().to_string(),
        AttributeValue::S(event_id.to_string()),
    )
}

/// Convert an Event to a DynamoDB item; attributes are exactly the event fields.
pub fn event_to_item(event: &Event) -> Item {
    const FIELDS: [EventField; 8] = [
        EventField::EventId,
        EventField::Title,
        EventField::Description,
        EventField::Date,
        EventField::Location,
        EventField::Capacity,
        EventField::Organizer,
        EventField::Status,
    ];

    FIELDS
        .into_iter()
        .map(|field| {
            (
                field.as_str().to_string(),
                to_attribute(&event.field_value(field)),
            )
        })
        .collect()
}

/// Convert a DynamoDB item to an Event.
pub fn item_to_event(item: &Item) -> Result<Event, StoreError> {
    let status = get_string(item, EventField::Status)?;

    Ok(Event {
        event_id: get_string(item, EventField::EventId)?,
        title: get_string(item, EventField::Title)?,
        description: get_string(item, EventField::Description)?,
        date: get_string(item, EventField::Date)?,
        location: get_string(item, EventField::Location)?,
        capacity: get_number(item, EventField::Capacity)?,
        organizer: get_string(item, EventField::Organizer)?,
        status: status.parse().map_err(StoreError::InvalidItem)?,
    })
}

fn get_string(item: &Item, field: EventField) -> Result<String, StoreError> {
    item.get(field.as_str())
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| {
            StoreError::InvalidItem(format!("missing or non-string attribute '{}'", field.as_str()))
        })
}

fn get_number(item: &Item, field: EventField) -> Result<i64, StoreError> {
    let raw = item
        .get(field.as_str())
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| {
            StoreError::InvalidItem(format!("missing or non-numeric attribute '{}'", field.as_str()))
        })?;

    raw.parse().map_err(|_| {
        StoreError::InvalidItem(format!(
            "attribute '{}' is not an integer: {}",
            field.as_str(),
            raw
        ))
    })
}
