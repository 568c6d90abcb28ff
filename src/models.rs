use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::validation::{validate_date, validate_status};

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [
        EventStatus::Active,
        EventStatus::Cancelled,
        EventStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown event status '{}'", s))
    }
}

/// A stored event, as returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[schema(example = "event-123")]
    pub event_id: String,
    #[schema(example = "Tech Conference")]
    pub title: String,
    #[schema(example = "Annual tech event")]
    pub description: String,
    #[schema(example = "2024-12-15")]
    pub date: String,
    #[schema(example = "San Francisco")]
    pub location: String,
    #[schema(example = 500)]
    pub capacity: i64,
    #[schema(example = "Tech Corp")]
    pub organizer: String,
    pub status: EventStatus,
}

/// Attribute names of an event, used by the store layer for keys, filters and updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    EventId,
    Title,
    Description,
    Date,
    Location,
    Capacity,
    Organizer,
    Status,
}

impl EventField {
    pub fn as_str(self) -> &'static str {
        match self {
            EventField::EventId => "eventId",
            EventField::Title => "title",
            EventField::Description => "description",
            EventField::Date => "date",
            EventField::Location => "location",
            EventField::Capacity => "capacity",
            EventField::Organizer => "organizer",
            EventField::Status => "status",
        }
    }
}

/// A typed value for a single event attribute
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
}

/// Exact-match filter applied when listing events
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityFilter {
    pub field: EventField,
    pub value: FieldValue,
}

impl EqualityFilter {
    pub fn status(status: EventStatus) -> Self {
        Self {
            field: EventField::Status,
            value: FieldValue::Text(status.as_str().to_string()),
        }
    }

    /// Whether the given event satisfies this filter
    pub fn matches(&self, event: &Event) -> bool {
        event.field_value(self.field) == self.value
    }
}

impl Event {
    pub fn field_value(&self, field: EventField) -> FieldValue {
        match field {
            EventField::EventId => FieldValue::Text(self.event_id.clone()),
            EventField::Title => FieldValue::Text(self.title.clone()),
            EventField::Description => FieldValue::Text(self.description.clone()),
            EventField::Date => FieldValue::Text(self.date.clone()),
            EventField::Location => FieldValue::Text(self.location.clone()),
            EventField::Capacity => FieldValue::Number(self.capacity),
            EventField::Organizer => FieldValue::Text(self.organizer.clone()),
            EventField::Status => FieldValue::Text(self.status.as_str().to_string()),
        }
    }

    /// Apply a validated partial update in place
    pub fn apply(&mut self, changes: &EventChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(date) = &changes.date {
            self.date = date.clone();
        }
        if let Some(location) = &changes.location {
            self.location = location.clone();
        }
        if let Some(capacity) = changes.capacity {
            self.capacity = capacity;
        }
        if let Some(organizer) = &changes.organizer {
            self.organizer = organizer.clone();
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Validated set of mutable fields supplied to an update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub organizer: Option<String>,
    pub status: Option<EventStatus>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Supplied fields in declaration order
    pub fn fields(&self) -> Vec<(EventField, FieldValue)> {
        let text = |field, value: &Option<String>| {
            value.clone().map(|v| (field, FieldValue::Text(v)))
        };

        [
            text(EventField::Title, &self.title),
            text(EventField::Description, &self.description),
            text(EventField::Date, &self.date),
            text(EventField::Location, &self.location),
            self.capacity
                .map(|c| (EventField::Capacity, FieldValue::Number(c))),
            text(EventField::Organizer, &self.organizer),
            self.status
                .map(|s| (EventField::Status, FieldValue::Text(s.as_str().to_string()))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Integer field that also accepts whole-number floats such as `10.0`.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(D::Error::custom(format!(
            "Input should be a valid integer, got {}",
            number
        ))),
    }
}

/// Request body for POST /events
///
/// Every field is optional at the serde level so that missing fields are
/// reported by the validator alongside every other violation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(required, length(min = 1, max = 100))]
    pub event_id: Option<String>,
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(required, length(min = 1, max = 1000))]
    pub description: Option<String>,
    #[validate(required, custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(required, length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(required, range(exclusive_min = 0))]
    #[serde(default, deserialize_with = "integral")]
    pub capacity: Option<i64>,
    #[validate(required, length(min = 1, max = 200))]
    pub organizer: Option<String>,
    #[validate(required, custom(function = "validate_status"))]
    pub status: Option<String>,
}

impl CreateEventRequest {
    /// Convert a validated request into an event. Returns `None` if a field is
    /// missing or the status is unknown, which validation already rules out.
    pub fn into_event(self) -> Option<Event> {
        Some(Event {
            event_id: self.event_id?,
            title: self.title?,
            description: self.description?,
            date: self.date?,
            location: self.location?,
            capacity: self.capacity?,
            organizer: self.organizer?,
            status: self.status?.parse().ok()?,
        })
    }
}

/// Request body for PUT /events/{id}; only supplied fields are changed
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_date"))]
    #[schema(example = "2024-12-15")]
    pub date: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(exclusive_min = 0))]
    #[serde(default, deserialize_with = "integral")]
    pub capacity: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub organizer: Option<String>,
    #[validate(custom(function = "validate_status"))]
    #[schema(value_type = Option<EventStatus>)]
    pub status: Option<String>,
}

impl UpdateEventRequest {
    pub fn into_changes(self) -> EventChanges {
        EventChanges {
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            capacity: self.capacity,
            organizer: self.organizer,
            status: self.status.and_then(|s| s.parse().ok()),
        }
    }
}

/// Query parameters for the list endpoint
#[derive(Debug, Default, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only return events with this status (active, cancelled or completed)
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

/// Response type for successful DELETE operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: String,
    pub event_id: String,
}

/// Response type for the root endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}
