//! DynamoDB expression building.
//!
//! Several event attributes (`status`, `date`, `location`, `capacity`) are reserved
//! words in the DynamoDB expression language. Every attribute is therefore referenced
//! through placeholders: field `f` becomes the name token `#f` and the value token
//! `:f`. The mapping is applied uniformly, with no keyword list.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use super::conversions::to_attribute;
use crate::models::{EventField, FieldValue};

pub fn name_token(field: EventField) -> String {
    format!("#{}", field.as_str())
}

pub fn value_token(field: EventField) -> String {
    format!(":{}", field.as_str())
}

/// Collects the placeholder bindings used by one request's expressions.
#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&mut self, field: EventField) -> String {
        let token = name_token(field);
        self.names.insert(token.clone(), field.as_str().to_string());
        token
    }

    fn value(&mut self, field: EventField, value: &FieldValue) -> String {
        let token = value_token(field);
        self.values.insert(token.clone(), to_attribute(value));
        token
    }

    /// `#f = :f`
    pub fn equals(&mut self, field: EventField, value: &FieldValue) -> String {
        let name = self.name(field);
        let value = self.value(field, value);
        format!("{} = {}", name, value)
    }

    /// `SET #a = :a, #b = :b`, or `None` when there is nothing to set.
    pub fn set(&mut self, fields: &[(EventField, FieldValue)]) -> Option<String> {
        if fields.is_empty() {
            return None;
        }

        let assignments: Vec<String> = fields
            .iter()
            .map(|(field, value)| self.equals(*field, value))
            .collect();
        Some(format!("SET {}", assignments.join(", ")))
    }

    pub fn attribute_exists(&mut self, field: EventField) -> String {
        format!("attribute_exists({})", self.name(field))
    }

    pub fn attribute_not_exists(&mut self, field: EventField) -> String {
        format!("attribute_not_exists({})", self.name(field))
    }

    /// Name and value maps, each `None` when empty since DynamoDB rejects empty maps.
    pub fn into_parts(
        self,
    ) -> (
        Option<HashMap<String, String>>,
        Option<HashMap<String, AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}
