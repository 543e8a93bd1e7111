//! Response envelope checks
//!
//! Every endpoint answers with `{ "success": bool, "data": ... }`. The
//! helpers here turn the shape expectations of a step into typed results.

use serde_json::Value;

use crate::error::{E2eError, E2eResult};

/// Parsed body of a 200 response
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    body: Value,
}

impl Envelope {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// The `data` member, if present and not null
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data").filter(|v| !v.is_null())
    }

    /// A top-level member other than `data`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name).filter(|v| !v.is_null())
    }

    pub fn require_success(&self) -> E2eResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(E2eError::shape("success: true", &self.body))
        }
    }

    /// `success: true` with a non-empty `data.id`
    pub fn data_id(&self) -> E2eResult<String> {
        self.require_success()?;
        self.data()
            .and_then(|data| data.get("id"))
            .and_then(id_string)
            .ok_or_else(|| E2eError::shape("data.id", &self.body))
    }

    /// `success: true` with a non-empty top-level identifier such as `orderId`
    pub fn top_level_id(&self, name: &str) -> E2eResult<String> {
        self.require_success()?;
        self.field(name)
            .and_then(id_string)
            .ok_or_else(|| E2eError::shape(name, &self.body))
    }

    /// `success: true` with `data` holding an array
    pub fn list(&self) -> E2eResult<&[Value]> {
        self.require_success()?;
        self.data()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| E2eError::shape("data array", &self.body))
    }

    /// Like [`Envelope::list`], but every item must carry `field == expected`
    pub fn list_filtered(&self, field: &str, expected: &str) -> E2eResult<&[Value]> {
        let items = self.list()?;
        if let Some(stray) = items
            .iter()
            .find(|item| item.get(field).and_then(Value::as_str) != Some(expected))
        {
            return Err(E2eError::Shape {
                expected: format!("only items with {} = {}", field, expected),
                body: stray.to_string(),
            });
        }
        Ok(items)
    }

    /// `success: true` with a `data` object holding every name in `fields`
    pub fn object_with(&self, fields: &[&str]) -> E2eResult<&serde_json::Map<String, Value>> {
        self.require_success()?;
        let object = self
            .data()
            .and_then(Value::as_object)
            .ok_or_else(|| E2eError::shape("data object", &self.body))?;

        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| !object.contains_key(*f))
            .collect();
        if !missing.is_empty() {
            return Err(E2eError::shape(
                format!("fields {}", missing.join(", ")),
                &self.body,
            ));
        }
        Ok(object)
    }
}

/// Identifiers are strings in practice; numbers are accepted too
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
