//! Rule document loading and serialization
//!
//! A document is a JSON object whose fields are the rule set lists, optionally
//! wrapped in a `{"data": ...}` envelope. Both forms load the same way.

use super::RuleSet;
use crate::error::{AclError, Result};
use serde_json::{Map, Value};

/// Envelope key wrapping a rule set
pub const DATA_ENVELOPE: &str = "data";

impl RuleSet {
    /// Load a rule set from a parsed document, wrapped or not
    ///
    /// # Errors
    ///
    /// Fails when the document (or its envelope content) is not an object,
    /// when a rule misses a required field, or when a field has the wrong type.
    pub fn from_document(document: Value) -> Result<Self> {
        let mut fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(AclError::InvalidDocument(format!(
                    "expected a JSON object, found {}",
                    value_kind(&other)
                )));
            }
        };

        let body = match fields.remove(DATA_ENVELOPE) {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                return Err(AclError::InvalidDocument(format!(
                    "'{}' envelope must be an object, found {}",
                    DATA_ENVELOPE,
                    value_kind(&other)
                )));
            }
            None => fields,
        };

        Ok(serde_json::from_value(Value::Object(body))?)
    }

    /// Load a rule set from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Serialize the rule set, optionally wrapped in the `data` envelope
    ///
    /// Unset optional fields are omitted; every rule list is emitted in order.
    pub fn to_document(&self, wrap: bool) -> Result<Value> {
        let body = serde_json::to_value(self)?;
        if wrap {
            let mut envelope = Map::new();
            envelope.insert(DATA_ENVELOPE.to_string(), body);
            Ok(Value::Object(envelope))
        } else {
            Ok(body)
        }
    }

    /// Serialize the rule set as indented JSON text
    pub fn to_json_pretty(&self, wrap: bool) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document(wrap)?)?)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
