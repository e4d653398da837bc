//! Response envelope
//!
//! The decoded response body before payload extraction.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

use crate::error::{LinkError, Result};

/// Status code the service uses for success
pub const SUCCESS_STATUS: i64 = 200;

/// A decoded response: a mandatory status plus operation-specific fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(deserialize_with = "deserialize_status")]
    status: i64,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Build an envelope directly (mostly useful for tests and fakes)
    pub fn new(status: i64, fields: Map<String, Value>) -> Self {
        Self { status, fields }
    }

    pub fn status(&self) -> i64 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Raw access to a field other than `status`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Extract a string field, failing if it is absent or not a string
    pub fn string_field(&self, name: &str) -> Result<String> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(LinkError::MalformedResponse(format!(
                "field `{}` is not a string: {}",
                name, other
            ))),
            None => Err(LinkError::MalformedResponse(format!(
                "missing field `{}`",
                name
            ))),
        }
    }

    /// Deserialize every non-status field into a typed payload
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| LinkError::MalformedResponse(e.to_string()))
    }
}

/// Any JSON number is a status. Fractions truncate toward zero and values
/// beyond `i64` saturate, so every numeric non-200 reaches the status check.
fn deserialize_status<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;

    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }

    number
        .as_f64()
        .map(|f| f as i64)
        .ok_or_else(|| D::Error::custom(format!("invalid status: {}", number)))
}
