//! Opaque payloads and the pluggable data converter
//!
//! Arguments and results cross the queue as opaque bytes. A [`DataConverter`]
//! turns JSON values into [`Payload`]s on the way in and back on the way out.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Serialized argument or result bytes
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payload {
    data: Vec<u8>,
}

impl Payload {
    /// Wrap raw bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").field("len", &self.data.len()).finish()
    }
}

/// Converts values to and from opaque payloads.
///
/// Implementations must be symmetric: `from_payload(to_payload(v)) == v`.
pub trait DataConverter: Send + Sync {
    /// Short identifier of the encoding, e.g. `json/plain`
    fn encoding(&self) -> &str;

    /// Encode a value into a payload
    fn to_payload(&self, value: &Value) -> CoreResult<Payload>;

    /// Decode a payload back into a value
    fn from_payload(&self, payload: &Payload) -> CoreResult<Value>;
}

/// Default converter: UTF-8 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataConverter;

impl DataConverter for JsonDataConverter {
    fn encoding(&self) -> &str {
        "json/plain"
    }

    fn to_payload(&self, value: &Value) -> CoreResult<Payload> {
        Ok(Payload::new(serde_json::to_vec(value)?))
    }

    fn from_payload(&self, payload: &Payload) -> CoreResult<Value> {
        // An empty payload stands for "no value"
        if payload.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(payload.as_bytes()).map_err(CoreError::from)
    }
}
