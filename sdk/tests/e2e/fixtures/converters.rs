//! Data converters used to exercise encoding failures

use courier_sdk::error::CoreError;
use courier_sdk::{DataConverter, JsonDataConverter, Payload};
use serde_json::Value;

/// JSON converter that refuses to encode one marker value
pub struct RefusingConverter;

impl RefusingConverter {
    pub const REFUSED: &'static str = "unencodable";
}

impl DataConverter for RefusingConverter {
    fn encoding(&self) -> &str {
        "json/refusing"
    }

    fn to_payload(&self, value: &Value) -> Result<Payload, CoreError> {
        if value.as_str() == Some(Self::REFUSED) {
            return Err(CoreError::Other(format!("refused to encode {}", value)));
        }
        JsonDataConverter.to_payload(value)
    }

    fn from_payload(&self, payload: &Payload) -> Result<Value, CoreError> {
        JsonDataConverter.from_payload(payload)
    }
}
