//! Log message payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra fields merged at the top level of a record.
pub type Metadata = Map<String, Value>;

/// The `message` of a record: plain text or a structured value embedded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Structured(Value),
}

/// Conversion into a [`Message`].
///
/// Conversion may fail only for [`Structured`] payloads whose `Serialize`
/// implementation errors; the emitter turns that failure into a fallback
/// record instead of returning it.
pub trait IntoMessage {
    fn into_message(self) -> Result<Message, serde_json::Error>;
}

impl IntoMessage for Message {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        Ok(self)
    }
}

impl IntoMessage for &str {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        Ok(Message::Text(self.to_string()))
    }
}

impl IntoMessage for String {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        Ok(Message::Text(self))
    }
}

impl IntoMessage for &String {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        Ok(Message::Text(self.clone()))
    }
}

impl IntoMessage for Value {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        Ok(match self {
            Value::String(text) => Message::Text(text),
            other => Message::Structured(other),
        })
    }
}

/// Any serializable value used as a structured message.
///
/// ```
/// use structured_logger::Structured;
///
/// #[derive(serde::Serialize)]
/// struct Order {
///     id: u64,
/// }
///
/// let _message = Structured(Order { id: 7 });
/// ```
#[derive(Debug, Clone)]
pub struct Structured<T>(pub T);

impl<T: Serialize> IntoMessage for Structured<T> {
    fn into_message(self) -> Result<Message, serde_json::Error> {
        serde_json::to_value(&self.0).map(Message::Structured)
    }
}

/// Turn a JSON value into record metadata.
///
/// Objects are used as-is; any other value is kept under a `meta` key.
pub fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("meta".to_string(), other);
            map
        }
    }
}
