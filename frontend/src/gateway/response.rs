use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;

/// What a transport hands back before any decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Value of the `Content-Type` header, empty if the server sent none.
    pub content_type: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for diagnostics; invalid UTF-8 is replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Binary(Vec<u8>),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Deserializes a JSON payload into `T`.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
            }
            Payload::Binary(_) => Err(GatewayError::Decode(
                "expected a JSON body, got binary content".to_string(),
            )),
            Payload::Text(_) => Err(GatewayError::Decode(
                "expected a JSON body, got text content".to_string(),
            )),
        }
    }
}

/// Chooses the decoder from the declared media type.
pub fn decode(response: RawResponse) -> Result<Payload, GatewayError> {
    let content_type = response.content_type.to_ascii_lowercase();
    if content_type.contains("application/pdf") {
        return Ok(Payload::Binary(response.body));
    }
    if content_type.contains("application/json") {
        return serde_json::from_slice(&response.body)
            .map(Payload::Json)
            .map_err(|e| GatewayError::Decode(e.to_string()));
    }
    String::from_utf8(response.body)
        .map(Payload::Text)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}
