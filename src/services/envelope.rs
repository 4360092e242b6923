// src/services/envelope.rs

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::TransportResponse;

/// Wrapper the subscription backend puts around payloads. Catalog endpoints
/// answer with the bare payload instead; both shapes must be accepted.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Envelope {
    pub success: Option<bool>,
    pub data: Option<Value>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

/// The normalization step every assembler shares: an enveloped response yields
/// its `data` field, a bare response yields itself. A present-but-null `data`
/// falls back to the whole value.
pub fn payload(value: Value) -> Value {
    if let Some(inner) = value.get("data") {
        if !inner.is_null() {
            return inner.clone();
        }
    }
    value
}

/// Parse a response body and normalize it in one step.
pub fn payload_of(response: &TransportResponse) -> Result<Value, ClientError> {
    let value: Value = response.json()?;
    Ok(payload(value))
}

/// Parsed body of an acknowledgement-style response (deletes, password
/// changes). An empty body reads as JSON null.
pub fn body_value(response: &TransportResponse) -> Result<Value, ClientError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    response.json()
}

/// Best-effort `{message, errors}` extraction from an error body, for flows
/// that convert failures into a structured outcome instead of propagating.
pub fn error_details(body: &str) -> (Option<String>, Vec<String>) {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => (envelope.message, envelope.errors.unwrap_or_default()),
        Err(_) => (None, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enveloped_payload_is_unwrapped() {
        let value = json!({"success": true, "data": [1, 2, 3]});
        assert_eq!(payload(value), json!([1, 2, 3]));
    }

    #[test]
    fn bare_payload_passes_through() {
        let value = json!([{"id": 1}]);
        assert_eq!(payload(value.clone()), value);
    }

    #[test]
    fn null_data_falls_back_to_whole_value() {
        let value = json!({"success": false, "data": null});
        assert_eq!(payload(value.clone()), value);
    }

    #[test]
    fn error_details_reads_message_and_errors() {
        let (message, errors) =
            error_details(r#"{"message": "Credenciales inválidas", "errors": ["bad"]}"#);
        assert_eq!(message.as_deref(), Some("Credenciales inválidas"));
        assert_eq!(errors, vec!["bad".to_string()]);
    }

    #[test]
    fn error_details_tolerates_non_json_bodies() {
        let (message, errors) = error_details("upstream exploded");
        assert!(message.is_none());
        assert!(errors.is_empty());
    }
}
