//! API Errors and Responses
//!
//! Client-side view of an API call ([`ApiResponse`]) and the keyed error
//! collection ([`ErrorBag`]) an API returns alongside a failed request.

use std::any::type_name;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContractError, ContractResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of an API call: the HTTP status plus a payload or an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub payload: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: u16, payload: T) -> Self {
        Self {
            status,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(status: u16, error: ApiError) -> Self {
        Self {
            status,
            payload: None,
            error: Some(error),
        }
    }

    /// 2xx status and no error
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.error.is_none()
    }
}

/// Errors keyed by name
///
/// Typed errors are stored under their Rust type name; plain validation
/// messages are stored as string lists under any key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag(BTreeMap<String, Value>);

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `error` under the key of its type, replacing any previous one
    pub fn add_api_error<E: Serialize>(&mut self, error: &E) -> ContractResult<()> {
        let key = error_key::<E>();
        let value = serde_json::to_value(error).map_err(|err| payload_error(key, &err))?;
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    pub fn contains_api_error<E>(&self) -> bool {
        self.0.contains_key(error_key::<E>())
    }

    /// Read back the error stored for type `E`, if any
    pub fn get_api_error<E: DeserializeOwned>(&self) -> ContractResult<Option<E>> {
        let key = error_key::<E>();
        self.0
            .get(key)
            .map(|value| E::deserialize(value).map_err(|err| payload_error(key, &err)))
            .transpose()
    }

    /// Append a validation message under `key`
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let entry = self
            .0
            .entry(key.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(messages) => messages.push(Value::String(message.into())),
            other => *other = Value::Array(vec![Value::String(message.into())]),
        }
    }

    /// Messages stored under `key`; empty unless the entry is a list of strings
    pub fn errors(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn error_key<E>() -> &'static str {
    type_name::<E>()
}

fn payload_error(key: &str, err: &serde_json::Error) -> ContractError {
    tracing::warn!(key, error = %err, "Unreadable error payload");
    ContractError::ErrorPayload {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct OrderLocked {
        message: String,
        order_id: u32,
    }

    #[derive(Debug, Deserialize)]
    struct OutOfStock {
        #[allow(dead_code)]
        sku: String,
    }

    #[test]
    fn test_api_response() {
        let ok = ApiResponse::success(200, "body");
        assert!(ok.is_success());
        assert_eq!(ok.payload, Some("body"));

        let failed = ApiResponse::<()>::failure(409, ApiError::new("Conflict"));
        assert!(!failed.is_success());
        assert_eq!(failed.error.map(|e| e.message), Some("Conflict".to_string()));

        let odd = ApiResponse {
            status: 500,
            payload: Some(1),
            error: None,
        };
        assert!(!odd.is_success());
    }

    #[test]
    fn test_typed_error_round_trip() {
        let mut bag = ErrorBag::new();
        let locked = OrderLocked {
            message: "Order is locked".to_string(),
            order_id: 12,
        };
        bag.add_api_error(&locked).unwrap();

        assert!(bag.contains_api_error::<OrderLocked>());
        assert!(!bag.contains_api_error::<ApiError>());
        assert_eq!(bag.get_api_error::<OrderLocked>().unwrap(), Some(locked));
        assert_eq!(bag.get_api_error::<ApiError>().unwrap(), None);
    }

    #[test]
    fn test_unreadable_payload() {
        let mut bag = ErrorBag::new();
        bag.0.insert(
            error_key::<OutOfStock>().to_string(),
            serde_json::json!({ "unexpected": true }),
        );
        assert!(matches!(
            bag.get_api_error::<OutOfStock>(),
            Err(ContractError::ErrorPayload { .. })
        ));
    }

    #[test]
    fn test_validation_messages() {
        let mut bag = ErrorBag::new();
        bag.add_error("Name", "Name is required");
        bag.add_error("Name", "Name is too short");

        assert_eq!(bag.errors("Name"), vec!["Name is required", "Name is too short"]);
        assert!(bag.errors("Age").is_empty());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_typed_entry_is_not_a_message_list() {
        let mut bag = ErrorBag::new();
        bag.add_api_error(&ApiError::new("boom")).unwrap();
        assert!(bag.errors(error_key::<ApiError>()).is_empty());
    }

    #[test]
    fn test_json_is_a_plain_map() {
        let mut bag = ErrorBag::new();
        bag.add_error("Name", "Name is required");
        assert_eq!(
            serde_json::to_value(&bag).unwrap(),
            serde_json::json!({ "Name": ["Name is required"] })
        );
    }
}
