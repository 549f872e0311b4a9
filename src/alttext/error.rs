use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

pub const CONNECTION_ERROR_CODE: &str = "connection_error";
pub const INVALID_RESPONSE_CODE: &str = "invalid_response";

/// Field name -> human readable messages, in the order the API reported them.
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Classified failure of a single AltText.ai call.
///
/// `status` is the HTTP status of the response, or `0` when the request never
/// produced a response (refused connection, DNS failure, timeout, dropped
/// connection after the retry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub error_code: Option<String>,
    pub errors: FieldErrors,
    pub message: String,
}

impl ApiError {
    /// Build an error from a failed response body.
    ///
    /// Message priority: top-level `error` string, then the flattened field
    /// errors, then `HTTP <status>`.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let error_code = body
            .get("error_code")
            .and_then(Value::as_str)
            .map(str::to_string);
        let errors = body.get("errors").map(parse_field_errors).unwrap_or_default();
        let message = match body
            .get("error")
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
        {
            Some(explicit) => explicit.to_string(),
            None => {
                let flattened = flatten_field_errors(&errors);
                if flattened.is_empty() {
                    format!("HTTP {status}")
                } else {
                    flattened
                }
            }
        };
        Self {
            status,
            error_code,
            errors,
            message,
        }
    }

    pub fn connection(detail: impl Display) -> Self {
        Self {
            status: 0,
            error_code: Some(CONNECTION_ERROR_CODE.to_string()),
            errors: FieldErrors::new(),
            message: format!("Could not reach AltText.ai: {detail}"),
        }
    }

    pub fn invalid_response(status: u16, detail: impl Display) -> Self {
        Self {
            status,
            error_code: Some(INVALID_RESPONSE_CODE.to_string()),
            errors: FieldErrors::new(),
            message: format!("Unexpected response from AltText.ai: {detail}"),
        }
    }

    pub fn is_connection_error(&self) -> bool {
        self.status == 0 && self.error_code.as_deref() == Some(CONNECTION_ERROR_CODE)
    }
}

/// Read an `errors` object leniently: each field may carry a list of messages
/// or a single message. Anything else is ignored.
pub fn parse_field_errors(value: &Value) -> FieldErrors {
    let Some(object) = value.as_object() else {
        return FieldErrors::new();
    };
    object
        .iter()
        .filter_map(|(field, messages)| {
            let messages: Vec<String> = match messages {
                Value::String(message) => vec![message.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(message) => Some(message.clone()),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}

pub fn flatten_field_errors(errors: &FieldErrors) -> String {
    errors
        .values()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serde adapter for record-level `errors` fields.
pub(crate) fn deserialize_field_errors<'de, D>(deserializer: D) -> Result<Option<FieldErrors>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .map(|value| parse_field_errors(&value))
        .filter(|errors| !errors.is_empty()))
}
