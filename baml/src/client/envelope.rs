//! Request envelope shared by the blocking and streaming endpoints.

use serde::Serialize;

use crate::error::{RuntimeError, ValidationError};

/// Body of every request sent to the execution engine.
///
/// Wire names are lower camel case: `functionName`, `parameters` and, for
/// streaming requests only, `stream`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallEnvelope<'a, P> {
    function_name: &'a str,
    parameters: &'a P,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl<'a, P: Serialize> CallEnvelope<'a, P> {
    pub(crate) fn call(function_name: &'a str, parameters: &'a P) -> Self {
        Self {
            function_name,
            parameters,
            stream: None,
        }
    }

    pub(crate) fn stream(function_name: &'a str, parameters: &'a P) -> Self {
        Self {
            function_name,
            parameters,
            stream: Some(true),
        }
    }

    /// Serializes the envelope to a JSON body.
    pub(crate) fn encode(&self) -> Result<Vec<u8>, RuntimeError> {
        serde_json::to_vec(self).map_err(|e| ValidationError::RequestEncoding(e).into())
    }
}

/// Rejects empty or whitespace-only function names.
pub(crate) fn validate_function_name(function_name: &str) -> Result<(), RuntimeError> {
    if function_name.trim().is_empty() {
        return Err(RuntimeError::invalid_input("function name must not be empty"));
    }
    Ok(())
}

/// Decodes one JSON result value, treating `null` as a failure.
pub(crate) fn decode_result<T>(function_name: &str, body: &[u8]) -> Result<T, RuntimeError>
where
    T: serde::de::DeserializeOwned,
{
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(ValidationError::JsonParse)?;
    if value.is_null() {
        return Err(ValidationError::NullResult {
            function: function_name.to_string(),
        }
        .into());
    }
    serde_json::from_value(value).map_err(|e| ValidationError::JsonParse(e).into())
}
