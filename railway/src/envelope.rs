use crate::provider::GatewayResult;
use serde::{Deserialize, Serialize};

/// Uniform `{success, data, error}` result handed to dashboard consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, String> {
        match (self.success, self.error) {
            (true, _) => Ok(self.data),
            (false, error) => Err(error.unwrap_or_default()),
        }
    }
}

impl Envelope<()> {
    /// Success marker for operations with no payload, e.g. deletions.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn from_unit(result: GatewayResult<()>) -> Self {
        match result {
            Ok(()) => Self::done(),
            Err(e) => Self::fail(e.envelope_message()),
        }
    }
}

impl<T> From<GatewayResult<T>> for Envelope<T> {
    fn from(result: GatewayResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.envelope_message()),
        }
    }
}
