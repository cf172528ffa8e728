//! Error types shared by the aggregation pipeline.
//!
//! Every failure raised while refreshing tokens, fetching top items or
//! reshaping payloads is a [`ServiceError`]. Callers never see partial
//! results: the first error aborts the whole collection.

use std::fmt;

/// Category attached to a failed gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayFailure {
    /// The API answered with 401.
    Unauthorized,
    /// The API answered with any other non-success status.
    Unsuccessful,
    /// No usable response was obtained (timeout, connect, DNS, body decode).
    RequestFailed,
}

impl fmt::Display for GatewayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GatewayFailure::Unauthorized => "unauthorized API request",
            GatewayFailure::Unsuccessful => "unsuccessful API request",
            GatewayFailure::RequestFailed => "failed to make API request",
        };
        f.write_str(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A request through the gateway failed.
    #[error("{failure}: {detail}")]
    Gateway {
        failure: GatewayFailure,
        detail: String,
    },

    /// A required field is absent from a parsed API payload.
    #[error("no {field} present in API response for {context}")]
    MissingField { field: String, context: String },

    /// A payload field is present but has an unusable shape.
    #[error("API response data in unexpected format: {0}")]
    UnexpectedFormat(String),

    /// The caller passed a value outside a closed set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ServiceError {
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        ServiceError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Returns the gateway category when this is a gateway failure.
    pub fn gateway_failure(&self) -> Option<GatewayFailure> {
        match self {
            ServiceError::Gateway { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

/// Result type for aggregation operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
