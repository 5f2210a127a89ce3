//! Gateway and credential error kinds and error value helpers.
//!
//! ```rust
//! use ugateway::{GatewayError, GatewayErrorKind};
//!
//! let status = GatewayError::non_success_status(404);
//! assert_eq!(status.kind, GatewayErrorKind::NonSuccessStatus);
//! assert_eq!(status.status, Some(404));
//! assert!(status.to_string().contains("404"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayErrorKind {
    NetworkUnreachable,
    NonSuccessStatus,
    DecodeFailure,
    InvalidRequest,
}

impl GatewayErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkUnreachable => "network_unreachable",
            Self::NonSuccessStatus => "non_success_status",
            Self::DecodeFailure => "decode_failure",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network_unreachable(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NetworkUnreachable, message)
    }

    pub fn non_success_status(status: u16) -> Self {
        Self {
            kind: GatewayErrorKind::NonSuccessStatus,
            message: format!("API error: {status}"),
            status: Some(status),
        }
    }

    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::DecodeFailure, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::InvalidRequest, message)
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for GatewayError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialErrorKind {
    Invalid,
    Storage,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialError {
    pub kind: CredentialErrorKind,
    pub message: String,
}

impl CredentialError {
    pub fn new(kind: CredentialErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(CredentialErrorKind::Invalid, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(CredentialErrorKind::Storage, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CredentialErrorKind::Unavailable, message)
    }
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CredentialError {}

impl From<CredentialError> for GatewayError {
    fn from(value: CredentialError) -> Self {
        GatewayError::invalid_request(format!("credential unavailable: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_carries_numeric_code_in_message() {
        let error = GatewayError::non_success_status(503);
        assert_eq!(error.status, Some(503));
        assert_eq!(error.to_string(), "NonSuccessStatus: API error: 503");
    }

    #[test]
    fn helper_builders_assign_expected_kinds() {
        assert_eq!(
            GatewayError::network_unreachable("refused").kind,
            GatewayErrorKind::NetworkUnreachable
        );
        assert_eq!(
            GatewayError::decode_failure("eof").kind,
            GatewayErrorKind::DecodeFailure
        );
        assert_eq!(GatewayError::decode_failure("eof").status, None);
        assert_eq!(GatewayErrorKind::DecodeFailure.as_str(), "decode_failure");
    }

    #[test]
    fn credential_error_converts_to_invalid_request() {
        let error: GatewayError = CredentialError::unavailable("lock poisoned").into();
        assert_eq!(error.kind, GatewayErrorKind::InvalidRequest);
        assert!(error.message.contains("lock poisoned"));
    }
}
