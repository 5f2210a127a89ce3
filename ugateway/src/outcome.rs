//! Tagged call outcomes returned by the gateway.
//!
//! ```rust
//! use ugateway::{GatewayError, ResponseOutcome};
//!
//! let ok = ResponseOutcome::Success(serde_json::json!([1, 2]));
//! let failed = ResponseOutcome::Failure(GatewayError::non_success_status(500));
//!
//! assert!(ok.is_success());
//! assert!(failed.into_result().is_err());
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success(Value),
    Failure(GatewayError),
}

impl ResponseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&GatewayError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Value, GatewayError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    /// Decodes a success payload into `T`; a shape mismatch becomes a decode failure.
    pub fn decode<T>(self) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let value = self.into_result()?;
        serde_json::from_value(value).map_err(|err| GatewayError::decode_failure(err.to_string()))
    }
}

impl From<Result<Value, GatewayError>> for ResponseOutcome {
    fn from(value: Result<Value, GatewayError>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::GatewayErrorKind;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Team {
        id: u32,
        name: String,
    }

    #[test]
    fn decode_maps_shape_mismatch_to_decode_failure() {
        let outcome = ResponseOutcome::Success(serde_json::json!({ "unexpected": true }));
        let error = outcome.decode::<Team>().expect_err("shape should not match");
        assert_eq!(error.kind, GatewayErrorKind::DecodeFailure);
    }

    #[test]
    fn decode_passes_failures_through() {
        let outcome = ResponseOutcome::Failure(GatewayError::non_success_status(401));
        let error = outcome.decode::<Team>().expect_err("failure should propagate");
        assert_eq!(error.status, Some(401));
    }

    #[test]
    fn decode_reads_matching_payload() {
        let outcome = ResponseOutcome::Success(serde_json::json!({ "id": 1, "name": "Cleaning" }));
        let team = outcome.decode::<Team>().expect("payload should decode");
        assert_eq!(
            team,
            Team {
                id: 1,
                name: "Cleaning".to_string()
            }
        );
    }
}
