//! # Result Envelope
//!
//! The universal `{ data, error }` settle shape returned by every public
//! gateway method.
//!
//! ## Overview
//!
//! The adapter never lets an error cross its boundary as a panic or a bare
//! `Err`: each operation settles to an [`Envelope`] carrying either a payload
//! or an [`ErrorInfo`], so calling code inspects one uniform shape regardless
//! of which backend misbehaved.
//!
//! ## Invariant
//!
//! Exactly one of `data`/`error` is populated on settle. Operations whose
//! contract reports `null` data on success (sign-out, password reset, delete)
//! use `Envelope<()>`; the unit payload serializes to JSON `null`, which
//! keeps both the wire shape and the invariant intact.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::envelope::{Envelope, ErrorInfo};
//!
//! let ok: Envelope<u32> = Envelope::ok(7);
//! assert_eq!(ok.data, Some(7));
//! assert!(ok.error.is_none());
//!
//! let err: Envelope<u32> = Envelope::err(ErrorInfo::contract("id required"));
//! assert!(err.data.is_none());
//! assert_eq!(err.error.unwrap().message, "id required");
//! ```

use bridge_traits::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of an adapter error.
///
/// Mirrors the error taxonomy: transport failures from a backend, contract
/// violations caught before any write, and identity-provider rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A backend call failed (network, storage, provider outage).
    Backend,
    /// The caller violated the adapter contract; nothing was written.
    Contract,
    /// The identity provider rejected the operation or no user is active.
    Auth,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Backend => write!(f, "backend"),
            ErrorCode::Contract => write!(f, "contract"),
            ErrorCode::Auth => write!(f, "auth"),
        }
    }
}

/// Error payload carried inside an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    /// A backend-transport error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Backend,
            message: message.into(),
        }
    }

    /// A contract-violation error; the operation aborted before any write.
    pub fn contract(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Contract,
            message: message.into(),
        }
    }

    /// An identity-provider error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Auth,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorInfo {}

impl From<BridgeError> for ErrorInfo {
    fn from(err: BridgeError) -> Self {
        match &err {
            BridgeError::CredentialsRejected(_) => Self::auth(err.to_string()),
            _ => Self::backend(err.to_string()),
        }
    }
}

/// The uniform settle shape of every adapter operation.
///
/// Construct with [`Envelope::ok`] or [`Envelope::err`]; the two constructors
/// are the only way the crate populates an envelope, which is what upholds
/// the one-side-populated invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<ErrorInfo>,
}

impl<T> Envelope<T> {
    /// Settle with a payload.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Settle with an error.
    pub fn err(error: impl Into<ErrorInfo>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
        }
    }

    /// Whether the envelope settled with a payload.
    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the envelope settled with an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Convert to a `Result`, for callers that prefer `?`-style handling.
    pub fn into_result(self) -> std::result::Result<T, ErrorInfo> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ErrorInfo::backend("envelope settled with neither side")),
        }
    }

    /// Map the payload, leaving an error untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<std::result::Result<T, BridgeError>> for Envelope<T> {
    fn from(result: std::result::Result<T, BridgeError>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(err) => Envelope::err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_populates_exactly_one_side() {
        let envelope = Envelope::ok(42);
        assert!(envelope.is_ok());
        assert!(!envelope.is_err());
        assert_eq!(envelope.data, Some(42));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn err_populates_exactly_one_side() {
        let envelope: Envelope<u32> = Envelope::err(ErrorInfo::contract("unsupported delete"));
        assert!(envelope.is_err());
        assert!(envelope.data.is_none());
        let error = envelope.error.unwrap();
        assert_eq!(error.code, ErrorCode::Contract);
        assert_eq!(error.message, "unsupported delete");
    }

    #[test]
    fn unit_payload_serializes_to_null_data() {
        let envelope = Envelope::ok(());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({ "data": null, "error": null }));
        // The typed side still distinguishes success from absence.
        assert!(envelope.is_ok());
    }

    #[test]
    fn bridge_error_maps_to_backend_code() {
        let envelope: Envelope<u32> =
            Envelope::err(BridgeError::OperationFailed("socket closed".to_string()));
        assert_eq!(envelope.error.unwrap().code, ErrorCode::Backend);
    }

    #[test]
    fn credentials_rejection_maps_to_auth_code() {
        let envelope: Envelope<u32> =
            Envelope::err(BridgeError::CredentialsRejected("wrong password".to_string()));
        assert_eq!(envelope.error.unwrap().code, ErrorCode::Auth);
    }

    #[test]
    fn into_result_round_trips() {
        assert_eq!(Envelope::ok(5).into_result().unwrap(), 5);
        let err: Envelope<u32> = Envelope::err(ErrorInfo::auth("no active user"));
        assert_eq!(err.into_result().unwrap_err().code, ErrorCode::Auth);
    }

    #[test]
    fn map_preserves_error() {
        let err: Envelope<u32> = Envelope::err(ErrorInfo::backend("down"));
        let mapped = err.map(|n| n.to_string());
        assert!(mapped.is_err());
        assert!(mapped.data.is_none());
    }
}
