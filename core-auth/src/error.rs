use bridge_traits::BridgeError;
use core_runtime::envelope::ErrorInfo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no active user")]
    NoActiveUser,

    #[error("Identity provider error: {0}")]
    Provider(#[from] BridgeError),

    #[error("Invalid register-user endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<AuthError> for ErrorInfo {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoActiveUser => ErrorInfo::auth("no active user"),
            AuthError::Provider(inner) => inner.into(),
            AuthError::InvalidEndpoint(_) => ErrorInfo::contract(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
