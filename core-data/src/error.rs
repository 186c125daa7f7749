use bridge_traits::BridgeError;
use core_runtime::envelope::ErrorInfo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("id required")]
    IdRequired,

    #[error("unsupported delete")]
    UnsupportedDelete,

    #[error("unsupported payload: {0}")]
    UnsupportedPayload(String),

    #[error("Document store error: {0}")]
    Store(#[from] BridgeError),
}

impl From<DataError> for ErrorInfo {
    fn from(err: DataError) -> Self {
        match err {
            DataError::IdRequired => ErrorInfo::contract("id required"),
            DataError::UnsupportedDelete => ErrorInfo::contract("unsupported delete"),
            DataError::UnsupportedPayload(_) => ErrorInfo::contract(err.to_string()),
            DataError::Store(inner) => inner.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
