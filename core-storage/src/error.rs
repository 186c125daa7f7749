use bridge_traits::BridgeError;
use core_runtime::envelope::ErrorInfo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Blob store error: {0}")]
    Store(#[from] BridgeError),
}

impl From<StorageError> for ErrorInfo {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Store(inner) => inner.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
