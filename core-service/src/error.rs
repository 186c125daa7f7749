use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Data error: {0}")]
    Data(#[from] core_data::DataError),

    #[error("Storage error: {0}")]
    Storage(#[from] core_storage::StorageError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
