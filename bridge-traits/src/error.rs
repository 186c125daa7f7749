use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Backend capability not available: {0}")]
    NotAvailable(String),

    #[error("Backend operation failed: {0}")]
    OperationFailed(String),

    #[error("Credentials rejected: {0}")]
    CredentialsRejected(String),

    #[error("Document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
