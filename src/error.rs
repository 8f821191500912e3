use thiserror::Error;

/// Failure reported by a key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

#[cfg(feature = "storage-redis")]
impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::backend(err)
    }
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Cannot decode message '{type_id}': {reason}")]
    Decode { type_id: String, reason: String },
    #[error("Unsupported message type: {0}")]
    Unsupported(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Handler fault: {0}")]
    HandlerFault(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
