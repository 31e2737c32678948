//! Error types for the resource pool

use thiserror::Error;

/// Error returned by a [`ResourceFactory`](crate::ResourceFactory) destroyer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid pool configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Resource {id} is not tracked by this pool")]
    ForeignOrUnknownHandle { id: u64 },

    #[error("Resource {id} was already released")]
    DoubleRelease { id: u64 },

    #[error("Failed to destroy resource {id}: {reason}")]
    Destroy { id: u64, reason: String },
}

pub type PoolResult<T> = Result<T, PoolError>;
