//! Error types for record store operations.

use thiserror::Error;

/// Errors surfaced by a [`RecordStore`](crate::RecordStore).
///
/// The operations in this crate never retry and never wrap these errors; they
/// reach the caller exactly as the store produced them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached at all (connection lost, pool closed).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed a single call.
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Record not found.
    #[error("Record {0} not found")]
    RecordNotFound(u64),

    /// The store did not report an id for an inserted record.
    #[error("Store did not return an id for inserted record '{0}'")]
    MissingInsertId(String),
}

impl StoreError {
    /// Wrap any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }

    /// Whether the error ends the current invocation.
    ///
    /// Only [`StoreError::Unavailable`] is fatal; the seeding loop keeps going
    /// after any other failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
