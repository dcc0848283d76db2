//! Error types for the MySQL record store.

use stress_core::StoreError;
use thiserror::Error;

/// Errors that can occur in the MySQL record store.
#[derive(Error, Debug)]
pub enum MySQLStoreError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// Malformed connection string.
    #[error("Invalid MySQL connection string: {0}")]
    Url(#[from] mysql_async::UrlError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<MySQLStoreError> for StoreError {
    fn from(err: MySQLStoreError) -> Self {
        use mysql_async::{DriverError, Error};

        match err {
            MySQLStoreError::MySQL(
                e @ (Error::Io(_)
                | Error::Driver(DriverError::PoolDisconnected)
                | Error::Driver(DriverError::ConnectionClosed)),
            ) => StoreError::Unavailable(e.to_string()),
            other => StoreError::backend(other),
        }
    }
}
