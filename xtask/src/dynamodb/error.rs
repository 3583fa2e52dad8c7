//! Error types for DynamoDB operations.

use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' not found, run `cargo xtask dynamodb deploy` first")]
    TableNotFound { table_name: String },

    #[error("Table '{table_name}' has key {found}, expected {expected}")]
    KeySchemaMismatch {
        table_name: String,
        expected: String,
        found: String,
    },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("{count} items were still unprocessed after retrying")]
    UnprocessedItems { count: usize },
}

/// Maps any displayable SDK or builder error.
pub fn sdk_error(err: impl std::fmt::Display) -> DynamodbError {
    DynamodbError::AwsSdk(err.to_string())
}
