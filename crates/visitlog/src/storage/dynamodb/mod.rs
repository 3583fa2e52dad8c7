//! DynamoDB storage backend.
//!
//! This module provides a DynamoDB-based implementation of the `StoreClient`
//! trait using `aws-sdk-dynamodb`. Tables must already exist; see
//! `cargo xtask dynamodb deploy`.

mod conversions;
mod error;
mod expressions;
mod store;

pub use store::DynamoDbStore;
