//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `StoreClient` trait
//! defined in `visitlog_core::storage`. The backend is picked at runtime with
//! `--store`; the DynamoDB backend is only compiled in with its feature.
//!
//! # Feature Flags
//!
//! - `dynamodb`: AWS DynamoDB storage backend using `aws-sdk-dynamodb`
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p visitlog --features dynamodb
//! ```

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

use std::sync::Arc;

use clap::ValueEnum;
use visitlog_core::storage::StoreClient;

pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

use crate::config::Config;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// Process-local store that starts empty on every run.
    #[default]
    Memory,
    /// AWS DynamoDB (or a local DynamoDB via `AWS_ENDPOINT_URL`).
    Dynamodb,
}

/// Opens the selected backend with the configured tables registered.
pub async fn connect(kind: StoreKind, config: &Config) -> anyhow::Result<Arc<dyn StoreClient>> {
    match kind {
        StoreKind::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(InMemoryStore::for_tables(&config.tables)))
        }
        #[cfg(feature = "dynamodb")]
        StoreKind::Dynamodb => {
            let store = DynamoDbStore::connect(&config.aws, config.tables.schemas()).await;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "dynamodb"))]
        StoreKind::Dynamodb => anyhow::bail!(
            "visitlog was built without DynamoDB support. \
            Rebuild with: cargo build -p visitlog --features dynamodb"
        ),
    }
}
