//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the `StoreClient`
//! trait that keeps every collection in a `BTreeMap` wrapped in
//! `Arc<RwLock<_>>`. It backs the unit tests and the `--store memory` mode of
//! the CLI; nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use visitlog_core::visits::VisitTables;
//!
//! let store = InMemoryStore::for_tables(&VisitTables::default());
//! ```

mod store;


pub use store::InMemoryStore;
