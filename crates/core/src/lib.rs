//! Functional core of visitlog.
//!
//! Domain types, key construction and item conversions for visits and
//! visitor profiles, the [`storage::StoreClient`] abstraction over a
//! partitioned key-value store, and the repositories built on it.

pub mod storage;
pub mod visits;
