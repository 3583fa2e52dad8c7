//! Collection key schemas (pure data).
//!
//! Backends use these to know which attributes form the primary key of a
//! collection and of each of its secondary indexes. The DynamoDB deploy task
//! turns them into `CreateTable` requests; the in-memory store uses them to
//! order and partition items.

use super::types::{AttributeValue, Item};
use super::{RepositoryError, Result};

/// Key schema of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
    pub indexes: Vec<IndexSchema>,
}

/// Key schema of a secondary index. Indexes always project every attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
}

impl TableSchema {
    /// Creates a schema with only a partition key.
    pub fn new(table_name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: partition_key.into(),
            sort_key: None,
            indexes: Vec::new(),
        }
    }

    /// Sets the sort key.
    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    /// Adds a secondary index.
    pub fn with_index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    /// Looks up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Names of the primary key attributes, partition key first.
    pub fn key_attributes(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.as_str()];
        if let Some(sk) = &self.sort_key {
            names.push(sk.as_str());
        }
        names
    }

    /// Renders the key attributes of `key` as `partition/sort`, for messages.
    pub fn describe_key(&self, key: &Item) -> String {
        self.key_attributes()
            .into_iter()
            .filter_map(|name| key.get(name))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Extracts the primary key from an item (or validates a key).
    pub fn key_of(&self, item: &Item) -> Result<Item> {
        self.key_attributes()
            .into_iter()
            .map(|name| {
                item.get(name)
                    .cloned()
                    .map(|v| (name.to_string(), v))
                    .ok_or_else(|| {
                        RepositoryError::InvalidData(format!(
                            "Missing key attribute {} for table {}",
                            name, self.table_name
                        ))
                    })
            })
            .collect()
    }
}

impl IndexSchema {
    pub fn new(name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }
}

/// Reads a key attribute, failing if it is missing.
pub fn key_value<'a>(item: &'a Item, attribute: &str) -> Result<&'a AttributeValue> {
    item.get(attribute)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing key attribute {attribute}")))
}
