use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value as persisted by the store.
///
/// Only the scalar kinds the visit data model needs are represented.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeValue {
    /// String attribute.
    S(String),
    /// Number attribute.
    N(i64),
}

impl AttributeValue {
    /// Returns the string value, if this is a string attribute.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            AttributeValue::N(_) => None,
        }
    }

    /// Returns the numeric value, if this is a number attribute.
    pub fn as_n(&self) -> Option<i64> {
        match self {
            AttributeValue::N(n) => Some(*n),
            AttributeValue::S(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) => write!(f, "{s}"),
            AttributeValue::N(n) => write!(f, "{n}"),
        }
    }
}

/// An item (or key) is a map of attribute names to values.
///
/// `BTreeMap` keeps attribute order stable, which keeps test assertions
/// deterministic. Key order for messages comes from `TableSchema::describe_key`.
pub type Item = BTreeMap<String, AttributeValue>;

/// Write condition for a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutCondition {
    /// Unconditional overwrite.
    #[default]
    Always,
    /// Only write if no item with the same primary key exists.
    IfAbsent,
}

/// A range query over one partition of a collection or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Secondary index to query instead of the base collection.
    pub index: Option<String>,
    /// Name of the attribute acting as partition key on the queried path.
    pub partition_attribute: String,
    /// Partition value to scan.
    pub partition_value: AttributeValue,
    /// Full key of the last item of the previous page; the scan starts
    /// strictly after it.
    pub exclusive_start_key: Option<Item>,
    /// Maximum number of items to return.
    pub limit: usize,
}

/// One page of a range query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryPage {
    /// Items in ascending sort-key order.
    pub items: Vec<Item>,
    /// Continuation key reported by the store. `Some` means the store
    /// believes more items may follow.
    pub last_evaluated_key: Option<Item>,
}

/// Builds an item from `(name, value)` pairs.
pub fn item<I, K>(pairs: I) -> Item
where
    I: IntoIterator<Item = (K, AttributeValue)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
