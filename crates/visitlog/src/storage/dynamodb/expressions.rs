//! Expression strings and request shaping for DynamoDB calls.
//!
//! Attribute names always go through `#placeholders` so reserved words
//! (`name`, `state`, ...) never break an expression.

use visitlog_core::storage::{RepositoryError, Result};

/// Maximum number of keys DynamoDB accepts in one `BatchGetItem` request.
pub const BATCH_GET_MAX_KEYS: usize = 100;

/// Placeholder for the key attribute named in put/update conditions.
pub const KEY_NAME: &str = "#k";

/// Only write when no item with this key exists.
pub const IF_ABSENT: &str = "attribute_not_exists(#k)";

/// Only update an item that exists.
pub const IF_EXISTS: &str = "attribute_exists(#k)";

/// Placeholder for the counter attribute.
pub const COUNTER_NAME: &str = "#a";

/// Adds `:delta` to the counter, treating a missing counter as `:zero`.
pub const INCREMENT: &str = "SET #a = if_not_exists(#a, :zero) + :delta";

/// Placeholder for the partition attribute of a query.
pub const PARTITION_NAME: &str = "#p";

/// Placeholder for the partition value of a query.
pub const PARTITION_VALUE: &str = ":p";

/// Matches every item of one partition.
pub const PARTITION_CONDITION: &str = "#p = :p";

/// Builds a projection expression and the attribute names it references.
pub fn projection(attributes: &[&str]) -> (String, Vec<(String, String)>) {
    let names: Vec<(String, String)> = attributes
        .iter()
        .enumerate()
        .map(|(i, attr)| (format!("#p{}", i), attr.to_string()))
        .collect();
    let expression = names
        .iter()
        .map(|(placeholder, _)| placeholder.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    (expression, names)
}

/// Converts a page size to the SDK's `Limit`, which must be a positive `i32`.
pub fn query_limit(limit: usize) -> Result<i32> {
    match i32::try_from(limit) {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(RepositoryError::InvalidData(format!(
            "Query limit must be between 1 and {}, got {}",
            i32::MAX,
            limit
        ))),
    }
}

/// Backoff before retrying unprocessed batch keys, doubling per attempt.
pub fn batch_retry_delay_ms(attempt: u32) -> u64 {
    25u64.saturating_mul(1 << attempt.min(6))
}
