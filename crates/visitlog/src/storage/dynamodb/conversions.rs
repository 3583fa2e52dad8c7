//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between SDK attribute maps and store items.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use visitlog_core::storage::{AttributeValue, Item, RepositoryError};

/// An attribute map as the SDK sends and receives it.
pub type SdkItem = HashMap<String, SdkValue>;

/// Convert a store value to an SDK value.
pub fn to_sdk_value(value: &AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s.clone()),
        AttributeValue::N(n) => SdkValue::N(n.to_string()),
    }
}

/// Convert an SDK value to a store value.
///
/// Numbers arrive as decimal strings; only integers are accepted.
pub fn from_sdk_value(name: &str, value: &SdkValue) -> Result<AttributeValue, RepositoryError> {
    match value {
        SdkValue::S(s) => Ok(AttributeValue::S(s.clone())),
        SdkValue::N(n) => n.parse().map(AttributeValue::N).map_err(|_| {
            RepositoryError::Serialization(format!("Invalid number for {}: {}", name, n))
        }),
        other => Err(RepositoryError::Serialization(format!(
            "Unsupported attribute type for {}: {:?}",
            name, other
        ))),
    }
}

/// Convert a store item (or key) to an SDK attribute map.
///
/// `xtask` seeds visitors with its own copy of this mapping.
pub fn to_sdk_item(item: &Item) -> SdkItem {
    item.iter()
        .map(|(name, value)| (name.clone(), to_sdk_value(value)))
        .collect()
}

/// Convert an SDK attribute map to a store item.
pub fn from_sdk_item(item: &SdkItem) -> Result<Item, RepositoryError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), from_sdk_value(name, value)?)))
        .collect()
}

/// Read a numeric attribute from an SDK attribute map.
pub fn get_number(item: &SdkItem, key: &str) -> Result<i64, RepositoryError> {
    let value = item
        .get(key)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing field: {}", key)))?;
    from_sdk_value(key, value)?
        .as_n()
        .ok_or_else(|| RepositoryError::InvalidData(format!("Field {} is not a number", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use visitlog_core::storage::item;

    #[test]
    fn test_item_conversion_preserves_values() {
        let original = item([
            ("visitor", AttributeValue::S("matt".to_string())),
            ("visit_location", AttributeValue::S("utah".to_string())),
            ("visit_count", AttributeValue::N(3)),
        ]);

        let sdk = to_sdk_item(&original);

        assert_eq!(sdk.get("visitor"), Some(&SdkValue::S("matt".to_string())));
        assert_eq!(sdk.get("visit_count"), Some(&SdkValue::N("3".to_string())));
        assert_eq!(from_sdk_item(&sdk).unwrap(), original);
    }

    #[test]
    fn test_from_sdk_value_rejects_fractional_numbers() {
        let result = from_sdk_value("visit_count", &SdkValue::N("1.5".to_string()));
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn test_from_sdk_value_rejects_other_types() {
        let result = from_sdk_value("flag", &SdkValue::Bool(true));
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));
    }

    #[test]
    fn test_get_number() {
        let mut item = SdkItem::new();
        item.insert("visit_count".to_string(), SdkValue::N("42".to_string()));
        item.insert("visitor".to_string(), SdkValue::S("matt".to_string()));

        assert_eq!(get_number(&item, "visit_count").unwrap(), 42);
        assert!(matches!(
            get_number(&item, "visitor"),
            Err(RepositoryError::InvalidData(_))
        ));
        assert!(matches!(
            get_number(&item, "missing"),
            Err(RepositoryError::InvalidData(_))
        ));
    }
}
