//! Item conversion functions.
//!
//! Pure functions for converting between store items and domain types.

use crate::storage::{item, AttributeValue, Item, RepositoryError};

use super::keys::{
    CITY_ATTR, EMAIL_ATTR, LOCATION_ATTR, NAME_ATTR, STATE_ATTR, VISITOR_ATTR, VISIT_COUNT_ATTR,
};
use super::types::{Visit, Visitor};

// ============================================================================
// Visit conversions
// ============================================================================

/// Convert a Visit to a store item.
pub fn visit_to_item(visit: &Visit) -> Result<Item, RepositoryError> {
    let count = i64::try_from(visit.count)
        .map_err(|_| RepositoryError::Serialization(format!("Count out of range: {}", visit.count)))?;

    Ok(item([
        (VISITOR_ATTR, AttributeValue::S(visit.visitor.clone())),
        (LOCATION_ATTR, AttributeValue::S(visit.location.clone())),
        (VISIT_COUNT_ATTR, AttributeValue::N(count)),
    ]))
}

/// Convert a store item to a Visit.
///
/// A missing count attribute reads as zero.
pub fn item_to_visit(item: &Item) -> Result<Visit, RepositoryError> {
    Ok(Visit {
        visitor: get_string(item, VISITOR_ATTR)?,
        location: get_string(item, LOCATION_ATTR)?,
        count: get_count(item, VISIT_COUNT_ATTR)?,
    })
}

// ============================================================================
// Visitor conversions
// ============================================================================

/// Convert a Visitor to a store item.
pub fn visitor_to_item(visitor: &Visitor) -> Item {
    item([
        (NAME_ATTR, AttributeValue::S(visitor.name.clone())),
        (EMAIL_ATTR, AttributeValue::S(visitor.email.clone())),
        (CITY_ATTR, AttributeValue::S(visitor.city.clone())),
        (STATE_ATTR, AttributeValue::S(visitor.state.clone())),
    ])
}

/// Convert a store item to a Visitor.
pub fn item_to_visitor(item: &Item) -> Result<Visitor, RepositoryError> {
    Ok(Visitor {
        name: get_string(item, NAME_ATTR)?,
        email: get_string(item, EMAIL_ATTR)?,
        city: get_string(item, CITY_ATTR)?,
        state: get_string(item, STATE_ATTR)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a counter attribute; absent means zero, negative is invalid.
pub fn get_count(item: &Item, key: &str) -> Result<u64, RepositoryError> {
    match item.get(key) {
        None => Ok(0),
        Some(AttributeValue::N(n)) => u64::try_from(*n)
            .map_err(|_| RepositoryError::InvalidData(format!("Negative count {}: {}", key, n))),
        Some(other) => Err(RepositoryError::InvalidData(format!(
            "Invalid number {}: {}",
            key, other
        ))),
    }
}
