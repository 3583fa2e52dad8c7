//! Collection names, attribute names and key construction for visits.
//!
//! Pure functions; nothing here talks to a store.

use crate::storage::{item, AttributeValue, IndexSchema, Item, TableSchema};

use super::types::VisitKey;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_VISIT_TABLE: &str = "visit";
pub const DEFAULT_VISIT_INDEX: &str = "visit_location-visitor-index";
pub const DEFAULT_VISITOR_TABLE: &str = "visitor";

/// Page size used when a query does not specify one.
pub const DEFAULT_PAGE_LIMIT: usize = 2;

// ============================================================================
// Attribute names
// ============================================================================

pub const VISITOR_ATTR: &str = "visitor";
/// `location` is a DynamoDB reserved word and cannot be used in key
/// condition expressions, hence the prefix.
pub const LOCATION_ATTR: &str = "visit_location";
pub const VISIT_COUNT_ATTR: &str = "visit_count";

pub const NAME_ATTR: &str = "name";
pub const EMAIL_ATTR: &str = "email";
pub const CITY_ATTR: &str = "city";
pub const STATE_ATTR: &str = "state";

// ============================================================================
// Collections
// ============================================================================

/// Names of the collections and index backing the repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitTables {
    pub visit_table: String,
    pub visit_index: String,
    pub visitor_table: String,
}

impl Default for VisitTables {
    fn default() -> Self {
        Self {
            visit_table: DEFAULT_VISIT_TABLE.to_string(),
            visit_index: DEFAULT_VISIT_INDEX.to_string(),
            visitor_table: DEFAULT_VISITOR_TABLE.to_string(),
        }
    }
}

impl VisitTables {
    /// Key schema of the visit collection and its location index.
    pub fn visit_schema(&self) -> TableSchema {
        TableSchema::new(&self.visit_table, VISITOR_ATTR)
            .with_sort_key(LOCATION_ATTR)
            .with_index(IndexSchema::new(&self.visit_index, LOCATION_ATTR).with_sort_key(VISITOR_ATTR))
    }

    /// Key schema of the visitor collection.
    pub fn visitor_schema(&self) -> TableSchema {
        TableSchema::new(&self.visitor_table, NAME_ATTR)
    }

    /// Both schemas, visit collection first.
    pub fn schemas(&self) -> Vec<TableSchema> {
        vec![self.visit_schema(), self.visitor_schema()]
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Primary key item of a visit.
pub fn visit_key(key: &VisitKey) -> Item {
    item([
        (VISITOR_ATTR, AttributeValue::S(key.visitor.clone())),
        (LOCATION_ATTR, AttributeValue::S(key.location.clone())),
    ])
}

/// Primary key item of a visitor profile.
pub fn visitor_key(name: &str) -> Item {
    item([(NAME_ATTR, AttributeValue::S(name.to_string()))])
}

// ============================================================================
// Access paths
// ============================================================================

/// The two ordered views over the visit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPath {
    /// Base collection: partition = visitor, ordered by location.
    ByVisitor,
    /// Location index: partition = location, ordered by visitor.
    ByLocation,
}

impl AccessPath {
    /// Attribute holding the partition value on this path.
    pub fn partition_attribute(self) -> &'static str {
        match self {
            AccessPath::ByVisitor => VISITOR_ATTR,
            AccessPath::ByLocation => LOCATION_ATTR,
        }
    }

    /// Index to query, `None` for the base collection.
    pub fn index_name(self, tables: &VisitTables) -> Option<String> {
        match self {
            AccessPath::ByVisitor => None,
            AccessPath::ByLocation => Some(tables.visit_index.clone()),
        }
    }

    /// Rebuilds the full key of the cursor item from the partition value and
    /// the sort value the caller kept from the previous page.
    pub fn cursor_key(self, partition: &str, cursor: &str) -> VisitKey {
        match self {
            AccessPath::ByVisitor => VisitKey::new(partition, cursor),
            AccessPath::ByLocation => VisitKey::new(cursor, partition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_key_item() {
        let key = visit_key(&VisitKey::new("matt", "utah"));

        assert_eq!(key.get(VISITOR_ATTR).and_then(|v| v.as_s()), Some("matt"));
        assert_eq!(key.get(LOCATION_ATTR).and_then(|v| v.as_s()), Some("utah"));
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn test_visitor_key_item() {
        let key = visitor_key("elliot");
        assert_eq!(key.get(NAME_ATTR).and_then(|v| v.as_s()), Some("elliot"));
        assert_eq!(key.len(), 1);
    }

    #[test]
    fn test_cursor_key_by_visitor() {
        assert_eq!(
            AccessPath::ByVisitor.cursor_key("matt", "guatemala"),
            VisitKey::new("matt", "guatemala")
        );
    }

    #[test]
    fn test_cursor_key_by_location() {
        assert_eq!(
            AccessPath::ByLocation.cursor_key("italy", "elliot"),
            VisitKey::new("elliot", "italy")
        );
    }

    #[test]
    fn test_access_path_index_names() {
        let tables = VisitTables::default();
        assert_eq!(AccessPath::ByVisitor.index_name(&tables), None);
        assert_eq!(
            AccessPath::ByLocation.index_name(&tables),
            Some("visit_location-visitor-index".to_string())
        );
        assert_eq!(AccessPath::ByVisitor.partition_attribute(), "visitor");
        assert_eq!(AccessPath::ByLocation.partition_attribute(), "visit_location");
    }

    #[test]
    fn test_visit_schema_inverts_key_on_index() {
        let schema = VisitTables::default().visit_schema();

        assert_eq!(schema.table_name, "visit");
        assert_eq!(schema.partition_key, VISITOR_ATTR);
        assert_eq!(schema.sort_key.as_deref(), Some(LOCATION_ATTR));

        let index = schema.index(DEFAULT_VISIT_INDEX).unwrap();
        assert_eq!(index.partition_key, LOCATION_ATTR);
        assert_eq!(index.sort_key.as_deref(), Some(VISITOR_ATTR));
    }

    #[test]
    fn test_visitor_schema() {
        let schema = VisitTables::default().visitor_schema();
        assert_eq!(schema.table_name, "visitor");
        assert_eq!(schema.key_attributes(), vec!["name"]);
        assert!(schema.indexes.is_empty());
    }
}
