//! In-memory store implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use visitlog_core::storage::{
    key_value, AttributeValue, Item, PutCondition, QueryPage, QueryRequest,
    RepositoryError, Result, StoreClient, TableSchema,
};
use visitlog_core::visits::VisitTables;

/// Items of one collection, keyed by primary key.
#[derive(Debug)]
struct Table {
    schema: TableSchema,
    items: BTreeMap<Item, Item>,
}

/// In-memory store for testing and local runs.
///
/// Collections must be registered up front with their key schema. Secondary
/// indexes are evaluated on read and project every attribute. Every operation
/// takes the lock once, so conditional puts and increments are atomic.
///
/// A query only reports a continuation key when more matching items follow
/// the returned page.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    /// Creates a store with the given collections registered.
    pub fn new(schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        let tables = schemas
            .into_iter()
            .map(|schema| {
                (
                    schema.table_name.clone(),
                    Table {
                        schema,
                        items: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Creates a store with the visit and visitor collections registered.
    pub fn for_tables(tables: &VisitTables) -> Self {
        Self::new(tables.schemas())
    }

    /// Number of items in a collection, 0 for unknown collections.
    #[cfg(test)]
    pub async fn len(&self, collection: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(collection).map_or(0, |t| t.items.len())
    }
}

fn table_not_found(collection: &str) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Table not found: {collection}"))
}

/// Sort position of an item on a query path.
fn position(item: &Item, order: &[&str]) -> Vec<Option<AttributeValue>> {
    order.iter().map(|name| item.get(*name).cloned()).collect()
}

fn project(item: &Item, projection: Option<&[&str]>) -> Item {
    match projection {
        Some(names) => item
            .iter()
            .filter(|(k, _)| names.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        None => item.clone(),
    }
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn get(
        &self,
        collection: &str,
        key: &Item,
        projection: Option<&[&str]>,
    ) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(collection)
            .ok_or_else(|| table_not_found(collection))?;

        let key = table.schema.key_of(key)?;
        Ok(table.items.get(&key).map(|item| project(item, projection)))
    }

    async fn put(&self, collection: &str, item: Item, condition: PutCondition) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(collection)
            .ok_or_else(|| table_not_found(collection))?;

        let key = table.schema.key_of(&item)?;
        if condition == PutCondition::IfAbsent && table.items.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Item",
                id: table.schema.describe_key(&key),
            });
        }

        table.items.insert(key, item);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &Item,
        attribute: &str,
        delta: i64,
    ) -> Result<i64> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(collection)
            .ok_or_else(|| table_not_found(collection))?;

        let key = table.schema.key_of(key)?;
        let item = table
            .items
            .get_mut(&key)
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Item",
                id: table.schema.describe_key(&key),
            })?;

        let current = match item.get(attribute) {
            None => 0,
            Some(AttributeValue::N(n)) => *n,
            Some(other) => {
                return Err(RepositoryError::InvalidData(format!(
                    "Cannot add to non-numeric {attribute}: {other}"
                )))
            }
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| RepositoryError::InvalidData(format!("{attribute} overflowed")))?;

        item.insert(attribute.to_string(), AttributeValue::N(next));
        Ok(next)
    }

    async fn delete(&self, collection: &str, key: &Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(collection)
            .ok_or_else(|| table_not_found(collection))?;

        let key = table.schema.key_of(key)?;
        table.items.remove(&key);
        Ok(())
    }

    async fn query(&self, collection: &str, request: QueryRequest) -> Result<QueryPage> {
        if request.limit == 0 {
            return Err(RepositoryError::InvalidData(
                "Limit must be at least 1".to_string(),
            ));
        }

        let tables = self.tables.read().await;
        let table = tables
            .get(collection)
            .ok_or_else(|| table_not_found(collection))?;
        let schema = &table.schema;

        // Partition attribute plus the attributes that order items on this
        // path. Index order falls back to the table key to stay total.
        let (partition_key, order): (&str, Vec<&str>) = match &request.index {
            None => (
                schema.partition_key.as_str(),
                schema.sort_key.iter().map(String::as_str).collect(),
            ),
            Some(name) => {
                let index = schema.index(name).ok_or_else(|| {
                    RepositoryError::QueryFailed(format!("Index not found: {name}"))
                })?;
                let mut order: Vec<&str> = index.sort_key.iter().map(String::as_str).collect();
                order.extend(schema.key_attributes());
                (index.partition_key.as_str(), order)
            }
        };

        if request.partition_attribute != partition_key {
            return Err(RepositoryError::InvalidData(format!(
                "Query partition attribute {} does not match key {}",
                request.partition_attribute, partition_key
            )));
        }

        let start = match &request.exclusive_start_key {
            Some(start) => {
                if key_value(start, partition_key)? != &request.partition_value {
                    return Err(RepositoryError::InvalidData(
                        "Exclusive start key is outside the queried partition".to_string(),
                    ));
                }
                for name in &order {
                    key_value(start, name)?;
                }
                Some(position(start, &order))
            }
            None => None,
        };

        let mut matching: Vec<(Vec<Option<AttributeValue>>, &Item)> = table
            .items
            .values()
            .filter(|item| item.get(partition_key) == Some(&request.partition_value))
            .filter(|item| order.iter().all(|name| item.contains_key(*name)))
            .map(|item| (position(item, &order), item))
            .filter(|(pos, _)| start.as_ref().map_or(true, |start| pos > start))
            .collect();
        matching.sort_by(|a, b| a.0.cmp(&b.0));

        let has_more = matching.len() > request.limit;
        let items: Vec<Item> = matching
            .into_iter()
            .take(request.limit)
            .map(|(_, item)| item.clone())
            .collect();

        let last_evaluated_key = if has_more {
            let key_attributes: BTreeSet<&str> = std::iter::once(partition_key)
                .chain(order.iter().copied())
                .collect();
            items.last().map(|last| {
                last.iter()
                    .filter(|(k, _)| key_attributes.contains(k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
        } else {
            None
        };

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_get(&self, collection: &str, keys: Vec<Item>) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(collection)
            .ok_or_else(|| table_not_found(collection))?;

        let mut seen = BTreeSet::new();
        let mut found = Vec::new();
        for key in &keys {
            let key = table.schema.key_of(key)?;
            if let Some(item) = table.items.get(&key) {
                found.push(item.clone());
            }
            if !seen.insert(key) {
                return Err(RepositoryError::InvalidData(
                    "Provided list of item keys contains duplicates".to_string(),
                ));
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visitlog_core::storage::{item, IndexSchema};

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn visit(visitor: &str, location: &str) -> Item {
        item([
            ("visitor", s(visitor)),
            ("visit_location", s(location)),
            ("visit_count", AttributeValue::N(1)),
        ])
    }

    fn key(visitor: &str, location: &str) -> Item {
        item([("visitor", s(visitor)), ("visit_location", s(location))])
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new([TableSchema::new("visit", "visitor")
            .with_sort_key("visit_location")
            .with_index(IndexSchema::new("by-location", "visit_location").with_sort_key("visitor"))])
    }

    async fn seeded(visits: &[(&str, &str)]) -> InMemoryStore {
        let store = store();
        for (visitor, location) in visits {
            store
                .put("visit", visit(visitor, location), PutCondition::Always)
                .await
                .unwrap();
        }
        store
    }

    fn base_query(visitor: &str, start: Option<Item>, limit: usize) -> QueryRequest {
        QueryRequest {
            index: None,
            partition_attribute: "visitor".to_string(),
            partition_value: s(visitor),
            exclusive_start_key: start,
            limit,
        }
    }

    fn index_query(location: &str, start: Option<Item>, limit: usize) -> QueryRequest {
        QueryRequest {
            index: Some("by-location".to_string()),
            partition_attribute: "visit_location".to_string(),
            partition_value: s(location),
            exclusive_start_key: start,
            limit,
        }
    }

    fn locations(page: &QueryPage) -> Vec<&str> {
        page.items
            .iter()
            .filter_map(|i| i.get("visit_location").and_then(|v| v.as_s()))
            .collect()
    }

    fn visitors(page: &QueryPage) -> Vec<&str> {
        page.items
            .iter()
            .filter_map(|i| i.get("visitor").and_then(|v| v.as_s()))
            .collect()
    }

    // ==================== Point Operation Tests ====================

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let result = store().get("visit", &key("matt", "utah"), None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_with_projection() {
        let store = seeded(&[("matt", "utah")]).await;
        let item = store
            .get("visit", &key("matt", "utah"), Some(&["visit_count"][..]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(item.len(), 1);
        assert_eq!(item.get("visit_count"), Some(&AttributeValue::N(1)));
    }

    #[tokio::test]
    async fn test_unknown_collection_fails() {
        let result = store().get("nope", &key("matt", "utah"), None).await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_get_with_incomplete_key_fails() {
        let result = store()
            .get("visit", &item([("visitor", s("matt"))]), None)
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_put_if_absent_conflict() {
        let store = seeded(&[("matt", "utah")]).await;
        let result = store
            .put("visit", visit("matt", "utah"), PutCondition::IfAbsent)
            .await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_conflict_names_key_in_schema_order() {
        let store = seeded(&[("matt", "utah")]).await;

        let conflict = store
            .put("visit", visit("matt", "utah"), PutCondition::IfAbsent)
            .await;
        let missing = store
            .update("visit", &key("matt", "guatemala"), "visit_count", 1)
            .await;

        match conflict {
            Err(RepositoryError::AlreadyExists { id, .. }) => assert_eq!(id, "matt/utah"),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        match missing {
            Err(RepositoryError::NotFound { id, .. }) => assert_eq!(id, "matt/guatemala"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_always_overwrites() {
        let store = seeded(&[("matt", "utah")]).await;
        let mut replacement = visit("matt", "utah");
        replacement.insert("visit_count".to_string(), AttributeValue::N(7));

        store
            .put("visit", replacement, PutCondition::Always)
            .await
            .unwrap();

        let item = store.get("visit", &key("matt", "utah"), None).await.unwrap().unwrap();
        assert_eq!(item.get("visit_count"), Some(&AttributeValue::N(7)));
        assert_eq!(store.len("visit").await, 1);
    }

    #[tokio::test]
    async fn test_update_adds_delta() {
        let store = seeded(&[("matt", "utah")]).await;
        let next = store
            .update("visit", &key("matt", "utah"), "visit_count", 1)
            .await
            .unwrap();
        assert_eq!(next, 2);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let result = store()
            .update("visit", &key("matt", "utah"), "visit_count", 1)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_attribute_starts_at_zero() {
        let store = store();
        store
            .put("visit", key("matt", "utah"), PutCondition::Always)
            .await
            .unwrap();

        let next = store
            .update("visit", &key("matt", "utah"), "visit_count", 1)
            .await
            .unwrap();
        assert_eq!(next, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        store().delete("visit", &key("matt", "utah")).await.unwrap();
    }

    // ==================== Query Tests ====================

    #[tokio::test]
    async fn test_base_query_orders_by_sort_key_within_partition() {
        let store = seeded(&[("matt", "utah"), ("matt", "idaho"), ("nate", "italy")]).await;
        let page = store
            .query("visit", base_query("matt", None, 10))
            .await
            .unwrap();

        assert_eq!(locations(&page), vec!["idaho", "utah"]);
        assert!(page.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_base_query_paginates_with_exclusive_start() {
        let store = seeded(&[("matt", "guatemala"), ("matt", "idaho"), ("matt", "italy")]).await;

        let first = store
            .query("visit", base_query("matt", None, 2))
            .await
            .unwrap();
        assert_eq!(locations(&first), vec!["guatemala", "idaho"]);
        assert_eq!(first.last_evaluated_key, Some(key("matt", "idaho")));

        let second = store
            .query("visit", base_query("matt", first.last_evaluated_key, 2))
            .await
            .unwrap();
        assert_eq!(locations(&second), vec!["italy"]);
        assert!(second.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_exact_fit_page_reports_no_continuation() {
        let store = seeded(&[("matt", "idaho"), ("matt", "italy")]).await;
        let page = store
            .query("visit", base_query("matt", None, 2))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.last_evaluated_key.is_none());
    }

    #[tokio::test]
    async fn test_index_query_orders_by_index_sort_key() {
        let store = seeded(&[
            ("nate", "italy"),
            ("adam", "italy"),
            ("matt", "idaho"),
            ("elliot", "italy"),
        ])
        .await;

        let page = store
            .query("visit", index_query("italy", None, 10))
            .await
            .unwrap();
        assert_eq!(visitors(&page), vec!["adam", "elliot", "nate"]);
    }

    #[tokio::test]
    async fn test_index_continuation_key_carries_table_and_index_keys() {
        let store = seeded(&[("adam", "italy"), ("elliot", "italy"), ("nate", "italy")]).await;

        let page = store
            .query("visit", index_query("italy", None, 1))
            .await
            .unwrap();
        assert_eq!(page.last_evaluated_key, Some(key("adam", "italy")));

        let next = store
            .query("visit", index_query("italy", Some(key("adam", "italy")), 5))
            .await
            .unwrap();
        assert_eq!(visitors(&next), vec!["elliot", "nate"]);
    }

    #[tokio::test]
    async fn test_start_key_outside_partition_is_rejected() {
        let store = seeded(&[("matt", "idaho")]).await;
        let result = store
            .query("visit", base_query("matt", Some(key("nate", "idaho")), 2))
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_unknown_index_fails() {
        let mut request = index_query("italy", None, 2);
        request.index = Some("missing".to_string());

        let result = store().query("visit", request).await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let result = store().query("visit", base_query("matt", None, 0)).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    // ==================== Batch Get Tests ====================

    #[tokio::test]
    async fn test_batch_get_skips_missing_keys() {
        let store = seeded(&[("matt", "idaho"), ("nate", "italy")]).await;
        let found = store
            .batch_get(
                "visit",
                vec![key("matt", "idaho"), key("ghost", "nowhere"), key("nate", "italy")],
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_get_rejects_duplicate_keys() {
        let store = seeded(&[("matt", "idaho")]).await;
        let result = store
            .batch_get("visit", vec![key("matt", "idaho"), key("matt", "idaho")])
            .await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }
}
