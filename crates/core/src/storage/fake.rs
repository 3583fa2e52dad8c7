//! Request-recording store used by the repository tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    Item, PutCondition, QueryPage, QueryRequest, RepositoryError, Result,
    StoreClient,
};

/// A call received by [`FakeStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Get {
        collection: String,
        key: Item,
        projection: Option<Vec<String>>,
    },
    Put {
        collection: String,
        item: Item,
        condition: PutCondition,
    },
    Update {
        collection: String,
        key: Item,
        attribute: String,
        delta: i64,
    },
    Delete {
        collection: String,
        key: Item,
    },
    Query {
        collection: String,
        request: QueryRequest,
    },
    BatchGet {
        collection: String,
        keys: Vec<Item>,
    },
}

/// Flat item list with key matching by attribute subset, scripted query
/// pages and injectable conflicts.
#[derive(Default)]
pub(crate) struct FakeStore {
    calls: Mutex<Vec<Call>>,
    items: Mutex<Vec<(String, Item)>>,
    pages: Mutex<VecDeque<QueryPage>>,
    /// Item written by a competing caller right before the next
    /// `PutCondition::IfAbsent` put, making that put fail.
    racing_put: Mutex<Option<(String, Item)>>,
    /// Removes the item right before the next update, making it fail.
    racing_delete: Mutex<bool>,
}

fn matches(item: &Item, key: &Item) -> bool {
    key.iter().all(|(k, v)| item.get(k) == Some(v))
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_item(self, collection: &str, item: Item) -> Self {
        self.items
            .lock()
            .unwrap()
            .push((collection.to_string(), item));
        self
    }

    pub(crate) fn with_page(self, page: QueryPage) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub(crate) fn with_racing_put(self, collection: &str, item: Item) -> Self {
        *self.racing_put.lock().unwrap() = Some((collection.to_string(), item));
        self
    }

    pub(crate) fn with_racing_delete(self) -> Self {
        *self.racing_delete.lock().unwrap() = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn find(&self, collection: &str, key: &Item) -> Option<Item> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|(c, i)| c == collection && matches(i, key))
            .map(|(_, i)| i.clone())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoreClient for FakeStore {
    async fn get(
        &self,
        collection: &str,
        key: &Item,
        projection: Option<&[&str]>,
    ) -> Result<Option<Item>> {
        self.record(Call::Get {
            collection: collection.to_string(),
            key: key.clone(),
            projection: projection.map(|p| p.iter().map(|s| s.to_string()).collect()),
        });

        Ok(self.find(collection, key).map(|item| match projection {
            Some(names) => item
                .into_iter()
                .filter(|(k, _)| names.contains(&k.as_str()))
                .collect(),
            None => item,
        }))
    }

    async fn put(&self, collection: &str, item: Item, condition: PutCondition) -> Result<()> {
        self.record(Call::Put {
            collection: collection.to_string(),
            item: item.clone(),
            condition,
        });

        if condition == PutCondition::IfAbsent {
            if let Some(racing) = self.racing_put.lock().unwrap().take() {
                self.items.lock().unwrap().push(racing);
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "Item",
                    id: format!("{item:?}"),
                });
            }
        }

        self.items
            .lock()
            .unwrap()
            .push((collection.to_string(), item));
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &Item,
        attribute: &str,
        delta: i64,
    ) -> Result<i64> {
        self.record(Call::Update {
            collection: collection.to_string(),
            key: key.clone(),
            attribute: attribute.to_string(),
            delta,
        });

        let mut items = self.items.lock().unwrap();
        if std::mem::take(&mut *self.racing_delete.lock().unwrap()) {
            items.retain(|(c, i)| !(c == collection && matches(i, key)));
        }

        let (_, item) = items
            .iter_mut()
            .find(|(c, i)| c == collection && matches(i, key))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Item",
                id: format!("{key:?}"),
            })?;

        let current = item.get(attribute).and_then(|v| v.as_n()).unwrap_or(0);
        let next = current + delta;
        item.insert(attribute.to_string(), super::AttributeValue::N(next));
        Ok(next)
    }

    async fn delete(&self, collection: &str, key: &Item) -> Result<()> {
        self.record(Call::Delete {
            collection: collection.to_string(),
            key: key.clone(),
        });

        self.items
            .lock()
            .unwrap()
            .retain(|(c, i)| !(c == collection && matches(i, key)));
        Ok(())
    }

    async fn query(&self, collection: &str, request: QueryRequest) -> Result<QueryPage> {
        self.record(Call::Query {
            collection: collection.to_string(),
            request,
        });

        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn batch_get(&self, collection: &str, keys: Vec<Item>) -> Result<Vec<Item>> {
        self.record(Call::BatchGet {
            collection: collection.to_string(),
            keys: keys.clone(),
        });

        Ok(keys
            .iter()
            .filter_map(|key| self.find(collection, key))
            .collect())
    }
}
