use async_trait::async_trait;

use super::types::{Item, PutCondition, QueryPage, QueryRequest};
use super::Result;

/// Client for a partitioned key-value store.
///
/// Collections are addressed by name. Keys are items holding exactly the
/// primary key attributes of the collection. Implementations must be safe to
/// share across concurrent calls.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Point lookup by primary key. With a projection only the named
    /// attributes are returned (missing ones are simply absent).
    async fn get(
        &self,
        collection: &str,
        key: &Item,
        projection: Option<&[&str]>,
    ) -> Result<Option<Item>>;

    /// Writes a whole item.
    ///
    /// With [`PutCondition::IfAbsent`] the write fails with
    /// `RepositoryError::AlreadyExists` when an item with the same key exists.
    async fn put(&self, collection: &str, item: Item, condition: PutCondition) -> Result<()>;

    /// Atomically adds `delta` to a numeric attribute of an existing item and
    /// returns the new value.
    ///
    /// Fails with `RepositoryError::NotFound` if the item does not exist.
    async fn update(&self, collection: &str, key: &Item, attribute: &str, delta: i64)
        -> Result<i64>;

    /// Deletes an item by primary key. Deleting a missing item is a no-op.
    async fn delete(&self, collection: &str, key: &Item) -> Result<()>;

    /// Range query over one partition, ascending by sort key.
    async fn query(&self, collection: &str, request: QueryRequest) -> Result<QueryPage>;

    /// Fetches several items in one round trip. Missing keys are silently
    /// omitted and the result order is unspecified.
    async fn batch_get(&self, collection: &str, keys: Vec<Item>) -> Result<Vec<Item>>;
}
