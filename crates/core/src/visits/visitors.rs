//! Visitor repository: batched profile lookups.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::storage::{PutCondition, Result, StoreClient};

use super::conversions::{item_to_visitor, visitor_to_item};
use super::keys::{visitor_key, VisitTables};
use super::types::Visitor;

/// Looks up visitor profiles.
#[derive(Clone)]
pub struct VisitorRepository {
    store: Arc<dyn StoreClient>,
    tables: VisitTables,
}

impl VisitorRepository {
    pub fn new(store: Arc<dyn StoreClient>, tables: VisitTables) -> Self {
        Self { store, tables }
    }

    /// Fetches the profiles of the named visitors in one round trip.
    ///
    /// Duplicate names are requested once. Names without a profile are
    /// skipped, and the result follows the store's order rather than the
    /// input's, so callers must not zip results with `names`.
    pub async fn batch_get<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Visitor>> {
        let unique: BTreeSet<&str> = names.iter().map(AsRef::as_ref).collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let keys = unique.iter().map(|name| visitor_key(name)).collect();
        let items = self
            .store
            .batch_get(&self.tables.visitor_table, keys)
            .await?;

        tracing::debug!(
            requested = names.len(),
            unique = unique.len(),
            found = items.len(),
            "Batch fetched visitors"
        );

        items.iter().map(item_to_visitor).collect()
    }

    /// Writes a visitor profile, replacing any existing one.
    pub async fn put(&self, visitor: &Visitor) -> Result<()> {
        self.store
            .put(
                &self.tables.visitor_table,
                visitor_to_item(visitor),
                PutCondition::Always,
            )
            .await
    }
}
