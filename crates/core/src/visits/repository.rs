//! Visit repository: counters and paginated queries over the visit collection.

use std::sync::Arc;

use crate::storage::{
    AttributeValue, PutCondition, QueryRequest, RepositoryError, Result, StoreClient,
};

use super::conversions::{get_count, item_to_visit, visit_to_item};
use super::keys::{visit_key, AccessPath, VisitTables, DEFAULT_PAGE_LIMIT, VISIT_COUNT_ATTR};
use super::types::{DataPage, Visit, VisitKey};

/// Records and queries how often visitors visit locations.
#[derive(Clone)]
pub struct VisitRepository {
    store: Arc<dyn StoreClient>,
    tables: VisitTables,
    page_limit: usize,
}

impl VisitRepository {
    /// Creates a repository over the given store using the given collection names.
    pub fn new(store: Arc<dyn StoreClient>, tables: VisitTables) -> Self {
        Self {
            store,
            tables,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Sets the page size used when a query passes no limit.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    /// Number of times `visitor` has visited `location`; 0 if never recorded.
    pub async fn get_count(&self, visitor: &str, location: &str) -> Result<u64> {
        let key = visit_key(&VisitKey::new(visitor, location));
        let item = self
            .store
            .get(&self.tables.visit_table, &key, Some(&[VISIT_COUNT_ATTR][..]))
            .await?;

        match item {
            Some(item) => get_count(&item, VISIT_COUNT_ATTR),
            None => Ok(0),
        }
    }

    /// Full visit record, if it has been recorded at least once.
    pub async fn get_visit(&self, visitor: &str, location: &str) -> Result<Option<Visit>> {
        let key = visit_key(&VisitKey::new(visitor, location));
        let item = self.store.get(&self.tables.visit_table, &key, None).await?;

        item.as_ref().map(item_to_visit).transpose()
    }

    /// Records one more visit of `visitor` to `location`.
    ///
    /// The first visit is written with a put that only succeeds if the record
    /// is still absent; later visits use the store's atomic increment. If the
    /// conditional put loses to a concurrent first visit, the increment path
    /// is taken instead, so concurrent calls never overwrite each other.
    pub async fn record(&self, visitor: &str, location: &str) -> Result<()> {
        let key = VisitKey::new(visitor, location);

        if self.get_visit(visitor, location).await?.is_none() {
            let visit = Visit::new(visitor, location).with_count(1);
            match self
                .store
                .put(
                    &self.tables.visit_table,
                    visit_to_item(&visit)?,
                    PutCondition::IfAbsent,
                )
                .await
            {
                Ok(()) => {
                    tracing::debug!(%visitor, %location, "Recorded first visit");
                    return Ok(());
                }
                Err(RepositoryError::AlreadyExists { .. }) => {
                    tracing::debug!(
                        %visitor,
                        %location,
                        "Visit created concurrently, incrementing instead"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        self.increment(&key).await
    }

    async fn increment(&self, key: &VisitKey) -> Result<()> {
        let count = self
            .store
            .update(&self.tables.visit_table, &visit_key(key), VISIT_COUNT_ATTR, 1)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound { .. } => RepositoryError::InvariantViolation(format!(
                    "increment of visit {key} found no record"
                )),
                err => err,
            })?;

        tracing::debug!(visitor = %key.visitor, location = %key.location, count, "Recorded visit");
        Ok(())
    }

    /// Removes every recorded visit of `visitor` to `location`.
    pub async fn delete(&self, visitor: &str, location: &str) -> Result<()> {
        let key = visit_key(&VisitKey::new(visitor, location));
        self.store.delete(&self.tables.visit_table, &key).await
    }

    /// Next page of locations visited by `visitor`, ordered by location.
    ///
    /// `after` is the location of the last visit on the previous page.
    pub async fn get_locations_visited(
        &self,
        visitor: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<DataPage<Visit>> {
        self.scan(AccessPath::ByVisitor, visitor, after, limit)
            .await
    }

    /// Next page of visits to `location`, ordered by visitor.
    ///
    /// `after` is the visitor of the last visit on the previous page.
    pub async fn get_visitors(
        &self,
        location: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<DataPage<Visit>> {
        self.scan(AccessPath::ByLocation, location, after, limit)
            .await
    }

    async fn scan(
        &self,
        path: AccessPath,
        partition: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<DataPage<Visit>> {
        let limit = limit.unwrap_or(self.page_limit);
        if limit == 0 {
            return Err(RepositoryError::InvalidData(
                "Page limit must be at least 1".to_string(),
            ));
        }

        let request = QueryRequest {
            index: path.index_name(&self.tables),
            partition_attribute: path.partition_attribute().to_string(),
            partition_value: AttributeValue::S(partition.to_string()),
            exclusive_start_key: after.map(|cursor| visit_key(&path.cursor_key(partition, cursor))),
            limit,
        };

        let page = self.store.query(&self.tables.visit_table, request).await?;
        let has_more_pages = page.last_evaluated_key.is_some();
        let values = page
            .items
            .iter()
            .map(item_to_visit)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            ?path,
            %partition,
            after,
            limit,
            returned = values.len(),
            has_more_pages,
            "Fetched visit page"
        );

        Ok(DataPage::new(values, has_more_pages))
    }
}
