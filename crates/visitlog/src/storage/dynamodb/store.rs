//! DynamoDB store implementation.
//!
//! Implements `StoreClient` from `visitlog_core::storage` on top of the
//! `aws-sdk-dynamodb` client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue as SdkValue, KeysAndAttributes, ReturnValue};
use aws_sdk_dynamodb::Client;

use visitlog_core::storage::{
    Item, PutCondition, QueryPage, QueryRequest, RepositoryError, Result,
    StoreClient, TableSchema,
};

use super::conversions::{from_sdk_item, get_number, to_sdk_item, to_sdk_value, SdkItem};
use super::error::{
    map_batch_get_item_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_query_error, map_update_item_error,
};
use super::expressions::{
    self, BATCH_GET_MAX_KEYS, COUNTER_NAME, IF_ABSENT, IF_EXISTS, INCREMENT, KEY_NAME,
    PARTITION_CONDITION, PARTITION_NAME, PARTITION_VALUE,
};
use crate::config::AwsSettings;

/// Unprocessed batch keys are re-requested at most this many times.
const MAX_BATCH_ATTEMPTS: u32 = 8;

/// DynamoDB-backed store.
///
/// Table schemas are needed to name the partition key in write conditions.
pub struct DynamoDbStore {
    client: Client,
    schemas: HashMap<String, TableSchema>,
}

impl DynamoDbStore {
    /// Creates a store from an existing client and the tables it may touch.
    pub fn new(client: Client, schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        Self {
            client,
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.table_name.clone(), schema))
                .collect(),
        }
    }

    /// Creates a store using the AWS SDK default credential chain.
    ///
    /// `AwsSettings::endpoint_url` points the client at a local DynamoDB.
    pub async fn connect(
        settings: &AwsSettings,
        schemas: impl IntoIterator<Item = TableSchema>,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()));

        if let Some(endpoint) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::info!(target = %settings.target_display(), "Connected DynamoDB client");

        Self::new(Client::new(&sdk_config), schemas)
    }

    fn schema(&self, collection: &str) -> Result<&TableSchema> {
        self.schemas.get(collection).ok_or_else(|| {
            RepositoryError::QueryFailed(format!("Table not configured: {}", collection))
        })
    }

    fn partition_key(&self, collection: &str) -> Result<&str> {
        self.schema(collection)
            .map(|schema| schema.partition_key.as_str())
    }
}

#[async_trait]
impl StoreClient for DynamoDbStore {
    async fn get(
        &self,
        collection: &str,
        key: &Item,
        projection: Option<&[&str]>,
    ) -> Result<Option<Item>> {
        let mut request = self
            .client
            .get_item()
            .table_name(collection)
            .set_key(Some(to_sdk_item(key)));

        if let Some(attributes) = projection {
            let (expression, names) = expressions::projection(attributes);
            request = request.projection_expression(expression);
            for (placeholder, name) in names {
                request = request.expression_attribute_names(placeholder, name);
            }
        }

        let result = request.send().await.map_err(map_get_item_error)?;

        result.item.as_ref().map(from_sdk_item).transpose()
    }

    async fn put(&self, collection: &str, item: Item, condition: PutCondition) -> Result<()> {
        let id = self.schema(collection)?.describe_key(&item);
        let mut request = self
            .client
            .put_item()
            .table_name(collection)
            .set_item(Some(to_sdk_item(&item)));

        if condition == PutCondition::IfAbsent {
            request = request
                .condition_expression(IF_ABSENT)
                .expression_attribute_names(KEY_NAME, self.partition_key(collection)?);
        }

        request
            .send()
            .await
            .map_err(|e| map_put_item_error(e, id))?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &Item,
        attribute: &str,
        delta: i64,
    ) -> Result<i64> {
        let id = self.schema(collection)?.describe_key(key);
        let result = self
            .client
            .update_item()
            .table_name(collection)
            .set_key(Some(to_sdk_item(key)))
            .update_expression(INCREMENT)
            .condition_expression(IF_EXISTS)
            .expression_attribute_names(KEY_NAME, self.partition_key(collection)?)
            .expression_attribute_names(COUNTER_NAME, attribute)
            .expression_attribute_values(":zero", SdkValue::N("0".to_string()))
            .expression_attribute_values(":delta", SdkValue::N(delta.to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, id))?;

        let attributes = result.attributes.unwrap_or_default();
        get_number(&attributes, attribute)
    }

    async fn delete(&self, collection: &str, key: &Item) -> Result<()> {
        self.client
            .delete_item()
            .table_name(collection)
            .set_key(Some(to_sdk_item(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn query(&self, collection: &str, request: QueryRequest) -> Result<QueryPage> {
        let result = self
            .client
            .query()
            .table_name(collection)
            .set_index_name(request.index)
            .key_condition_expression(PARTITION_CONDITION)
            .expression_attribute_names(PARTITION_NAME, request.partition_attribute)
            .expression_attribute_values(PARTITION_VALUE, to_sdk_value(&request.partition_value))
            .set_exclusive_start_key(request.exclusive_start_key.as_ref().map(to_sdk_item))
            .limit(expressions::query_limit(request.limit)?)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(from_sdk_item)
            .collect::<Result<Vec<_>>>()?;
        let last_evaluated_key = result
            .last_evaluated_key
            .as_ref()
            .map(from_sdk_item)
            .transpose()?;

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_get(&self, collection: &str, keys: Vec<Item>) -> Result<Vec<Item>> {
        let mut found = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(BATCH_GET_MAX_KEYS) {
            let mut pending: Vec<SdkItem> = chunk.iter().map(to_sdk_item).collect();
            let mut attempt = 0;

            while !pending.is_empty() {
                if attempt > 0 {
                    if attempt >= MAX_BATCH_ATTEMPTS {
                        return Err(RepositoryError::QueryFailed(format!(
                            "{} keys still unprocessed after {} attempts",
                            pending.len(),
                            attempt
                        )));
                    }
                    tracing::debug!(
                        collection,
                        unprocessed = pending.len(),
                        attempt,
                        "Retrying unprocessed batch keys"
                    );
                    let delay = expressions::batch_retry_delay_ms(attempt - 1);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                attempt += 1;

                let keys_and_attributes = KeysAndAttributes::builder()
                    .set_keys(Some(std::mem::take(&mut pending)))
                    .build()
                    .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

                let mut result = self
                    .client
                    .batch_get_item()
                    .request_items(collection, keys_and_attributes)
                    .send()
                    .await
                    .map_err(map_batch_get_item_error)?;

                if let Some(items) = result
                    .responses
                    .as_mut()
                    .and_then(|responses| responses.remove(collection))
                {
                    for item in &items {
                        found.push(from_sdk_item(item)?);
                    }
                }

                if let Some(unprocessed) = result
                    .unprocessed_keys
                    .as_mut()
                    .and_then(|unprocessed| unprocessed.remove(collection))
                {
                    pending = unprocessed.keys;
                }
            }
        }

        Ok(found)
    }
}
