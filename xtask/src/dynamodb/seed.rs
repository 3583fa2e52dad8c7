//! Seed command implementation.

use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use visitlog_core::storage::{self, Item};
use visitlog_core::visits::{visitor_to_item, Visitor};

use super::error::{sdk_error, DynamodbError, Result};

/// DynamoDB accepts at most 25 writes per BatchWriteItem call.
const BATCH_WRITE_MAX_ITEMS: usize = 25;

const MAX_ATTEMPTS: u32 = 5;

/// Convert a store item to an SDK attribute map.
///
/// Mirrors `to_sdk_item` in the visitlog DynamoDB backend, which lives in a
/// binary crate xtask cannot depend on. Keep the two mappings in step.
fn to_sdk_item(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| {
            let value = match value {
                storage::AttributeValue::S(s) => AttributeValue::S(s.clone()),
                storage::AttributeValue::N(n) => AttributeValue::N(n.to_string()),
            };
            (name.clone(), value)
        })
        .collect()
}

/// Writes visitor profiles, replacing existing ones with the same name.
pub async fn seed_visitors(client: &Client, table_name: &str, visitors: &[Visitor]) -> Result<u32> {
    let mut inserted = 0;

    for chunk in visitors.chunks(BATCH_WRITE_MAX_ITEMS) {
        let mut pending = chunk
            .iter()
            .map(|visitor| {
                let put = PutRequest::builder()
                    .set_item(Some(to_sdk_item(&visitor_to_item(visitor))))
                    .build()
                    .map_err(sdk_error)?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        for attempt in 0..MAX_ATTEMPTS {
            if pending.is_empty() {
                break;
            }
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(100 << attempt)).await;
            }

            let response = client
                .batch_write_item()
                .request_items(table_name, std::mem::take(&mut pending))
                .send()
                .await
                .map_err(sdk_error)?;

            pending = response
                .unprocessed_items
                .and_then(|mut unprocessed| unprocessed.remove(table_name))
                .unwrap_or_default();
        }

        if !pending.is_empty() {
            return Err(DynamodbError::UnprocessedItems {
                count: pending.len(),
            });
        }
        inserted += chunk.len() as u32;
    }

    Ok(inserted)
}
