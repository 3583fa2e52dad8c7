mod error;
mod schema;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{RepositoryError, Result};
pub use schema::{key_value, IndexSchema, TableSchema};
pub use traits::StoreClient;
pub use types::{item, AttributeValue, Item, PutCondition, QueryPage, QueryRequest};
