//! Table configuration types (Functional Core - pure data).

use visitlog_core::storage::TableSchema;

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    /// A string-typed key attribute; every visitlog key is a string.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::String,
        }
    }
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

impl AttributeType {
    /// DynamoDB's one-letter type code.
    pub fn code(self) -> &'static str {
        match self {
            AttributeType::String => "S",
        }
    }
}

/// Global Secondary Index configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: ProjectionType,
}

/// GSI projection type. Pages read through the location index need every
/// attribute, so only `All` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionType {
    All,
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl BillingMode {
    /// Name as DynamoDB spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            BillingMode::PayPerRequest => "PAY_PER_REQUEST",
        }
    }
}

impl TableConfig {
    /// Every attribute named by the table key or an index key, deduplicated,
    /// in first-use order.
    pub fn key_attributes(&self) -> Vec<&KeyAttribute> {
        let mut attributes: Vec<&KeyAttribute> = Vec::new();
        let candidates = std::iter::once(&self.partition_key)
            .chain(&self.sort_key)
            .chain(
                self.gsis
                    .iter()
                    .flat_map(|gsi| std::iter::once(&gsi.partition_key).chain(&gsi.sort_key)),
            );
        for attribute in candidates {
            if !attributes.iter().any(|a| a.name == attribute.name) {
                attributes.push(attribute);
            }
        }
        attributes
    }
}

/// Derives the DynamoDB table configuration from a store schema.
/// This is a pure function - no I/O.
pub fn table_config(schema: &TableSchema) -> TableConfig {
    TableConfig {
        table_name: schema.table_name.clone(),
        partition_key: KeyAttribute::string(&schema.partition_key),
        sort_key: schema.sort_key.as_ref().map(KeyAttribute::string),
        gsis: schema
            .indexes
            .iter()
            .map(|index| GsiConfig {
                name: index.name.clone(),
                partition_key: KeyAttribute::string(&index.partition_key),
                sort_key: index.sort_key.as_ref().map(KeyAttribute::string),
                projection: ProjectionType::All,
            })
            .collect(),
        billing_mode: BillingMode::PayPerRequest,
    }
}
