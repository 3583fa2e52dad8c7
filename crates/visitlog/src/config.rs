use std::env;

use visitlog_core::visits::{
    VisitTables, DEFAULT_PAGE_LIMIT, DEFAULT_VISITOR_TABLE, DEFAULT_VISIT_INDEX,
    DEFAULT_VISIT_TABLE,
};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Table and index names.
    pub tables: VisitTables,
    /// Default page size for visit queries (default: 2)
    pub page_limit: usize,
    /// DynamoDB client settings.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub aws: AwsSettings,
}

/// Where the DynamoDB client connects to.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl AwsSettings {
    /// Returns a display string for the target environment.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `VISIT_TABLE_NAME` - Visit table (default: "visit")
    /// - `VISIT_INDEX_NAME` - Location index (default: "visit_location-visitor-index")
    /// - `VISITOR_TABLE_NAME` - Visitor table (default: "visitor")
    /// - `PAGE_LIMIT` - Default page size, must be positive (default: 2)
    /// - `AWS_ENDPOINT_URL` - DynamoDB endpoint override (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self {
            tables: VisitTables {
                visit_table: env::var("VISIT_TABLE_NAME")
                    .unwrap_or_else(|_| DEFAULT_VISIT_TABLE.to_string()),
                visit_index: env::var("VISIT_INDEX_NAME")
                    .unwrap_or_else(|_| DEFAULT_VISIT_INDEX.to_string()),
                visitor_table: env::var("VISITOR_TABLE_NAME")
                    .unwrap_or_else(|_| DEFAULT_VISITOR_TABLE.to_string()),
            },
            page_limit: env::var("PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
            aws: AwsSettings {
                endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let local = AwsSettings {
            endpoint_url: Some("http://localhost:8000".to_string()),
            region: "us-east-1".to_string(),
        };
        let remote = AwsSettings {
            endpoint_url: None,
            region: "us-west-2".to_string(),
        };

        assert_eq!(
            local.target_display(),
            "Local DynamoDB (http://localhost:8000)"
        );
        assert_eq!(remote.target_display(), "AWS DynamoDB (region: us-west-2)");
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("VISIT_TABLE_NAME");
        env::remove_var("VISIT_INDEX_NAME");
        env::remove_var("VISITOR_TABLE_NAME");
        env::remove_var("PAGE_LIMIT");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AWS_REGION");

        let config = Config::from_env();

        assert_eq!(config.tables, VisitTables::default());
        assert_eq!(config.tables.visit_table, "visit");
        assert_eq!(config.tables.visit_index, "visit_location-visitor-index");
        assert_eq!(config.tables.visitor_table, "visitor");
        assert_eq!(config.page_limit, 2);
        assert_eq!(config.aws.endpoint_url, None);
        assert_eq!(config.aws.region, "us-east-1");
    }
}
