use thiserror::Error;

/// Errors that can occur during repository and store operations.
///
/// Reads never report a missing record as an error; absence is modelled with
/// `Option`, zero counts or empty pages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Visit",
            id: "matt/utah".to_string(),
        };
        assert_eq!(error.to_string(), "Visit not found: matt/utah");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Visit",
            id: "matt/italy".to_string(),
        };
        assert_eq!(error.to_string(), "Visit already exists: matt/italy");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("Table not found".to_string());
        assert_eq!(error.to_string(), "Query failed: Table not found");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("Missing or invalid field: visitor".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: Missing or invalid field: visitor"
        );
    }

    #[test]
    fn test_repository_error_invariant_violation_display() {
        let error = RepositoryError::InvariantViolation("update hit absent record".to_string());
        assert_eq!(
            error.to_string(),
            "Invariant violated: update hit absent record"
        );
    }
}
