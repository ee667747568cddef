//! Error types for the PostgreSQL seeders.

use thiserror::Error;

/// Errors that can occur while seeding PostgreSQL.
#[derive(Error, Debug)]
pub enum SeedError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A random selection matched zero rows.
    #[error("No matching row found in '{table}'")]
    NotFound { table: String },

    /// Unsupported join kind, malformed predicate, unknown identifier or
    /// missing pool.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Idempotency guard: the entity was provisioned by an earlier run.
    #[error("Already provisioned: {0}")]
    AlreadyProvisioned(String),

    /// A row insert failed; carries the statement context.
    #[error("Failed to insert {what}: {source}")]
    Insert {
        what: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Generator configuration error.
    #[error("Generator error: {0}")]
    Generator(#[from] seed_generator::GeneratorError),

    /// Credential export I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeedError {
    pub fn not_found(table: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
        }
    }

    pub fn insert(what: impl Into<String>, source: tokio_postgres::Error) -> Self {
        Self::Insert {
            what: what.into(),
            source,
        }
    }

    /// Whether the error only aborts the current attempt or association.
    ///
    /// Everything else is fatal to the batch.
    pub fn is_attempt_scoped(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_scope() {
        assert!(SeedError::not_found("customers").is_attempt_scoped());
        assert!(!SeedError::Configuration("bad join".into()).is_attempt_scoped());
        assert!(!SeedError::AlreadyProvisioned("admin".into()).is_attempt_scoped());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SeedError::not_found("spare_parts").to_string(),
            "No matching row found in 'spare_parts'"
        );
    }
}
