use thiserror::Error;

/// Errors surfaced by the student repository.
///
/// `Validation`, `NotFound` and `Conflict` are expected outcomes callers
/// are meant to handle. `Store` carries the database error untouched.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Store(#[from] sea_orm::DbErr),
}

impl DomainError {
    pub fn student_not_found(id: &str) -> Self {
        DomainError::NotFound {
            entity: "Student",
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
