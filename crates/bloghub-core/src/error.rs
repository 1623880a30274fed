//! Domain-level error types.

use thiserror::Error;
use validator::ValidationErrors;

/// Domain errors - business logic failures.
///
/// Every service operation fails with one of these kinds so callers can branch
/// on the kind rather than on messages.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Map a repository error, turning `RepoError::NotFound` into a
    /// `NotFound` for the given entity.
    pub fn from_repo(err: RepoError, entity_type: &'static str, key: impl ToString) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(entity_type, key),
            other => other.into(),
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        messages.sort();
        Self::Validation(messages.join(", "))
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violation: {0}")]
    Constraint(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::ForeignKey(msg) => {
                DomainError::Validation(format!("referenced entity does not exist ({msg})"))
            }
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "Entity",
                key: String::new(),
            },
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_map_to_domain_kinds() {
        assert!(matches!(
            DomainError::from(RepoError::Constraint("posts_slug_key".into())),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::ForeignKey("fk_post_categories_category".into())),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Query("boom".into())),
            DomainError::Internal(_)
        ));
    }

    #[test]
    fn test_from_repo_names_the_missing_entity() {
        let err = DomainError::from_repo(RepoError::NotFound, "Post", "abc");
        match err {
            DomainError::NotFound { entity_type, key } => {
                assert_eq!(entity_type, "Post");
                assert_eq!(key, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
