//! Translation of SeaORM errors into repository errors.

use sea_orm::{DbErr, SqlErr};

use bloghub_core::error::RepoError;

/// Every database failure in the Postgres repositories goes through here.
///
/// Unique and foreign-key violations keep their constraint message so the
/// service layer can report `Conflict` and `Validation` respectively.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::ForeignKey(msg),
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            tracing::error!(error = %err, "Database connection error");
            RepoError::Connection(err.to_string())
        }
        other => RepoError::Query(other.to_string()),
    }
}
