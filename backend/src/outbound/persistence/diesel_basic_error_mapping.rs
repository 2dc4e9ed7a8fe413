//! Diesel and pool error mapping shared by every repository.
//!
//! Each port has its own error enum with `connection`, `query`, and
//! `unique_violation` constructors; these helpers take those constructors so
//! the mapping lives in one place.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure into a port's connection error.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Constructors of one port's error enum.
pub(crate) struct PortErrorCtors<Q, C, U> {
    pub query: Q,
    pub connection: C,
    pub unique: U,
}

/// Map a Diesel failure into a port's query, connection, or unique-violation
/// error.
pub(crate) fn map_basic_diesel_error<E, Q, C, U>(
    error: diesel::result::Error,
    ctors: PortErrorCtors<Q, C, U>,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
    U: FnOnce(String) -> E,
{
    let PortErrorCtors {
        query,
        connection,
        unique,
    } = ctors;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            unique(info.constraint_name().unwrap_or("unique index").to_owned())
        }
        _ => query("database error"),
    }
}
