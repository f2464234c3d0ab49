//! Shared translation of pool and Diesel failures into port errors.
//!
//! Each repository supplies constructors for its own error enum; the
//! helpers here decide which one applies and log the underlying cause.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's `Connection` constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel failure onto `Query` or `Connection` constructors.
///
/// Closed connections are transient and reported as connection failures;
/// everything else is a query failure with a generic message.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    log_diesel_error(&error);
    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// The constraint name of a unique violation, if `error` is one.
///
/// Returns `Some("")` when PostgreSQL did not report a constraint name.
pub(crate) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Query(&'static str),
        Connection(String),
    }

    struct Info(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[rstest]
    #[case(DieselError::NotFound, Probe::Query("record not found"))]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        Probe::Connection("database connection error".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, None),
        Probe::Query("database error")
    )]
    fn diesel_errors_are_classified(#[case] error: DieselError, #[case] expected: Probe) {
        let mapped = map_diesel_error(error, Probe::Query, |msg| {
            Probe::Connection(msg.to_owned())
        });
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn pool_errors_become_connection_failures() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Probe::Connection);
        assert_eq!(mapped, Probe::Connection("timed out".to_owned()));
    }

    #[rstest]
    #[case(Some("users_email_key"), Some("users_email_key"))]
    #[case(None, Some(""))]
    fn unique_violation_exposes_constraint(
        #[case] constraint: Option<&'static str>,
        #[case] expected: Option<&str>,
    ) {
        let error = database_error(DatabaseErrorKind::UniqueViolation, constraint);
        assert_eq!(unique_violation(&error), expected);
    }

    #[rstest]
    fn other_errors_are_not_unique_violations() {
        assert_eq!(unique_violation(&DieselError::NotFound), None);
    }
}
