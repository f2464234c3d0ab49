//! Translation of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; query failures become
//! `internal`. Variants that carry domain meaning map to the matching code.

use super::Error;
use super::ports::{
    AuthTokenRepositoryError, CatalogueRepositoryError, PasswordHasherError,
    RecipeRepositoryError, RelationshipRepositoryError, UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateField { ref field } => {
            Error::field(field, "unique", error.to_string())
        }
    }
}

pub(crate) fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    match error {
        PasswordHasherError::Hash { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
    }
}

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

pub(crate) fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::NotFound { id } => Error::not_found(format!("recipe {id} not found")),
    }
}

pub(crate) fn map_relationship_error(error: RelationshipRepositoryError) -> Error {
    match error {
        RelationshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("relationship repository unavailable: {message}"))
        }
        RelationshipRepositoryError::Query { message } => {
            Error::internal(format!("relationship repository error: {message}"))
        }
        RelationshipRepositoryError::AlreadyExists => Error::already_exists(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(map_user_error(UserPersistenceError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(map_user_error(UserPersistenceError::query("bad")), ErrorCode::InternalError)]
    #[case(map_user_error(UserPersistenceError::duplicate_field("username")), ErrorCode::InvalidRequest)]
    #[case(map_token_error(AuthTokenRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(map_hasher_error(PasswordHasherError::hash("salt")), ErrorCode::InternalError)]
    #[case(map_catalogue_error(CatalogueRepositoryError::query("bad")), ErrorCode::InternalError)]
    #[case(map_recipe_error(RecipeRepositoryError::not_found(3_i64)), ErrorCode::NotFound)]
    #[case(map_relationship_error(RelationshipRepositoryError::already_exists()), ErrorCode::AlreadyExists)]
    fn repository_failures_map_to_codes(#[case] err: Error, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn duplicate_field_is_keyed_by_column() {
        let err = map_user_error(UserPersistenceError::duplicate_field("email"));
        let details = err.details().expect("details");
        assert_eq!(details["field"], "email");
        assert_eq!(details["code"], "unique");
    }
}
