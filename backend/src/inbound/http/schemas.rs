//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The token is missing or unknown.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not allowed to touch this resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The resource, pair or page does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The favourite, cart entry or subscription already exists.
    #[schema(rename = "already_exists")]
    AlreadyExists,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "cooking_time must be between 1 and 32767")]
    message: String,
    /// Correlates the response with server logs; also sent as `trace-id`.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Validation errors carry `field`, `code` and a `fieldErrors` map.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("already_exists")]
    #[case("service_unavailable")]
    fn error_code_schema_lists_wire_names(#[case] variant: &str) {
        assert_eq!(ErrorCodeSchema::name(), "ErrorCode");
        assert!(schema_to_json::<ErrorCodeSchema>().contains(variant));
    }

    #[rstest]
    fn error_schema_uses_camel_case_trace_id() {
        let json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "Error");
        assert!(json.contains("traceId"));
        assert!(!json.contains("trace_id"));
    }
}
