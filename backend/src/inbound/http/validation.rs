//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings are parsed by hand with `form_urlencoded` because list
//! filters repeat keys (`?tags=lunch&tags=dinner`), which `web::Query`
//! cannot collect.

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidFlag,
    InvalidId,
    InvalidLimit,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidFlag => "invalid_flag",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidLimit => "invalid_limit",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::field(self.field, code.as_str(), self.message)
    }
}

/// Decoded `key=value` pairs of a raw query string, in order.
pub(crate) fn query_pairs(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Last value given for `field`, if any.
pub(crate) fn last_value<'a>(pairs: &'a [(String, String)], field: FieldName) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == field.as_str())
        .map(|(_, value)| value.as_str())
}

/// Every value given for `field`, in request order.
pub(crate) fn all_values(pairs: &[(String, String)], field: FieldName) -> Vec<String> {
    pairs
        .iter()
        .filter(|(key, _)| key == field.as_str())
        .map(|(_, value)| value.clone())
        .collect()
}

/// Accept `1`/`0` and `true`/`false`.
pub(crate) fn parse_flag(value: &str, field: FieldName) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ValidationError::new(
            field,
            format!("{} must be 1 or 0", field.as_str()),
        )
        .with_code(ErrorCode::InvalidFlag)),
    }
}

pub(crate) fn parse_id(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ValidationError::new(field, format!("{} must be a positive integer", field.as_str()))
                .with_code(ErrorCode::InvalidId)
        })
}

/// Positive `u32` cap, for example `recipes_limit`.
pub(crate) fn parse_limit(value: &str, field: FieldName) -> Result<u32, Error> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or_else(|| {
            ValidationError::new(field, format!("{} must be a positive integer", field.as_str()))
                .with_code(ErrorCode::InvalidLimit)
        })
}
