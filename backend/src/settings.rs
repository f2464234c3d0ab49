//! Process settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `FOODGRAM_*` environment variables and
//! an optional config file. Unset values fall back to the constants below.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::DEFAULT_RECIPES_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised when settings cannot be turned into a runnable server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("FOODGRAM_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Configuration for the HTTP server and its database.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// Socket address the server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Page size used by list endpoints when the request sets no `limit`.
    pub page_size: Option<u32>,
    /// Nested recipes shown per followed author when `recipes_limit` is absent.
    pub recipes_limit: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to on.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        positive("pool_max_size", self.pool_max_size, DEFAULT_POOL_MAX_SIZE)
    }

    pub fn page_size(&self) -> Result<u32, SettingsError> {
        positive("page_size", self.page_size, pagination::DEFAULT_PAGE_SIZE)
    }

    pub fn recipes_limit(&self) -> Result<u32, SettingsError> {
        positive("recipes_limit", self.recipes_limit, DEFAULT_RECIPES_LIMIT)
    }

    /// Whether embedded migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

fn positive(field: &'static str, value: Option<u32>, fallback: u32) -> Result<u32, SettingsError> {
    match value.unwrap_or(fallback) {
        0 => Err(SettingsError::NotPositive { field }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "FOODGRAM_BIND_ADDR",
        "FOODGRAM_DATABASE_URL",
        "FOODGRAM_POOL_MAX_SIZE",
        "FOODGRAM_PAGE_SIZE",
        "FOODGRAM_RECIPES_LIMIT",
        "FOODGRAM_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("foodgram")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_with_an_empty_environment() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(settings.pool_max_size(), Ok(10));
        assert_eq!(settings.page_size(), Ok(6));
        assert_eq!(settings.recipes_limit(), Ok(6));
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FOODGRAM_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FOODGRAM_DATABASE_URL",
                Some("postgres://cook@localhost/foodgram".to_owned()),
            ),
            ("FOODGRAM_POOL_MAX_SIZE", Some("4".to_owned())),
            ("FOODGRAM_PAGE_SIZE", Some("12".to_owned())),
            ("FOODGRAM_RECIPES_LIMIT", Some("3".to_owned())),
            ("FOODGRAM_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9000)))
        );
        assert_eq!(
            settings.database_url(),
            Ok("postgres://cook@localhost/foodgram")
        );
        assert_eq!(settings.pool_max_size(), Ok(4));
        assert_eq!(settings.page_size(), Ok(12));
        assert_eq!(settings.recipes_limit(), Ok(3));
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case("FOODGRAM_PAGE_SIZE", "page_size")]
    #[case("FOODGRAM_RECIPES_LIMIT", "recipes_limit")]
    fn zero_limits_are_rejected(#[case] var: &str, #[case] field: &'static str) {
        let mut vars = VARS.map(|name| (name, None::<String>));
        for (name, value) in &mut vars {
            if *name == var {
                *value = Some("0".to_owned());
            }
        }
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        let error = SettingsError::NotPositive { field };
        let actual = match field {
            "page_size" => settings.page_size(),
            _ => settings.recipes_limit(),
        };
        assert_eq!(actual, Err(error));
    }

    #[rstest]
    fn malformed_bind_address_names_the_value() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            database_url: None,
            pool_max_size: None,
            page_size: None,
            recipes_limit: None,
            run_migrations: None,
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { value, .. }) if value == "localhost"
        ));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(true), true)]
    #[case(Some(false), false)]
    fn migrations_run_unless_switched_off(#[case] value: Option<bool>, #[case] expected: bool) {
        let settings = AppSettings {
            bind_addr: None,
            database_url: None,
            pool_max_size: None,
            page_size: None,
            recipes_limit: None,
            run_migrations: value,
        };
        assert_eq!(settings.run_migrations(), expected);
    }
}
