use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_CATALOG_URL: &str = "https://catalog.gog.com/v1/catalog";
pub const DEFAULT_STOREFRONT_URL: &str = "https://www.gog.com/game";
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:1337/api/upload/";
pub const DEFAULT_UPLOAD_REF: &str = "api::game.game";
pub const DEFAULT_USER_AGENT: &str = "gamecat/0.1 (catalog-populate)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load application configuration for commands that never open a database
/// connection, such as a dry-run populate.
///
/// Calls `dotenvy::dotenv().ok()` like [`load_app_config`], but `DATABASE_URL`
/// is optional: `database_url` is empty when it is unset.
///
/// # Errors
///
/// Returns `ConfigError` if any other value is invalid.
pub fn load_app_config_without_database() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key), DatabaseUrl::Optional)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatabaseUrl {
    Required,
    Optional,
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    build_config(lookup, DatabaseUrl::Required)
}

fn build_config<F>(lookup: F, database: DatabaseUrl) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = match database {
        DatabaseUrl::Required => require("DATABASE_URL")?,
        DatabaseUrl::Optional => lookup("DATABASE_URL").unwrap_or_default(),
    };
    let env = parse_environment(&or_default("GAMECAT_ENV", "development"))?;
    let log_level = or_default("GAMECAT_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("GAMECAT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("GAMECAT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("GAMECAT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let catalog_url = or_default("GAMECAT_CATALOG_URL", DEFAULT_CATALOG_URL);
    let storefront_url = or_default("GAMECAT_STOREFRONT_URL", DEFAULT_STOREFRONT_URL);
    let upload_url = or_default("GAMECAT_UPLOAD_URL", DEFAULT_UPLOAD_URL);
    let upload_ref = or_default("GAMECAT_UPLOAD_REF", DEFAULT_UPLOAD_REF);
    let upload_token = lookup("GAMECAT_UPLOAD_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());

    let request_timeout_secs = parse_u64("GAMECAT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GAMECAT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_concurrency = parse_usize("GAMECAT_MAX_CONCURRENCY", "8")?;
    if max_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GAMECAT_MAX_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_retries = parse_u32("GAMECAT_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("GAMECAT_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        catalog_url,
        storefront_url,
        upload_url,
        upload_ref,
        upload_token,
        request_timeout_secs,
        user_agent,
        max_concurrency,
        max_retries,
        retry_backoff_base_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GAMECAT_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
