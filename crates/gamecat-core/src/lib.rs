pub mod app_config;
pub mod config;
pub mod games;
pub mod slug;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_without_database};
pub use games::{GameDetails, GameLinks, NewGame, ReferenceKind, StoredGame, DEFAULT_RATING};
pub use slug::{slugify, storefront_slug};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
