use crate::error::ConfigError;
use crate::settings::Settings;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LoggingSettings, ServerSettings};

/// The settings file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "killers.toml";

/// Prefix for nested environment overrides, e.g. `KILLERS__DATABASE__MAX_CONNECTIONS`.
pub const ENV_PREFIX: &str = "KILLERS";

/// The flat environment variables the service has always been deployed with.
/// They take precedence over the file and the nested `KILLERS__*` variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_server: Option<String>,
    pub db_name: Option<String>,
    pub db_port: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            db_user: var("DB_USER"),
            db_password: var("DB_PASSWORD"),
            db_server: var("DB_SERVER"),
            db_name: var("DB_NAME"),
            db_port: var("DB_PORT"),
            port: var("PORT"),
        }
    }
}

/// Loads the application settings.
///
/// Sources, lowest priority first: built-in defaults, the TOML file
/// (`killers.toml` unless `path` is given), `KILLERS__*` variables, then the
/// flat `DB_*`/`PORT` variables. A `.env` file is read into the environment
/// first. The listening address is validated before the result is returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "Loaded .env file.");
    }

    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder().add_source(file).add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    build_settings(builder, EnvOverrides::from_env())
}

/// Applies the flat environment overrides on top of `builder`, then
/// deserializes and validates the result.
pub fn build_settings(
    builder: ConfigBuilder<DefaultState>,
    env: EnvOverrides,
) -> Result<Settings, ConfigError> {
    let settings = builder
        .set_override_option("database.user", env.db_user)?
        .set_override_option("database.password", env.db_password)?
        .set_override_option("database.server", env.db_server)?
        .set_override_option("database.name", env.db_name)?
        .set_override_option("database.port", env.db_port)?
        .set_override_option("server.port", env.port)?
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    Ok(settings)
}
