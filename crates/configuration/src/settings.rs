use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the HTTP service listens and what it serves besides the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// The IP address to bind to.
    pub host: String,
    /// The listening port. `PORT` in the environment.
    pub port: u16,
    /// Directory holding `index.html` and the client script.
    pub static_dir: String,
}

/// Connection parameters for the PostgreSQL pool.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: String,
    /// The database host. `DB_SERVER` in the environment.
    pub server: String,
    pub port: u16,
    /// The database name. `DB_NAME` in the environment.
    pub name: String,
    /// Negotiate TLS with the server.
    pub encrypt: bool,
    /// Accept the server certificate without verifying it.
    pub trust_server_certificate: bool,
    pub max_connections: u32,
    /// Idle connections are closed after this many seconds.
    pub idle_timeout_secs: u64,
    /// How long a request waits for a free connection.
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs go to a daily rolling file in this directory instead of stdout.
    pub directory: Option<String>,
}

impl Settings {
    /// Checks what every command needs. Database settings are checked by
    /// `DatabaseSettings::validate` when a pool is actually built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                ConfigError::ValidationError(format!(
                    "server.host must be an IP address, got '{}'",
                    self.host
                ))
            })
    }
}

impl DatabaseSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("database.user (DB_USER)", &self.user),
            ("database.server (DB_SERVER)", &self.server),
            ("database.name (DB_NAME)", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must be set")));
            }
        }
        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

// --- Default Implementations ---

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            server: String::new(),
            port: 5432,
            name: String::new(),
            encrypt: true,
            trust_server_certificate: false,
            max_connections: 10,
            idle_timeout_secs: 30,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("user", &self.user)
            .field("password", &"***")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("encrypt", &self.encrypt)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}
