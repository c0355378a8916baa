use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The settings are validated first. The pool is created once by the caller
/// and shared for the lifetime of the process; cloning a `PgPool` only clones
/// a handle. Connection failures are returned as-is, there is no retry.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    settings
        .validate()
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .idle_timeout(settings.idle_timeout())
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(connect_options(settings))
        .await?;

    tracing::info!(
        server = %settings.server,
        database = %settings.name,
        max_connections = settings.max_connections,
        "Connected to the database."
    );
    Ok(pool)
}

/// Translates the settings into driver connection options.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.server)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode(settings.encrypt, settings.trust_server_certificate))
}

fn ssl_mode(encrypt: bool, trust_server_certificate: bool) -> PgSslMode {
    match (encrypt, trust_server_certificate) {
        (false, _) => PgSslMode::Disable,
        (true, true) => PgSslMode::Require,
        (true, false) => PgSslMode::VerifyFull,
    }
}
