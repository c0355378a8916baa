use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::ServerSettings;
use database::KillerStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
// Note: Tracing is initialized by the binary, not here.

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn KillerStore>,
}

impl AppState {
    pub fn new(repo: Arc<dyn KillerStore>) -> Arc<Self> {
        Arc::new(Self { repo })
    }
}

/// Builds the application router: the `/killers` API, a health probe, and the
/// static client served from `static_dir` for every other GET path.
pub fn build_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/killers",
            get(handlers::list_killers).post(handlers::create_killer),
        )
        .route(
            "/killers/:id",
            get(handlers::get_killer)
                .put(handlers::update_killer)
                .delete(handlers::delete_killer),
        )
        // `/` resolves to `index.html` inside the static directory.
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Binds `settings.host:settings.port` and serves until the process stops.
///
/// The repository is constructed by the caller and injected here, so the same
/// server runs against PostgreSQL or an in-memory store.
pub async fn run_server(settings: &ServerSettings, repo: Arc<dyn KillerStore>) -> anyhow::Result<()> {
    let addr: SocketAddr = settings.socket_addr()?;
    let app = build_router(AppState::new(repo), &settings.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API corriendo en http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
