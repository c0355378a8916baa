use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{load_settings, settings::Settings, LoggingSettings};
use core_types::Killer;
use database::{DbRepository, InMemoryRepository, KillerStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the killer catalog.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    // Held until exit so buffered file logs are flushed.
    let _guard = init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::List => handle_list(settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A CRUD service for a catalog of killers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file (defaults to `killers.toml` if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API and the static client.
    Serve(ServeArgs),
    /// Print every killer in the database as a table.
    List,
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.port` / `PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// Keep the catalog in memory instead of connecting to the database.
    #[arg(long)]
    in_memory: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    if args.in_memory {
        tracing::warn!("Running with an in-memory catalog; data is lost on exit.");
        let repo: Arc<dyn KillerStore> = Arc::new(InMemoryRepository::new());
        return web_server::run_server(&settings.server, repo).await;
    }

    let db_pool = database::connect(&settings.database).await?;
    let db_repo = DbRepository::new(db_pool);

    let result = web_server::run_server(&settings.server, Arc::new(db_repo.clone())).await;
    db_repo.close().await;
    result
}

async fn handle_list(settings: Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    let db_repo = DbRepository::new(db_pool);

    let killers = db_repo.list_all().await?;
    db_repo.close().await;

    println!("{}", render_table(&killers));
    Ok(())
}

/// Renders killers the way the web client shows them.
fn render_table(killers: &[Killer]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Nombre", "Alias", "Poder", "Velocidad", "Radio de terror", "Altura", "Dificultad",
        "Lanzamiento", "DLC",
    ]);
    for killer in killers {
        table.add_row(vec![
            killer.id.to_string(),
            killer.name.clone(),
            killer.alias.clone(),
            killer.power.clone(),
            killer.speed.to_string(),
            killer.terror_radius.to_string(),
            killer.height.clone(),
            killer.difficulty.clone(),
            killer.release_date.format("%-d/%-m/%Y").to_string(),
            (if killer.dlc { "Sí" } else { "No" }).to_string(),
        ]);
    }
    table
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `logging.filter`; with `logging.directory` set, output goes to a daily
/// rolling file through a non-blocking writer whose guard is returned.
fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.filter))?;

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "killer-catalog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}
