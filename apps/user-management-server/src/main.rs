use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use utoipa::OpenApi;

use api_ingress::{ApiIngress, ApiIngressConfig};
use user_management::api::rest::UsersApiDoc;
use user_management::config::UsersConfig;
use user_management::UserManagement;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// User Management Server - CRUD API over a users store
#[derive(Parser)]
#[command(name = "user-management-server")]
#[command(about = "User Management Server - CRUD API over a users store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("User Management Server starting");
    tracing::debug!("Effective server configuration: {:?}", config.server);

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Only SQLite is compiled in; reject anything else before connecting.
fn detect_backend(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Module sections and the listen address, parsed and validated.
struct Resolved {
    database: DatabaseConfig,
    users: UsersConfig,
    ingress: ApiIngressConfig,
    bind_addr: String,
}

fn resolve(config: &AppConfig) -> Result<Resolved> {
    let database = config.database.clone().unwrap_or_default();
    detect_backend(&database)?;

    let users = UsersConfig::from_section(config.module_config(user_management::module::MODULE_NAME))?;
    let ingress = ApiIngressConfig::from_section(config.module_config(api_ingress::MODULE_NAME))?;

    let bind_addr = ingress.resolve_bind_addr(&config.server.host, config.server.port);
    bind_addr
        .parse::<SocketAddr>()
        .map_err(|e| anyhow!("Invalid bind address '{}': {}", bind_addr, e))?;

    Ok(Resolved {
        database,
        users,
        ingress,
        bind_addr,
    })
}

async fn connect_db(
    cfg: &DatabaseConfig,
    base_dir: &Path,
    timeout_sec: u64,
) -> Result<DatabaseConnection> {
    // Relative sqlite paths are anchored at home_dir to avoid cwd surprises
    let dsn = cfg.resolved_url(base_dir, true)?;

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(cfg.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if timeout_sec > 0 {
        opts.connect_timeout(Duration::from_secs(timeout_sec));
    }
    if let Some(ms) = cfg.busy_timeout_ms {
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(Duration::from_millis(u64::from(ms))));
    }
    if dsn == runtime::MOCK_DATABASE_URL {
        // The memory database lives as long as its connection
        opts.min_connections(1);
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", dsn))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

async fn run_server(config: AppConfig) -> Result<()> {
    let resolved = resolve(&config)?;
    let base_dir = PathBuf::from(&config.server.home_dir);

    let db = connect_db(&resolved.database, &base_dir, config.server.timeout_sec).await?;
    UserManagement::migrate(&db).await?;

    tracing::info!("Initializing modules...");
    let users = UserManagement::init(db.clone(), &resolved.users);

    let mut ingress = ApiIngress::new(resolved.ingress);
    ingress.register_openapi(UsersApiDoc::openapi());
    let router = ingress.build_router(users.register_rest(axum::Router::new()))?;

    let shutdown = async {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!("Failed to listen for shutdown signals: {e:#}");
        }
    };
    let served = ingress.serve(&resolved.bind_addr, router, shutdown).await;

    if let Err(e) = db.close().await {
        tracing::warn!("Closing database failed: {e}");
    }
    tracing::info!("User Management Server stopped");
    served
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let resolved = resolve(config)?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Listen address: {}", resolved.bind_addr);
    println!("Database: {}", resolved.database.url);
    println!("{}", config.to_yaml()?);

    Ok(())
}
