mod cli;

use mintari::{
    config::{self, Config, StylizeBackend},
    http::build_client,
    publish::StoragePublisher,
    records::MediaStorage,
    server, stylize,
};
use mintari_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Database file name inside the data directory
const DB_FILE_NAME: &str = "mintari.db";

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Mintari server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let data_dir = data_dir(&config, config_path);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // Initialize database
    let db_path = data_dir.join(DB_FILE_NAME);
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    let db_pool = init_pool(&db_path_str)?;

    server::start_server(config, db_pool).await
}

/// Data directory from config, else the config file's directory, else the
/// current directory.
fn data_dir(config: &Config, config_path: Option<&Path>) -> PathBuf {
    config
        .server
        .data_dir
        .clone()
        .or_else(|| {
            config_path
                .and_then(|p| p.parent())
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
        })
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mintari=trace,mintari_db=debug,mintari_common=debug,tower_http=debug".to_string()
        } else {
            "mintari=debug,mintari_db=info,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so command output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Stylize { input, backend } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(stylize_file(&input, backend, cli.config.as_deref()))
        }
        Commands::Publish { file } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(publish_file(&file, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mintari {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn stylize_file(
    input: &Path,
    backend: Option<StylizeBackend>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if let Some(backend) = backend {
        config.stylize.backend = backend;
        config::validate_config(&config)?;
    }

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let storage = MediaStorage::new(config.media.root.clone());
    storage.ensure_layout()?;

    let stylizer = stylize::build_stylizer(&config.stylize, &config.http, &storage)?;
    tracing::info!("Stylizing {:?} with the {} backend", input, stylizer.name());

    let output = stylizer.stylize(input).await?;
    println!("{}", output.display());

    Ok(())
}

async fn publish_file(file: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let client = build_client(config.http.request_timeout());
    let publisher = StoragePublisher::new(client, &config.publish);
    let locator = publisher
        .publish(file)
        .await
        .with_context(|| format!("Failed to publish {:?}", file))?;

    println!("{}", locator);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Media root: {}", config.media.root.display());
    println!("  Stylize backend: {}", config.stylize.backend);
    if let Some(ref model) = config.stylize.remote.model {
        println!("  Model: {}", model);
    }
    println!("  Publish enabled: {}", config.publish.enabled);
    println!(
        "  Publish credential: {}",
        if config.publish.api_key.is_some() {
            "set"
        } else {
            "missing"
        }
    );
}
