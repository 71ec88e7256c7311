//! Students Service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/students-service/config.toml)
//! students-service
//!
//! # Custom config path
//! students-service --config /etc/students-service/config.toml
//!
//! # SQLite on another port, without touching a config file
//! students-service --database sqlite --port 8080
//!
//! # Validate config without starting
//! students-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use student_records::config::{AppConfig, DatabaseProvider};
use student_records::infrastructure::database::redact_url;
use student_records::server::{init_tracing, ServerHandle, ServerOptions};

/// Students Service: REST API for student registration records.
#[derive(Parser, Debug)]
#[command(
    name = "students-service",
    version,
    about = "REST API for student registration records",
    long_about = "Students Service: CRUD, name search and paginated listing of student \
                  records over PostgreSQL, MySQL, SQLite or an in-memory store.\n\n\
                  Default config: ~/.config/students-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "STUDENTS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database provider (postgres, mysql, sqlite, memory).
    #[arg(long)]
    database: Option<DatabaseProvider>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(student_records::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        if let Err(e) = &loaded {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(
                    cli.log_level.as_deref().unwrap_or("info"),
                ))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref host) = cli.host {
        info!("CLI override: host = {}", host);
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(provider) = cli.database {
        info!("CLI override: database = {}", provider);
        config.database.provider = provider;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.bind_address());
        println!("   Provider    : {}", config.database.provider);
        match config.database.connection_url()? {
            Some(url) => println!("   Database    : {}", redact_url(&url)),
            None => println!("   Database    : in-memory"),
        }
        println!(
            "   Pagination  : default {} / max {}",
            config.pagination.default_limit, config.pagination.max_limit
        );
        if config.cache.enabled {
            println!("   Read cache  : {} ms", config.cache.ttl_ms);
        } else {
            println!("   Read cache  : disabled");
        }
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
