//! Users Service
//!
//! Reads configuration from a TOML file (`~/.config/users-service/config.toml`
//! by default) and serves the REST API until SIGINT or SIGTERM.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use users_service::config::CONFIG_PATH_ENV;
use users_service::{default_config_path, init_tracing, AppConfig, ServerHandle, ServerOptions};

#[derive(Debug, Parser)]
#[command(name = "users-service", version, about = "Users CRUD and file upload HTTP service")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Create the users table if it does not exist
    #[arg(long)]
    migrate: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut cfg, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    cfg.apply_env_overrides();
    if let Some(host) = cli.host {
        cfg.server.host = host;
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if let Some(level) = cli.log_level {
        cfg.logging.level = level;
    }

    init_tracing(&cfg.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("{}", e);
            if cli.check {
                return ExitCode::FAILURE;
            }
            info!("Using default configuration");
        }
    }

    if cli.check {
        info!("Configuration is valid");
        return ExitCode::SUCCESS;
    }

    info!("Starting Users Service...");
    let handle = match ServerHandle::start(ServerOptions {
        config: cfg,
        auto_migrate: cli.migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    handle.install_signal_handler();

    match handle.wait().await {
        Ok(()) => {
            info!("Users Service shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
