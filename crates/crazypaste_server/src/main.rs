//! Headless API server entrypoint.

use crazypaste_core::db::backup::BackupManager;
use crazypaste_core::DEFAULT_PORT;
use crazypaste_server::{config::Config, db::Database, serve_router, sweep, AppState};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    backup: bool,
    export: Option<PathBuf>,
    import: Option<PathBuf>,
}

impl CliFlags {
    fn runs_maintenance_mode(&self) -> bool {
        self.backup || self.export.is_some() || self.import.is_some()
    }
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" => flags.help = true,
            "--backup" => flags.backup = true,
            "--export" | "--import" => {
                let Some(value) = iter.next().filter(|value| !value.starts_with("--")) else {
                    anyhow::bail!("Option '{}' requires a file path", arg);
                };
                let path = Some(PathBuf::from(value));
                if arg == "--export" {
                    flags.export = path;
                } else {
                    flags.import = path;
                }
            }
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crazypaste=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();

    if cli_flags.runs_maintenance_mode() {
        return run_maintenance(&config, &cli_flags);
    }

    if config.auto_backup {
        if let Err(err) = BackupManager::new(&config.db_path).create_backup() {
            tracing::warn!("Failed to create auto-backup: {}", err);
        }
    }

    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database);

    let allow_public = crazypaste_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_override = std::env::var("BIND").ok();
    let bind_addr =
        crazypaste_server::resolve_bind_address(&config, bind_override.as_deref(), allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let sweeper = (config.sweep_interval_secs > 0).then(|| {
        tracing::info!(
            "Expiry sweep enabled every {}s",
            config.sweep_interval_secs
        );
        sweep::spawn_expiry_sweeper(
            state.db.clone(),
            Duration::from_secs(config.sweep_interval_secs),
        )
    });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("CrazyPaste running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("CrazyPaste stopped");

    serve_result?;
    Ok(())
}

fn print_help() {
    println!("CrazyPaste Server\n");
    println!("Usage: crazypaste [OPTIONS]\n");
    println!("Options:");
    println!("  --backup          Create a backup of the database");
    println!("  --export <FILE>   Write all pastes to FILE as JSON");
    println!("  --import <FILE>   Merge pastes from a JSON export");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/crazypaste/db)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 10MB)");
    println!("  AUTO_BACKUP       Back up the database on startup");
    println!("  RECENT_EXCLUDE_BURN       Hide burn-after-reading pastes from recent (default: true)");
    println!("  RECENT_EXCLUDE_PROTECTED  Hide password-protected pastes from recent (default: true)");
    println!("  SWEEP_INTERVAL_SECS       Seconds between expiry sweeps (default: 0, disabled)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

fn run_maintenance(config: &Config, flags: &CliFlags) -> anyhow::Result<()> {
    if flags.backup {
        match BackupManager::new(&config.db_path).create_backup()? {
            Some(path) => println!("Database backed up to: {}", path.display()),
            None => println!("No existing database to backup"),
        }
    }

    if flags.export.is_none() && flags.import.is_none() {
        return Ok(());
    }

    let database = Database::new(&config.db_path)?;
    if let Some(path) = &flags.import {
        let raw = std::fs::read_to_string(path)?;
        let summary = database.pastes.import_json(&raw)?;
        println!(
            "Imported {} paste(s), skipped {} from {}",
            summary.imported,
            summary.skipped,
            path.display()
        );
    }
    if let Some(path) = &flags.export {
        std::fs::write(path, database.pastes.export_json()?)?;
        println!("Exported pastes to {}", path.display());
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
