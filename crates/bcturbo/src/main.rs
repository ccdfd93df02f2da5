//! BC Turbo cockpit — terminal front-end for the logistics costing
//! backend.
//!
//! This is the main entry point: it loads configuration from `BCT_*`
//! environment variables, applies CLI overrides, wires the demo backend
//! behind the bridge worker, and hands control to the ftui program loop.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bcturbo_bridge::{BridgeClient, DemoBackend};
use bcturbo_core::Config;
use bcturbo_tui::{CockpitModel, UiSharedState};

#[derive(Parser)]
#[command(name = "bcturbo")]
#[command(version, about = "BC Turbo cockpit (terminal UI for the costing backend)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the cockpit (default)
    Run {
        /// Preset SAP/IMS database folder (skips the picker)
        #[arg(long)]
        db_folder: Option<PathBuf>,

        /// Preset result folder for exports
        #[arg(long)]
        result_folder: Option<PathBuf>,

        /// Theme name (e.g. `cyberpunk-aurora`, `high-contrast`)
        #[arg(long)]
        theme: Option<String>,

        /// Quiet period for the SAP/IMS lookup debounce, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Show the resolved configuration
    Config,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if cli.verbose {
        config.log_filter = "debug".to_string();
    }

    match cli.command {
        Some(Commands::Config) => {
            println!("{config:#?}");
            ExitCode::SUCCESS
        }
        Some(Commands::Run {
            db_folder,
            result_folder,
            theme,
            debounce_ms,
        }) => {
            if let Some(folder) = db_folder {
                config.database_folder = Some(folder);
            }
            if let Some(folder) = result_folder {
                config.result_folder = Some(folder);
            }
            if let Some(theme) = theme {
                config.tui_theme = theme;
            }
            if let Some(ms) = debounce_ms {
                config.lookup_debounce_ms = ms;
            }
            run_cockpit(&config)
        }
        None => run_cockpit(&config),
    }
}

fn run_cockpit(config: &Config) -> ExitCode {
    let theme_name = bcturbo_tui::theme::set_theme_and_get_name(
        bcturbo_tui::theme::theme_id_for_name(&config.tui_theme),
    );
    tracing::debug!(theme = theme_name, "theme resolved");

    let backend = Arc::new(DemoBackend::from_config(config));
    let bridge = BridgeClient::spawn(backend);
    let state = UiSharedState::new(bridge);
    let model = CockpitModel::new(state, config);

    tracing::info!("starting BC Turbo cockpit");
    match ftui::App::fullscreen(model).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("erro no terminal: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "bcturbo",
            "run",
            "--db-folder",
            "/data/sap",
            "--debounce-ms",
            "1500",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run {
                db_folder,
                debounce_ms,
                ..
            }) => {
                assert_eq!(db_folder, Some(PathBuf::from("/data/sap")));
                assert_eq!(debounce_ms, Some(1500));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["bcturbo", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
    }
}
