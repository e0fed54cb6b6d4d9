//! squadlog library root.
//! Exposes the CLI parser, the high-level run() function, and the engine
//! modules (storage, reconciliation, analytics, export).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod sheets;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Roster { .. } => cli::commands::roster::handle(cli, cfg),
        Commands::Pending { .. } => cli::commands::pending::handle(&cli.command, cfg),
        Commands::Submit { .. } => cli::commands::submit::handle(cli, cfg),
        Commands::Summary { .. } => cli::commands::summary::handle(cli, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // test mode never reads the user's configuration file
    let mut cfg = if cli.test {
        Config::default()
    } else {
        Config::load()?
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_database(Some(custom_db))
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
