pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod providers;
pub mod rates;
pub mod solver;
pub mod trace;

use anyhow::Result;
use tracing::debug;

use crate::config::AppConfig;

pub enum AppCommand {
    Rates { codes: Vec<String> },
    Solve { a: String, b: String, c: String },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Rates { codes } => cli::rates::run(&config, codes).await,
        AppCommand::Solve { a, b, c } => cli::solve::run(&config, &a, &b, &c),
    }
}
