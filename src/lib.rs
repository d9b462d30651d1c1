pub mod cli;
pub mod core;
pub mod export;
pub mod providers;
pub mod symbols;

pub use crate::cli::fetch::{ExportSummary, FetchOptions};
pub use crate::core::error::ExportError;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

pub enum AppCommand {
    Fetch(FetchOptions),
    Envs { env_file: PathBuf },
    Setup { env_file: PathBuf, force: bool },
}

pub async fn run_command(command: AppCommand) -> Result<()> {
    match command {
        AppCommand::Fetch(opts) => {
            info!("iexport starting...");
            let summary = cli::fetch::run(&opts).await?;
            println!("{}", summary.display());
        }
        AppCommand::Envs { env_file } => {
            println!("{}", cli::envs::list_environments(&env_file)?);
        }
        AppCommand::Setup { env_file, force } => {
            cli::setup::setup_at_path(&env_file, force)?;
            println!("Created example environment file at {}", env_file.display());
        }
    }
    Ok(())
}
