use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use iexport::core::config::{DEFAULT_ENV_FILE, RunMode};
use iexport::core::log::init_logging;
use iexport::core::price::ChartRange;
use iexport::export::DateStyle;
use iexport::export::writer::DEFAULT_OUTPUT_DIR;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the environment file (name,token,base_url per line)
    #[arg(short, long, global = true, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example environment file
    Setup {
        /// Overwrite an existing environment file
        #[arg(long)]
        force: bool,
    },
    /// List the environments in the environment file
    Envs,
    /// Download historical prices and write a Quicken import file
    Fetch(FetchArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Ticker symbols to fetch
    symbols: Vec<String>,

    /// CSV file with ticker symbols
    #[arg(short, long)]
    symbols_file: Option<PathBuf>,

    /// Run mode, selects the prod or dev environment
    #[arg(short, long, env = "IEXPORT_MODE", default_value = "dev")]
    mode: RunMode,

    /// Use the named environment instead of the run mode's
    #[arg(long)]
    environment: Option<String>,

    /// History range: 5d, 1m, 3m, 6m, ytd, 1y, 2y or 5y
    #[arg(short, long, default_value = "5d")]
    range: ChartRange,

    /// Output file; defaults to a timestamped file in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for timestamped output files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Write two digit years (MM/DD/YY)
    #[arg(long)]
    short_year: bool,
}

impl FetchArgs {
    fn into_options(self, env_file: PathBuf) -> iexport::FetchOptions {
        iexport::FetchOptions {
            env_file,
            environment: self
                .environment
                .unwrap_or_else(|| self.mode.env_name().to_string()),
            symbols: self.symbols,
            symbols_file: self.symbols_file,
            range: self.range,
            output: self.output,
            output_dir: self.output_dir,
            date_style: if self.short_year {
                DateStyle::Short
            } else {
                DateStyle::Long
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command {
        Some(Commands::Setup { force }) => iexport::AppCommand::Setup {
            env_file: cli.env_file,
            force,
        },
        Some(Commands::Envs) => iexport::AppCommand::Envs {
            env_file: cli.env_file,
        },
        Some(Commands::Fetch(args)) => iexport::AppCommand::Fetch(args.into_options(cli.env_file)),
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let result = iexport::run_command(command).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
