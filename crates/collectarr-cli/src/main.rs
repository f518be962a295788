use clap::{ArgAction, Parser, Subcommand};
use collection_sync_config::{Config, PathManager};
use commands::{config, daemon, run};
use std::path::{Path, PathBuf};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "collectarr")]
#[command(about = "Collectarr - Keep every Radarr collection complete")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single reconciliation pass
    #[command(long_about = "Check every Radarr collection once and add each member movie the library doesn't hold yet, then print a summary. Individual failures are reported in the summary and do not fail the command.")]
    Run,
    /// Run as daemon with internal scheduler
    #[command(long_about = "Resolve the quality profile once, then run a reconciliation pass every refresh interval. A pass runs on startup unless --no-startup-run is given. Stop with Ctrl-C.")]
    Daemon {
        /// Skip the pass on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_run: bool,

        /// Minutes between passes (overrides config and RADARR_REFRESH_MINUTES)
        #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u64).range(1..))]
        refresh_minutes: Option<u64>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (file plus environment overrides)
    #[command(long_about = "Display the effective configuration after environment overrides. The API key is masked unless --full is given.")]
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
}

fn load_config(explicit: Option<&Path>, paths: &PathManager) -> color_eyre::Result<Config> {
    Config::load(explicit, &paths.config_file()).map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();
    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Run => {
            let config = load_config(cli.config.as_deref(), &paths)?;
            logging::init_logging_with_file(cli.verbose, cli.quiet, config.logging.file.clone())
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            run::run_once(config, &output).await
        }
        Commands::Daemon {
            no_startup_run,
            refresh_minutes,
        } => {
            let config = load_config(cli.config.as_deref(), &paths)?;
            logging::init_logging_with_file(cli.verbose, cli.quiet, Some(daemon::log_file(&config, &paths)))
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            daemon::run_daemon(config, no_startup_run, refresh_minutes, &output).await
        }
        Commands::Config { cmd } => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            config::run_config(cmd, cli.config.as_deref(), &paths, &output)
        }
    }
}
