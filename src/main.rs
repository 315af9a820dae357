use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use valtrack::api::MatchHistoryQuery;
use valtrack::cli::{Cli, Commands};
use valtrack::{command, logging, ClientConfig, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_file = logging::init(cli.verbose, cli.log_dir.as_deref())
        .context("failed to open log file")?;
    if let Some(path) = log_file {
        debug!("Logging to {}", path.display());
    }

    let Some(cmd) = cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        eprintln!("Use 'valtrack status' to check the connection to the game.");
        return Ok(());
    };

    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(path) = cli.lockfile {
        config.lockfile_path = path;
    }
    if let Some(path) = cli.logfile {
        config.log_path = path;
    }

    let session = Session::new(config).context("failed to create HTTP client")?;

    let result = match cmd {
        Commands::Status => command::run_status(&session).await,
        Commands::CurrentGame => command::run_current_game(&session).await,
        Commands::Pregame => command::run_pregame(&session).await,
        Commands::History {
            start,
            end,
            queue,
            all_queues,
        } => {
            let query = MatchHistoryQuery {
                start_index: start,
                end_index: end,
                queue: (!all_queues).then_some(queue),
            };
            command::run_history(&session, query).await
        }
        Commands::Match { id } => command::run_match(&session, id).await,
        Commands::HelpEndpoints => command::run_help_endpoints(&session).await,
        Commands::Wait { interval, attempts } => {
            command::run_wait(&session, Duration::from_secs(interval), attempts).await
        }
    };

    session.reset().await;
    result
}
