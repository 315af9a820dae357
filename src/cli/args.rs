use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::api::{DEFAULT_HISTORY_WINDOW, DEFAULT_QUEUE};

/// valtrack - local session bootstrap and match data for VALORANT
#[derive(Parser)]
#[command(name = "valtrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Riot Client lock file (defaults to the platform location)
    #[arg(long, global = true, env = "VALTRACK_LOCKFILE")]
    pub lockfile: Option<PathBuf>,

    /// Game log to read routing from (defaults to the platform location)
    #[arg(long, global = true, env = "VALTRACK_LOGFILE")]
    pub logfile: Option<PathBuf>,

    /// Also write logs to valtrack.log in this directory
    #[arg(long, global = true, env = "VALTRACK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bootstrap and show identity and routing
    Status,
    /// Show the in-progress match
    CurrentGame,
    /// Show the agent-select lobby
    Pregame,
    /// Show recent match history
    History {
        /// First entry to return
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// One past the last entry to return
        #[arg(long, default_value_t = DEFAULT_HISTORY_WINDOW)]
        end: u32,

        /// Queue to filter on
        #[arg(long, default_value = DEFAULT_QUEUE, conflicts_with = "all_queues")]
        queue: String,

        /// Do not filter by queue
        #[arg(long)]
        all_queues: bool,
    },
    /// Show a completed match
    Match {
        /// Match id
        id: Uuid,
    },
    /// Dump the local client's endpoint listing
    HelpEndpoints,
    /// Wait until the game is running and a session can be bootstrapped
    Wait {
        /// Seconds between attempts
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// Give up after this many attempts (polls forever if absent)
        #[arg(long)]
        attempts: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_defaults() {
        let cli = Cli::try_parse_from(["valtrack", "history"]).unwrap();
        match cli.command {
            Some(Commands::History {
                start,
                end,
                queue,
                all_queues,
            }) => {
                assert_eq!(start, 0);
                assert_eq!(end, 20);
                assert_eq!(queue, "competitive");
                assert!(!all_queues);
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "valtrack",
            "status",
            "--verbose",
            "--lockfile",
            "/tmp/lockfile",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.lockfile, Some(PathBuf::from("/tmp/lockfile")));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_log_dir_flag() {
        let cli = Cli::try_parse_from(["valtrack", "--log-dir", "/tmp/valtrack", "wait"]).unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/valtrack")));
        assert!(matches!(cli.command, Some(Commands::Wait { .. })));
    }

    #[test]
    fn test_match_requires_uuid() {
        assert!(Cli::try_parse_from(["valtrack", "match", "not-a-uuid"]).is_err());
        let cli = Cli::try_parse_from([
            "valtrack",
            "match",
            "5f1f3c2e-7e8b-4a6d-9c2e-0e5b9f1d2a33",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Match { .. })));
    }

    #[test]
    fn test_all_queues_conflicts_with_queue() {
        assert!(Cli::try_parse_from([
            "valtrack",
            "history",
            "--queue",
            "unrated",
            "--all-queues"
        ])
        .is_err());
    }
}
