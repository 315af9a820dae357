//! Subcommand implementations for the `valtrack` binary.

mod game;
mod history;
mod status;
mod wait;

pub use game::{run_current_game, run_pregame};
pub use history::{run_history, run_match};
pub use status::{run_help_endpoints, run_status};
pub use wait::run_wait;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::session::Session;

/// Bootstrap or fail with a hint about what is missing.
pub async fn bootstrap(session: &Session) -> Result<()> {
    match session.bootstrap().await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_running() => {
            println!("❌ VALORANT does not appear to be running or in a session.");
            println!("   Run 'valtrack wait' to poll until it is.");
            Err(e).context("bootstrap failed")
        }
        Err(e) => Err(e).context("bootstrap failed"),
    }
}

pub fn print_json<S: Serialize + ?Sized>(value: &S) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    println!("{}", json);
    Ok(())
}
