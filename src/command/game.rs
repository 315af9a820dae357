use anyhow::Result;

use super::{bootstrap, print_json};
use crate::error::ApiError;
use crate::session::Session;

pub async fn run_current_game(session: &Session) -> Result<()> {
    bootstrap(session).await?;
    match session.current_game().await {
        Ok(game) => print_json(&game),
        Err(ApiError::Http { status: 404, .. }) => {
            println!("⚠️  Not in a match.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_pregame(session: &Session) -> Result<()> {
    bootstrap(session).await?;
    match session.pregame().await {
        Ok(lobby) => print_json(&lobby),
        Err(ApiError::Http { status: 404, .. }) => {
            println!("⚠️  Not in agent select.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
