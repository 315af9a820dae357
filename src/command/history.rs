use anyhow::{Context, Result};
use uuid::Uuid;

use super::{bootstrap, print_json};
use crate::api::MatchHistoryQuery;
use crate::session::Session;

pub async fn run_history(session: &Session, query: MatchHistoryQuery) -> Result<()> {
    bootstrap(session).await?;
    let history = session
        .match_history(&query)
        .await
        .context("failed to fetch match history")?;
    print_json(&history)
}

pub async fn run_match(session: &Session, match_id: Uuid) -> Result<()> {
    bootstrap(session).await?;
    let details = session
        .match_details(&match_id)
        .await
        .with_context(|| format!("failed to fetch match {}", match_id))?;
    print_json(&details)
}
