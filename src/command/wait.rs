use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::Session;

pub async fn run_wait(session: &Session, interval: Duration, attempts: Option<u32>) -> Result<()> {
    println!("⏳ Waiting for VALORANT...");
    session
        .bootstrap_until_ready(interval, attempts)
        .await
        .context("game did not become ready")?;

    if let Some(identity) = session.identity().await {
        println!("✅ Ready (player {})", identity.player_uuid);
    }
    Ok(())
}
