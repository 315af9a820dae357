use anyhow::{Context, Result};
use serde_json::json;

use super::{bootstrap, print_json};
use crate::session::Session;

pub async fn run_status(session: &Session) -> Result<()> {
    bootstrap(session).await?;

    let identity = session
        .identity()
        .await
        .context("session has no identity after bootstrap")?;
    let routing = session
        .routing()
        .await
        .context("session has no routing after bootstrap")?;
    let snapshots = session.snapshots().await;

    println!("✅ Connected to the local client");
    print_json(&json!({
        "player_uuid": identity.player_uuid,
        "riot_id": snapshots.as_ref().map(|s| s.chat_session.riot_id()),
        "client_version": identity.client_version,
        "region": routing.region,
        "shard": routing.shard,
        "socket_connected": session.socket_connected().await,
    }))
}

pub async fn run_help_endpoints(session: &Session) -> Result<()> {
    bootstrap(session).await?;
    let help = session
        .help()
        .await
        .context("failed to fetch endpoint listing")?;
    print_json(&help)
}
