//! Session bootstrap and the shared session context.
//!
//! A [`Session`] is created once and handed (by reference or `Arc`) to
//! whatever needs to talk to the game. `bootstrap()` runs the full sequence:
//!
//! ```text
//! lock file  -> ApiInfo         (skipped once resolved)
//! game log   -> RoutingInfo     (skipped once resolved)
//! local API  -> chat session, external sessions, entitlements (concurrent)
//! snapshots  -> DerivedIdentity (needs the target product's session)
//! local WS   -> SocketHandle
//! ```
//!
//! Bootstraps are serialised; the API accessors only read the state.

mod state;

pub use state::SessionSnapshots;

use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::{
    ApiClient, ChatSession, CoreGameMatch, EntitlementsToken, ExternalSessions, HttpTransport,
    MatchDetails, MatchHistory, MatchHistoryQuery, PlayerMatchRef, PregameMatch, ReqwestTransport,
};
use crate::config::ClientConfig;
use crate::domain::{ApiInfo, DerivedIdentity, RemoteContext, RoutingInfo};
use crate::error::{ApiError, BootstrapError, TransportError};
use crate::locator::{locate_credentials, locate_routing};
use crate::socket::{self, SocketHandle};
use state::SessionState;

/// Shared session context for the local client and remote game services.
pub struct Session<T = ReqwestTransport> {
    config: ClientConfig,
    client: ApiClient<T>,
    state: RwLock<SessionState>,
    socket: Mutex<Option<SocketHandle>>,
    bootstrap_lock: Mutex<()>,
}

impl Session<ReqwestTransport> {
    /// Create a session that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.http_timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> Session<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let client = ApiClient::new(transport, &config);
        Self {
            config,
            client,
            state: RwLock::new(SessionState::default()),
            socket: Mutex::new(None),
            bootstrap_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying client (for advanced use cases).
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    // ========== Bootstrap ==========

    /// Resolve credentials and routing, refresh tokens and reopen the socket.
    ///
    /// Cached `ApiInfo`/`RoutingInfo` are reused. Snapshots, identity and
    /// socket are always replaced, and are only published once every step
    /// has succeeded. Nothing is retried here; see
    /// [`Session::bootstrap_until_ready`] for a polling wrapper.
    pub async fn bootstrap(&self) -> Result<(), BootstrapError> {
        let _guard = self.bootstrap_lock.lock().await;
        info!("🚀 Bootstrapping session...");

        let api_info = self.ensure_credentials().await?;
        let routing = self.ensure_routing().await?;

        self.invalidate_identity().await;

        info!("🔐 Fetching session snapshots...");
        let (chat_session, riot_sessions, entitlements) = tokio::try_join!(
            self.client.chat_session(&api_info),
            self.client.external_sessions(&api_info),
            self.client.entitlements_token(&api_info),
        )
        .map_err(|e| {
            error!("❌ Failed to fetch session snapshots: {}", e);
            BootstrapError::Api(e)
        })?;

        let snapshots = SessionSnapshots {
            chat_session,
            riot_sessions,
            entitlements,
        };
        let identity = snapshots
            .derive_identity(&self.config.target_product)
            .map_err(|e| {
                warn!(
                    "⚠️  {} ({} active sessions)",
                    e,
                    snapshots.riot_sessions.len()
                );
                e
            })?;
        debug!("Derived identity: {:?}", identity);

        info!("🔗 Opening local socket...");
        let handle = socket::connect(&api_info, self.config.socket_timeout)
            .await
            .map_err(BootstrapError::SocketConnectFailed)?;

        {
            let mut state = self.state.write().await;
            state.snapshots = Some(snapshots);
            state.identity = Some(identity.clone());
        }
        *self.socket.lock().await = Some(handle);

        info!(
            "✅ Session ready (player {}, region {}, shard {})",
            identity.player_uuid, routing.region, routing.shard
        );
        Ok(())
    }

    /// Keep bootstrapping while the game is not up yet.
    ///
    /// Retries only failures where the client or game isn't running (see
    /// [`BootstrapError::is_not_running`]); anything else is returned at once.
    /// `max_attempts` of `None` polls forever.
    pub async fn bootstrap_until_ready(
        &self,
        interval: Duration,
        max_attempts: Option<u32>,
    ) -> Result<(), BootstrapError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.bootstrap().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_not_running() && max_attempts.map_or(true, |max| attempt < max) => {
                    debug!(
                        "Game not ready ({}); retrying in {:?} (attempt {})",
                        e, interval, attempt
                    );
                    tokio::time::sleep(interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Close the socket and forget everything, including credentials and
    /// routing. Call after the game client restarts.
    pub async fn reset(&self) {
        let _guard = self.bootstrap_lock.lock().await;
        self.close_socket().await;
        *self.state.write().await = SessionState::default();
        info!("Session reset");
    }

    async fn ensure_credentials(&self) -> Result<ApiInfo, BootstrapError> {
        if let Some(info) = self.state.read().await.api_info.clone() {
            return Ok(info);
        }

        info!("🔍 Locating local client credentials...");
        let info = locate_credentials(&self.config.lockfile_path, self.config.io_timeout)
            .await
            .map_err(|e| {
                warn!("⚠️  {}", e);
                BootstrapError::CredentialsUnavailable(e)
            })?;

        self.state.write().await.api_info = Some(info.clone());
        Ok(info)
    }

    async fn ensure_routing(&self) -> Result<RoutingInfo, BootstrapError> {
        if let Some(routing) = self.state.read().await.routing.clone() {
            return Ok(routing);
        }

        info!("🌐 Locating game routing...");
        let routing = locate_routing(&self.config.log_path, self.config.io_timeout)
            .await
            .map_err(|e| {
                warn!("⚠️  {}", e);
                BootstrapError::RoutingUnavailable(e)
            })?;

        self.state.write().await.routing = Some(routing.clone());
        Ok(routing)
    }

    /// Drop the previous bootstrap's tokens and socket before refreshing.
    async fn invalidate_identity(&self) {
        {
            let mut state = self.state.write().await;
            state.snapshots = None;
            state.identity = None;
        }
        self.close_socket().await;
    }

    async fn close_socket(&self) {
        let previous = self.socket.lock().await.take();
        if let Some(mut previous) = previous {
            previous.close().await;
        }
    }

    // ========== State ==========

    pub async fn api_info(&self) -> Option<ApiInfo> {
        self.state.read().await.api_info.clone()
    }

    pub async fn routing(&self) -> Option<RoutingInfo> {
        self.state.read().await.routing.clone()
    }

    pub async fn identity(&self) -> Option<DerivedIdentity> {
        self.state.read().await.identity.clone()
    }

    pub async fn snapshots(&self) -> Option<SessionSnapshots> {
        self.state.read().await.snapshots.clone()
    }

    pub async fn player_uuid(&self) -> Option<Uuid> {
        self.state.read().await.player_uuid()
    }

    pub async fn socket_connected(&self) -> bool {
        self.socket
            .lock()
            .await
            .as_ref()
            .is_some_and(SocketHandle::is_open)
    }

    pub async fn is_bootstrapped(&self) -> bool {
        let has_identity = self.state.read().await.identity.is_some();
        has_identity && self.socket_connected().await
    }

    async fn local_api(&self) -> Result<ApiInfo, ApiError> {
        self.state
            .read()
            .await
            .local()
            .cloned()
            .ok_or(ApiError::NotBootstrapped)
    }

    async fn remote_ctx(&self) -> Result<RemoteContext, ApiError> {
        self.state
            .read()
            .await
            .remote()
            .ok_or(ApiError::NotBootstrapped)
    }

    // ========== Local API ==========

    pub async fn entitlements_token(&self) -> Result<EntitlementsToken, ApiError> {
        self.client.entitlements_token(&self.local_api().await?).await
    }

    pub async fn chat_session(&self) -> Result<ChatSession, ApiError> {
        self.client.chat_session(&self.local_api().await?).await
    }

    pub async fn external_sessions(&self) -> Result<ExternalSessions, ApiError> {
        self.client.external_sessions(&self.local_api().await?).await
    }

    pub async fn help(&self) -> Result<serde_json::Value, ApiError> {
        self.client.help(&self.local_api().await?).await
    }

    // ========== Remote API ==========

    /// The signed-in player's in-progress match reference.
    pub async fn current_game_player(&self) -> Result<PlayerMatchRef, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client
            .current_game_player(&ctx, &ctx.identity.player_uuid)
            .await
    }

    pub async fn current_game_player_for(&self, puuid: &Uuid) -> Result<PlayerMatchRef, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.current_game_player(&ctx, puuid).await
    }

    pub async fn current_game_match(&self, match_id: &Uuid) -> Result<CoreGameMatch, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.current_game_match(&ctx, match_id).await
    }

    /// Look up the signed-in player's in-progress match and fetch it.
    pub async fn current_game(&self) -> Result<CoreGameMatch, ApiError> {
        let ctx = self.remote_ctx().await?;
        let player = self
            .client
            .current_game_player(&ctx, &ctx.identity.player_uuid)
            .await?;
        self.client.current_game_match(&ctx, &player.match_id).await
    }

    pub async fn pregame_player(&self) -> Result<PlayerMatchRef, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client
            .pregame_player(&ctx, &ctx.identity.player_uuid)
            .await
    }

    pub async fn pregame_player_for(&self, puuid: &Uuid) -> Result<PlayerMatchRef, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.pregame_player(&ctx, puuid).await
    }

    pub async fn pregame_match(&self, match_id: &Uuid) -> Result<PregameMatch, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.pregame_match(&ctx, match_id).await
    }

    /// Look up the signed-in player's agent-select lobby and fetch it.
    pub async fn pregame(&self) -> Result<PregameMatch, ApiError> {
        let ctx = self.remote_ctx().await?;
        let player = self
            .client
            .pregame_player(&ctx, &ctx.identity.player_uuid)
            .await?;
        self.client.pregame_match(&ctx, &player.match_id).await
    }

    /// The signed-in player's match history.
    pub async fn match_history(&self, query: &MatchHistoryQuery) -> Result<MatchHistory, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client
            .match_history(&ctx, &ctx.identity.player_uuid, query)
            .await
    }

    pub async fn match_history_for(
        &self,
        puuid: &Uuid,
        query: &MatchHistoryQuery,
    ) -> Result<MatchHistory, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.match_history(&ctx, puuid, query).await
    }

    pub async fn match_details(&self, match_id: &Uuid) -> Result<MatchDetails, ApiError> {
        let ctx = self.remote_ctx().await?;
        self.client.match_details(&ctx, match_id).await
    }
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("lockfile_path", &self.config.lockfile_path)
            .field("log_path", &self.config.log_path)
            .field("target_product", &self.config.target_product)
            .finish_non_exhaustive()
    }
}
