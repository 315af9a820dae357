//! Remote game service endpoints.
//!
//! Live-game lookups go to the glz host, history and details to the pd host.

use uuid::Uuid;

use super::client::{ApiClient, RemoteHost, RequestOptions};
use super::transport::HttpTransport;
use super::types::{CoreGameMatch, MatchDetails, MatchHistory, PlayerMatchRef, PregameMatch};
use crate::domain::RemoteContext;
use crate::error::ApiError;

/// Queue the match history is filtered to unless told otherwise
pub const DEFAULT_QUEUE: &str = "competitive";

/// Number of most recent matches fetched by default
pub const DEFAULT_HISTORY_WINDOW: u32 = 20;

/// Pagination and queue filter for match history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHistoryQuery {
    pub start_index: u32,
    pub end_index: u32,
    /// `None` returns every queue.
    pub queue: Option<String>,
}

impl Default for MatchHistoryQuery {
    fn default() -> Self {
        Self {
            start_index: 0,
            end_index: DEFAULT_HISTORY_WINDOW,
            queue: Some(DEFAULT_QUEUE.to_string()),
        }
    }
}

impl MatchHistoryQuery {
    fn to_options(&self) -> RequestOptions {
        let options = RequestOptions::get()
            .query("startIndex", self.start_index)
            .query("endIndex", self.end_index);
        match &self.queue {
            Some(queue) => options.query("queue", queue),
            None => options,
        }
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Which in-progress match `puuid` is in.
    pub async fn current_game_player(
        &self,
        ctx: &RemoteContext,
        puuid: &Uuid,
    ) -> Result<PlayerMatchRef, ApiError> {
        let path = format!("core-game/v1/players/{}", puuid);
        self.remote_request(ctx, &path, RequestOptions::get(), RemoteHost::Glz)
            .await
    }

    pub async fn current_game_match(
        &self,
        ctx: &RemoteContext,
        match_id: &Uuid,
    ) -> Result<CoreGameMatch, ApiError> {
        let path = format!("core-game/v1/matches/{}", match_id);
        self.remote_request(ctx, &path, RequestOptions::get(), RemoteHost::Glz)
            .await
    }

    /// Which agent-select lobby `puuid` is in.
    pub async fn pregame_player(
        &self,
        ctx: &RemoteContext,
        puuid: &Uuid,
    ) -> Result<PlayerMatchRef, ApiError> {
        let path = format!("pregame/v1/players/{}", puuid);
        self.remote_request(ctx, &path, RequestOptions::get(), RemoteHost::Glz)
            .await
    }

    pub async fn pregame_match(
        &self,
        ctx: &RemoteContext,
        match_id: &Uuid,
    ) -> Result<PregameMatch, ApiError> {
        let path = format!("pregame/v1/matches/{}", match_id);
        self.remote_request(ctx, &path, RequestOptions::get(), RemoteHost::Glz)
            .await
    }

    pub async fn match_history(
        &self,
        ctx: &RemoteContext,
        puuid: &Uuid,
        query: &MatchHistoryQuery,
    ) -> Result<MatchHistory, ApiError> {
        let path = format!("match-history/v1/history/{}", puuid);
        self.remote_request(ctx, &path, query.to_options(), RemoteHost::Pd)
            .await
    }

    pub async fn match_details(
        &self,
        ctx: &RemoteContext,
        match_id: &Uuid,
    ) -> Result<MatchDetails, ApiError> {
        let path = format!("match-details/v1/matches/{}", match_id);
        self.remote_request(ctx, &path, RequestOptions::get(), RemoteHost::Pd)
            .await
    }
}
