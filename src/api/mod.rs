//! API clients for the local Riot client service and the remote game services.
//!
//! `ApiClient` knows how to authenticate against both and how to decode
//! responses; the endpoint methods live in `local` and `remote`. State (lock
//! file credentials, routing, tokens) is passed in by the caller, normally
//! [`crate::session::Session`].

mod client;
mod local;
mod remote;
mod transport;
mod types;

pub use client::{ApiClient, RemoteHost, RequestOptions, LOCAL_AUTH_USER};
pub use local::{CHAT_SESSION_PATH, ENTITLEMENTS_TOKEN_PATH, EXTERNAL_SESSIONS_PATH, HELP_PATH};
pub use remote::{MatchHistoryQuery, DEFAULT_HISTORY_WINDOW, DEFAULT_QUEUE};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    ChatSession, Coach, CoreGameMatch, CoreGamePlayer, Damage, Economy, EntitlementsToken,
    ExternalSession, ExternalSessions, FinishingDamage, Kill, LaunchConfiguration, MatchDetails,
    MatchHistory, MatchHistoryEntry, MatchInfo, MatchPlayer, MatchTeam, PlayerIdentity,
    PlayerMatchRef, PlayerStats, PregameMatch, PregamePlayer, PregameTeam, RoundPlayerStats,
    RoundResult,
};
