//! Error types for locating, requesting and bootstrapping.
//!
//! Each layer returns its own typed error; the bootstrapper wraps locator
//! failures so callers can tell "game not running" from "game running but not
//! in a session yet".

use std::path::PathBuf;

/// Errors produced while reading the lock file or the game log.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// The file does not exist. Usually means the client is not running.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The log exists but no remote server host has been written to it yet.
    #[error("no game server host found in {}", .0.display())]
    PatternNotFound(PathBuf),

    /// The lock file does not hold five colon-separated fields.
    #[error("malformed lock file: {0}")]
    MalformedCredentials(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out reading {}", .0.display())]
    Timeout(PathBuf),
}

/// Errors produced by the outbound HTTP primitive.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("failed to send HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("transport failure: {0}")]
    Other(String),
}

/// Errors produced by the local and remote API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-200 response. Carries the status and the untouched body.
    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The body was not the JSON shape the endpoint promises.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The session has not resolved the state this call needs.
    #[error("session is not bootstrapped")]
    NotBootstrapped,
}

impl ApiError {
    /// Status code of an HTTP failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced while opening the local WebSocket.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("WebSocket handshake failed: {0}")]
    Handshake(#[source] Box<tokio_tungstenite::tungstenite::Error>),

    /// The server hung up before the handshake finished.
    #[error("connection closed before the socket opened")]
    ClosedBeforeOpen,

    #[error("failed to build TLS connector: {0}")]
    Tls(#[source] native_tls::Error),

    #[error("timed out opening socket on port {0}")]
    Timeout(u16),

    #[error("invalid handshake request: {0}")]
    InvalidRequest(String),
}

/// Errors surfaced by [`crate::session::Session::bootstrap`].
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("local client credentials unavailable: {0}")]
    CredentialsUnavailable(#[source] LocateError),

    #[error("routing information unavailable: {0}")]
    RoutingUnavailable(#[source] LocateError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no active session for product '{0}'")]
    TargetSessionNotFound(String),

    #[error("failed to open local socket: {0}")]
    SocketConnectFailed(#[source] ConnectError),
}

impl BootstrapError {
    /// True when the failure means the game (or its client) simply isn't up
    /// yet, so polling again later is reasonable.
    pub fn is_not_running(&self) -> bool {
        matches!(
            self,
            BootstrapError::CredentialsUnavailable(LocateError::NotFound(_))
                | BootstrapError::RoutingUnavailable(
                    LocateError::NotFound(_) | LocateError::PatternNotFound(_)
                )
                | BootstrapError::TargetSessionNotFound(_)
        )
    }
}

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the local data directory")]
    NoDataDir,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
