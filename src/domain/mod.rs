//! Domain types shared across modules.
//!
//! These are the values the locators produce and the bootstrapper derives;
//! both API clients read them. Keeping them here avoids circular
//! dependencies between `locator`, `api` and `session`.

use std::fmt;

use uuid::Uuid;

/// Connection coordinates for the local client API, read from the lock file.
///
/// The password rotates each time the client launches, so an `ApiInfo` is only
/// good for the client process that wrote it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub username: String,
    pub process_id: u32,
    pub port: u16,
    pub password: String,
    pub protocol: String,
}

impl ApiInfo {
    /// Whether the local service expects TLS (`https`/`wss`).
    pub fn is_secure(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("https")
    }
}

impl fmt::Debug for ApiInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiInfo")
            .field("username", &self.username)
            .field("process_id", &self.process_id)
            .field("port", &self.port)
            .field("password", &"[REDACTED]")
            .field("protocol", &self.protocol)
            .finish()
    }
}

/// Region and shard the remote game servers live in, scraped from the game log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingInfo {
    pub region: String,
    pub shard: String,
}

/// Scalars pulled out of the three session snapshots once bootstrap has
/// fetched them all.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    pub auth_token: String,
    pub player_uuid: Uuid,
    pub client_version: String,
    pub entitlement_token: String,
}

impl fmt::Debug for DerivedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedIdentity")
            .field("auth_token", &"[REDACTED]")
            .field("player_uuid", &self.player_uuid)
            .field("client_version", &self.client_version)
            .field("entitlement_token", &"[REDACTED]")
            .finish()
    }
}

/// Everything a remote request needs: where to go and who we are.
#[derive(Debug, Clone)]
pub struct RemoteContext {
    pub routing: RoutingInfo,
    pub identity: DerivedIdentity,
}
