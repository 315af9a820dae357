use uuid::Uuid;

use crate::api::{ChatSession, EntitlementsToken, ExternalSessions, EXTERNAL_SESSIONS_PATH};
use crate::domain::{ApiInfo, DerivedIdentity, RemoteContext, RoutingInfo};
use crate::error::{ApiError, BootstrapError};

/// The three local snapshots a bootstrap fetches.
#[derive(Debug, Clone)]
pub struct SessionSnapshots {
    pub chat_session: ChatSession,
    pub riot_sessions: ExternalSessions,
    pub entitlements: EntitlementsToken,
}

impl SessionSnapshots {
    /// Pull tokens, player id and client version out of the snapshots.
    ///
    /// The client version comes from the first session whose product id is
    /// `product`, in the order the local client listed them.
    pub fn derive_identity(&self, product: &str) -> Result<DerivedIdentity, BootstrapError> {
        let game = self
            .riot_sessions
            .find_product(product)
            .ok_or_else(|| BootstrapError::TargetSessionNotFound(product.to_string()))?;
        if game.version.is_empty() {
            return Err(BootstrapError::Api(ApiError::Decode {
                path: EXTERNAL_SESSIONS_PATH.to_string(),
                source: serde::de::Error::custom(format!(
                    "session for '{}' has no version",
                    product
                )),
            }));
        }

        Ok(DerivedIdentity {
            auth_token: self.entitlements.access_token.clone(),
            player_uuid: self.chat_session.puuid,
            client_version: game.version.clone(),
            entitlement_token: self.entitlements.token.clone(),
        })
    }
}

/// Everything the session has resolved so far.
#[derive(Debug, Clone, Default)]
pub(super) struct SessionState {
    pub api_info: Option<ApiInfo>,
    pub routing: Option<RoutingInfo>,
    pub snapshots: Option<SessionSnapshots>,
    pub identity: Option<DerivedIdentity>,
}

impl SessionState {
    /// Local calls need both locators to have succeeded.
    pub fn local(&self) -> Option<&ApiInfo> {
        self.routing.as_ref()?;
        self.api_info.as_ref()
    }

    pub fn remote(&self) -> Option<RemoteContext> {
        Some(RemoteContext {
            routing: self.routing.clone()?,
            identity: self.identity.clone()?,
        })
    }

    pub fn player_uuid(&self) -> Option<Uuid> {
        self.identity.as_ref().map(|identity| identity.player_uuid)
    }
}
