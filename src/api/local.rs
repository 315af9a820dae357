//! Local client endpoints.

use tracing::debug;

use super::client::{ApiClient, RequestOptions};
use super::transport::HttpTransport;
use super::types::{ChatSession, EntitlementsToken, ExternalSessions};
use crate::domain::ApiInfo;
use crate::error::ApiError;

pub const ENTITLEMENTS_TOKEN_PATH: &str = "entitlements/v1/token";
pub const CHAT_SESSION_PATH: &str = "chat/v1/session";
pub const EXTERNAL_SESSIONS_PATH: &str = "product-session/v1/external-sessions";
pub const HELP_PATH: &str = "help";

impl<T: HttpTransport> ApiClient<T> {
    /// Access token and entitlements JWT for the signed-in account.
    pub async fn entitlements_token(&self, api: &ApiInfo) -> Result<EntitlementsToken, ApiError> {
        debug!("=== Entitlements Request ===");
        let token: EntitlementsToken = self
            .local_request(api, ENTITLEMENTS_TOKEN_PATH, RequestOptions::get())
            .await?;

        if token.access_token.is_empty() || token.token.is_empty() {
            return Err(ApiError::Decode {
                path: ENTITLEMENTS_TOKEN_PATH.to_string(),
                source: serde::de::Error::custom(
                    "entitlements response does not contain a valid token",
                ),
            });
        }
        Ok(token)
    }

    pub async fn chat_session(&self, api: &ApiInfo) -> Result<ChatSession, ApiError> {
        self.local_request(api, CHAT_SESSION_PATH, RequestOptions::get())
            .await
    }

    /// Product sessions the Riot client is currently hosting.
    pub async fn external_sessions(&self, api: &ApiInfo) -> Result<ExternalSessions, ApiError> {
        self.local_request(api, EXTERNAL_SESSIONS_PATH, RequestOptions::get())
            .await
    }

    /// Endpoint and event listing of the local service.
    pub async fn help(&self, api: &ApiInfo) -> Result<serde_json::Value, ApiError> {
        self.local_request(api, HELP_PATH, RequestOptions::get())
            .await
    }
}
