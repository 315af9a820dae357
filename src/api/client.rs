use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::transport::{HttpRequest, HttpTransport};
use crate::config::{expand_host, ClientConfig};
use crate::domain::{ApiInfo, RemoteContext, RoutingInfo};
use crate::error::ApiError;

/// Username the local client expects in Basic auth, regardless of the lock
/// file's username field.
pub const LOCAL_AUTH_USER: &str = "riot";

/// Loopback address of the local client service
const LOCAL_HOST: &str = "127.0.0.1";

/// Which remote base host a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteHost {
    /// Per-shard player-data host (match history, match details)
    Pd,
    /// Per-region-and-shard live-game host (core-game, pregame)
    Glz,
}

/// Method, extra headers, query and body for a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: String,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: "GET".to_string(),
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Builds authenticated requests for the local and remote APIs and decodes
/// their responses.
pub struct ApiClient<T> {
    transport: T,
    client_platform: String,
    pd_url: String,
    glz_url: String,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            client_platform: config.client_platform.clone(),
            pd_url: config.pd_url.clone(),
            glz_url: config.glz_url.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{protocol}://127.0.0.1:{port}/{path}`
    pub(super) fn local_url(api: &ApiInfo, path: &str) -> Result<Url, ApiError> {
        let raw = format!(
            "{}://{}:{}/{}",
            api.protocol,
            LOCAL_HOST,
            api.port,
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    pub(super) fn remote_url(
        &self,
        routing: &RoutingInfo,
        host: RemoteHost,
        path: &str,
    ) -> Result<Url, ApiError> {
        let template = match host {
            RemoteHost::Pd => &self.pd_url,
            RemoteHost::Glz => &self.glz_url,
        };
        let base = expand_host(template, &routing.region, &routing.shard);
        let raw = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    /// Request against the local client service, authenticated with the
    /// lock file password.
    pub async fn local_request<R>(
        &self,
        api: &ApiInfo,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = Self::local_url(api, path)?;
        let credentials = STANDARD.encode(format!("{}:{}", LOCAL_AUTH_USER, api.password));

        let mut headers = options.headers.clone();
        headers.insert("Authorization".to_string(), format!("Basic {}", credentials));

        self.execute(path, url, headers, options).await
    }

    /// Request against a remote game service, authenticated with the tokens
    /// derived at bootstrap.
    pub async fn remote_request<R>(
        &self,
        ctx: &RemoteContext,
        path: &str,
        options: RequestOptions,
        host: RemoteHost,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.remote_url(&ctx.routing, host, path)?;

        let mut headers = options.headers.clone();
        headers.insert(
            "X-Riot-ClientPlatform".to_string(),
            self.client_platform.clone(),
        );
        headers.insert(
            "X-Riot-ClientVersion".to_string(),
            ctx.identity.client_version.clone(),
        );
        headers.insert(
            "X-Riot-Entitlements-JWT".to_string(),
            ctx.identity.entitlement_token.clone(),
        );
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", ctx.identity.auth_token),
        );

        self.execute(path, url, headers, options).await
    }

    async fn execute<R>(
        &self,
        path: &str,
        mut url: Url,
        headers: HashMap<String, String>,
        options: RequestOptions,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }

        debug!("=== API Request ===");
        debug!("{} {}", options.method, url);

        let response = self
            .transport
            .send(HttpRequest {
                url,
                method: options.method,
                headers,
                body: options.body,
            })
            .await?;

        debug!("=== API Response ===");
        debug!("Status: {}", response.status);

        if response.status != 200 {
            error!(
                "Request to {} failed with status {}: {}",
                path, response.status, response.body
            );
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|source| {
            error!("Failed to decode response from {}: {}", path, source);
            ApiError::Decode {
                path: path.to_string(),
                source,
            }
        })
    }
}
