//! In-memory HTTP transport and a local WebSocket server for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

use crate::api::{HttpRequest, HttpResponse, HttpTransport};
use crate::domain::ApiInfo;
use crate::error::TransportError;

pub(crate) const PUUID: &str = "8f3a3c59-0e27-5a2b-9a3e-1d3b0f6a4c11";

pub(crate) fn api_info(port: u16, protocol: &str) -> ApiInfo {
    ApiInfo {
        username: "Riot Client".to_string(),
        process_id: 4242,
        port,
        password: "secret".to_string(),
        protocol: protocol.to_string(),
    }
}

/// Answers requests by URL path and records everything it was sent.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay`, so overlapping calls are observable.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn respond(self, path: &str, status: u16, body: &str) -> Self {
        self.set_route(path, status, body);
        self
    }

    pub(crate) fn set_route(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.path().to_string();
        self.requests.lock().unwrap().push(request);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let route = self.routes.lock().unwrap().get(&path).cloned();
        let (status, body) = route.unwrap_or((404, format!("no route for {}", path)));
        Ok(HttpResponse {
            status,
            body,
            headers: HashMap::new(),
        })
    }
}

/// Plain `ws://` server on an ephemeral loopback port that accepts every
/// handshake and keeps the connections open.
pub(crate) struct WsServer {
    pub(crate) port: u16,
    auth: Arc<Mutex<Vec<String>>>,
}

impl WsServer {
    /// `Authorization` header of every accepted handshake, in order.
    pub(crate) fn auth_headers(&self) -> Vec<String> {
        self.auth.lock().unwrap().clone()
    }
}

pub(crate) async fn spawn_ws_server() -> WsServer {
    spawn_server(false).await
}

/// Like [`spawn_ws_server`], but sends a close frame right after each upgrade.
pub(crate) async fn spawn_closing_ws_server() -> WsServer {
    spawn_server(true).await
}

async fn spawn_server(close_after_upgrade: bool) -> WsServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let auth = Arc::new(Mutex::new(Vec::new()));

    let seen = auth.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let callback = |req: &Request, resp: Response| {
                    let header = req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().unwrap().push(header);
                    Ok(resp)
                };
                if let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await {
                    if close_after_upgrade {
                        let _ = ws.close(None).await;
                    }
                    while let Some(Ok(_)) = ws.next().await {}
                }
            });
        }
    });

    WsServer { port, auth }
}
