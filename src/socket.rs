//! Authenticated WebSocket to the local client service.
//!
//! The connection is opened once per bootstrap and held open. Event
//! subscription is not implemented; incoming frames are drained and the
//! handle only tracks whether the channel is still alive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::api::LOCAL_AUTH_USER;
use crate::domain::ApiInfo;
use crate::error::ConnectError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open, authenticated socket to the local client.
///
/// A background task owns the stream. It answers control frames and drops
/// the open flag once the peer closes or the connection fails.
pub struct SocketHandle {
    port: u16,
    open: Arc<AtomicBool>,
    shutdown: Option<oneshot::Sender<()>>,
    reader: Option<JoinHandle<()>>,
}

impl SocketHandle {
    fn spawn(port: u16, stream: WsStream) -> Self {
        let open = Arc::new(AtomicBool::new(true));
        let (shutdown, shutdown_rx) = oneshot::channel();
        let reader = tokio::spawn(read_until_closed(port, stream, open.clone(), shutdown_rx));
        Self {
            port,
            open,
            shutdown: Some(shutdown),
            reader: Some(reader),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// False once the peer has closed the socket or `close()` was called.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Send a close frame and stop the reader. Safe to call twice.
    pub async fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(reader) = self.reader.take() {
            if let Err(e) = reader.await {
                debug!("Socket reader on port {} ended abnormally: {}", self.port, e);
            }
            info!("Closed local socket on port {}", self.port);
        }
        self.open.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketHandle")
            .field("port", &self.port)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Drain the stream until the peer hangs up or the handle asks to stop.
/// A dropped handle counts as a stop request.
async fn read_until_closed(
    port: u16,
    mut stream: WsStream,
    open: Arc<AtomicBool>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = stream.close(None).await {
                    debug!("Error closing socket on port {}: {}", port, e);
                }
                break;
            }
            msg = stream.next() => match msg {
                Some(Ok(Message::Close(frame))) => {
                    info!("Local socket on port {} closed by peer: {:?}", port, frame);
                    open.store(false, Ordering::SeqCst);
                }
                // Pings are answered by tungstenite on the next read.
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => break,
                Some(Err(e)) => {
                    warn!("Local socket on port {} failed: {}", port, e);
                    break;
                }
            }
        }
    }
    open.store(false, Ordering::SeqCst);
}

fn socket_url(api: &ApiInfo) -> String {
    let scheme = if api.is_secure() { "wss" } else { "ws" };
    format!("{}://127.0.0.1:{}", scheme, api.port)
}

/// Whether a handshake error means the peer went away before the upgrade.
fn closed_before_open(err: &WsError) -> bool {
    match err {
        WsError::ConnectionClosed | WsError::AlreadyClosed => true,
        WsError::Io(io) => matches!(
            io.kind(),
            std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
        ),
        WsError::Protocol(ProtocolError::HandshakeIncomplete) => true,
        _ => false,
    }
}

/// Open the socket and resolve once the handshake completes.
///
/// Fails on handshake error, on the peer closing before the upgrade, or when
/// `limit` elapses. Dropping the returned future abandons the handshake and
/// closes the underlying connection.
pub async fn connect(api: &ApiInfo, limit: Duration) -> Result<SocketHandle, ConnectError> {
    let url = socket_url(api);

    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| ConnectError::InvalidRequest(e.to_string()))?;
    let credentials = STANDARD.encode(format!("{}:{}", LOCAL_AUTH_USER, api.password));
    let auth = HeaderValue::from_str(&format!("Basic {}", credentials))
        .map_err(|e| ConnectError::InvalidRequest(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, auth);

    let connector = if api.is_secure() {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ConnectError::Tls)?;
        Some(Connector::NativeTls(tls))
    } else {
        None
    };

    debug!("Opening local socket at {}", url);

    let (stream, _response) = timeout(
        limit,
        connect_async_tls_with_config(request, None, false, connector),
    )
    .await
    .map_err(|_| ConnectError::Timeout(api.port))?
    .map_err(|e| {
        if closed_before_open(&e) {
            warn!("Local socket on port {} closed before opening: {}", api.port, e);
            ConnectError::ClosedBeforeOpen
        } else {
            warn!("Local socket handshake on port {} failed: {}", api.port, e);
            ConnectError::Handshake(Box::new(e))
        }
    })?;

    info!("Local socket open on port {}", api.port);
    Ok(SocketHandle::spawn(api.port, stream))
}
