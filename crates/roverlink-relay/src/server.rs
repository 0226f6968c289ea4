//! [`RelayServer`] – WebSocket front door for browser clients.
//!
//! Listens on `0.0.0.0:8080` (configurable via [`RelayServer::with_port`]).
//! Every accepted connection gets its own task running a
//! [`tokio::select!`] bridge between the client socket and the
//! [`RelayBus`][crate::bus::RelayBus]: inbound text frames are parsed and
//! routed, outbound bus frames are forwarded unless this connection was
//! their origin.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use roverlink_types::{ClientEvent, RobotCommand, RoverError, ServerEvent};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::bus::Outbound;
use crate::context::AppContext;
use crate::router::CommandRouter;

/// Default TCP port for the relay.
pub const DEFAULT_PORT: u16 = 8080;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// WebSocket server bridging browser clients to the rover.
pub struct RelayServer {
    ctx: Arc<AppContext>,
    port: u16,
}

impl RelayServer {
    /// Create a server over `ctx` on the [`DEFAULT_PORT`].
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            port: DEFAULT_PORT,
        }
    }

    /// Override the listening port (builder-style).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bind the configured port and serve forever.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Channel`] if the TCP listener cannot bind.
    pub async fn run(self) -> Result<(), RoverError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RoverError::Channel(format!("bind error on {addr}: {e}")))?;
        self.run_on(listener).await
    }

    /// Serve on an already-bound listener. Lets tests bind port 0 and learn
    /// the real address before starting the accept loop.
    pub async fn run_on(self, listener: TcpListener) -> Result<(), RoverError> {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "relay listening");
        }

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, ctx).await {
                            warn!(%peer, error = %e, "client session ended with error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Per-connection handler
// ---------------------------------------------------------------------------

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: Arc<AppContext>,
) -> Result<(), RoverError> {
    let ws_stream = accept_async(stream)
        .await
        .map_err(|e| RoverError::Channel(format!("WS handshake with {peer}: {e}")))?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    let client_id = Uuid::new_v4();
    let mut bus_rx = ctx.bus.subscribe();
    let router = CommandRouter::new(Arc::clone(&ctx));
    info!(%peer, %client_id, "client connected");

    // One-time greeting, to this client only.
    send(&mut ws_tx, &ServerEvent::greeting()).await?;

    loop {
        tokio::select! {
            // ── Downstream: bus → browser ──────────────────────────────────
            frame = bus_rx.recv() => match frame {
                Ok(Outbound { origin, event }) => {
                    if origin == Some(client_id) {
                        // The fire node never hears its own broadcast.
                        continue;
                    }
                    if send(&mut ws_tx, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(%client_id, lagged_by = n, "slow client dropped frames");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            // ── Upstream: browser → relay ──────────────────────────────────
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    handle_client_frame(&router, client_id, text.as_str(), &mut ws_tx).await?;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    debug!(%client_id, error = %e, "socket error");
                    break;
                }
                _ => {} // binary / ping / pong are ignored
            },
        }
    }

    info!(%client_id, "client disconnected");
    Ok(())
}

// ---------------------------------------------------------------------------
// Upstream frame handling
// ---------------------------------------------------------------------------

/// Parse one inbound text frame and act on it.
///
/// A frame that fails to parse – unknown event name, malformed command
/// string, servo fault – is answered with a `robot error` event to the
/// sender only; it never reaches an actuator and never tears the session
/// down.
async fn handle_client_frame(
    router: &CommandRouter,
    client_id: Uuid,
    text: &str,
    ws_tx: &mut WsSink,
) -> Result<(), RoverError> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            debug!(%client_id, error = %e, "unparseable client frame");
            return send(
                ws_tx,
                &ServerEvent::Error {
                    data: format!("unrecognized event: {e}"),
                },
            )
            .await;
        }
    };

    match event {
        ClientEvent::Command { data } => {
            debug!(%client_id, command = %data, "robot command");
            let outcome = match RobotCommand::parse(&data) {
                Ok(cmd) => router.route(client_id, cmd).await,
                Err(e) => Err(RoverError::from(e)),
            };
            if let Err(e) = outcome {
                warn!(%client_id, command = %data, error = %e, "command rejected");
                send(
                    ws_tx,
                    &ServerEvent::Error {
                        data: e.to_string(),
                    },
                )
                .await?;
            }
        }
        ClientEvent::Update { data } => {
            router.relay_status(client_id, data);
        }
    }
    Ok(())
}

async fn send(ws_tx: &mut WsSink, event: &ServerEvent) -> Result<(), RoverError> {
    let json = serde_json::to_string(event)
        .map_err(|e| RoverError::Channel(format!("serialize event: {e}")))?;
    ws_tx
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| RoverError::Channel(format!("socket send: {e}")))
}
