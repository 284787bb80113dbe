//! Connection lifecycle controller for the controller's event stream.
//!
//! DESIGN
//! ======
//! One [`Controller`] owns one WebSocket connection instance and walks it
//! through `Idle -> Open -> Closed`. `Closed` is terminal: reconnecting means
//! building a fresh controller, which the dashboard does under its reconnect
//! policy.
//!
//! Once open, a spawned link task owns the socket. It decodes every inbound
//! text message and forwards the resulting [`Event`] on the caller's channel,
//! and it writes outbound commands queued by [`Controller::send`]. When the
//! link ends for any reason the task emits a synthetic
//! `ConnectionStatus { connected: false }` before publishing `Closed`, so a
//! consumer sees the disconnect even if the server never pushed one.
//!
//! Opening does not mark the rover connected. The connection flag is the
//! rover's link as reported by the controller, not ours.
//!
//! ERROR HANDLING
//! ==============
//! Decode failures are logged and the message dropped. Sends while not open
//! are ignored and logged at debug. Only [`Controller::open`] returns errors.
//! The handshake is bounded by the connect timeout; a host that accepts TCP
//! but never answers the upgrade fails with [`ConnError::Timeout`].

#[cfg(test)]
#[path = "conn_test.rs"]
mod conn_test;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use wire::{Command, Decoder, Event};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket handshake timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection instance already used (state {0:?})")]
    AlreadyOpened(LinkState),
}

/// Lifecycle of one connection instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    Idle,
    Open,
    Closed,
}

enum Outbound {
    Text(String),
    Close,
}

pub struct Controller {
    url: String,
    decoder: Decoder,
    connect_timeout: Duration,
    state_tx: Option<watch::Sender<LinkState>>,
    state_rx: watch::Receiver<LinkState>,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    task: Option<JoinHandle<()>>,
}

impl Controller {
    #[must_use]
    pub fn new(url: impl Into<String>, decoder: Decoder) -> Self {
        let (state_tx, state_rx) = watch::channel(LinkState::Idle);
        Self {
            url: url.into(),
            decoder,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            state_tx: Some(state_tx),
            state_rx,
            outbound: None,
            task: None,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn state(&self) -> LinkState {
        *self.state_rx.borrow()
    }

    /// Receiver that observes state transitions of this instance.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LinkState> {
        self.state_rx.clone()
    }

    /// Connect and start forwarding decoded events on `events`.
    ///
    /// # Errors
    ///
    /// [`ConnError::AlreadyOpened`] unless the instance is still `Idle`.
    /// [`ConnError::Connect`] if the handshake fails and
    /// [`ConnError::Timeout`] if it does not finish in time; the instance is
    /// then `Closed` without ever having been `Open`.
    pub async fn open(&mut self, events: mpsc::Sender<Event>) -> Result<(), ConnError> {
        let Some(state_tx) = self.state_tx.take() else {
            return Err(ConnError::AlreadyOpened(self.state()));
        };

        let stream = match tokio::time::timeout(self.connect_timeout, connect_async(self.url.as_str())).await {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(error)) => {
                state_tx.send_replace(LinkState::Closed);
                return Err(ConnError::Connect(Box::new(error)));
            }
            Err(_elapsed) => {
                state_tx.send_replace(LinkState::Closed);
                return Err(ConnError::Timeout(self.connect_timeout));
            }
        };
        info!(url = %self.url, "conn: stream open");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        state_tx.send_replace(LinkState::Open);
        self.outbound = Some(outbound_tx);
        self.task = Some(tokio::spawn(run_link(stream, self.decoder, events, outbound_rx, state_tx)));
        Ok(())
    }

    /// Queue a command for the server. Fire-and-forget.
    ///
    /// Returns `false` when the command was not queued because the link is
    /// not open or the command could not be encoded.
    pub fn send(&self, command: &Command) -> bool {
        if self.state() != LinkState::Open {
            debug!(kind = command.kind(), "conn: send ignored, link not open");
            return false;
        }
        let Some(outbound) = &self.outbound else {
            return false;
        };
        let text = match command.to_json() {
            Ok(text) => text,
            Err(error) => {
                debug!(kind = command.kind(), %error, "conn: command encode failed");
                return false;
            }
        };
        let queued = outbound.send(Outbound::Text(text)).is_ok();
        if !queued {
            debug!(kind = command.kind(), "conn: send ignored, link task gone");
        }
        queued
    }

    /// Close the link and wait for the link task to finish.
    ///
    /// No-op unless a link was opened. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(outbound) = self.outbound.take() {
            if self.state() == LinkState::Open && outbound.send(Outbound::Close).is_err() {
                debug!("conn: link task already finished");
            }
        }
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(%error, "conn: link task failed");
            }
        }
    }
}

async fn run_link(
    mut stream: Socket,
    decoder: Decoder,
    events: mpsc::Sender<Event>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    state: watch::Sender<LinkState>,
) {
    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => match decoder.decode(text.as_str()) {
                    Ok(event) => {
                        if events.send(event).await.is_err() {
                            debug!("conn: event receiver dropped, closing");
                            close_stream(&mut stream).await;
                            break;
                        }
                    }
                    Err(error) => warn!(%error, "conn: dropped inbound message"),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "conn: remote closed");
                    break;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    warn!(len = bytes.len(), "conn: dropped binary message");
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(%error, "conn: stream error");
                    break;
                }
                None => {
                    info!("conn: stream ended");
                    break;
                }
            },
            queued = outbound.recv() => match queued {
                Some(Outbound::Text(text)) => {
                    if let Err(error) = stream.send(Message::Text(text.into())).await {
                        debug!(%error, "conn: send failed");
                    }
                }
                Some(Outbound::Close) | None => {
                    close_stream(&mut stream).await;
                    break;
                }
            },
        }
    }

    if events.send(Event::ConnectionStatus { connected: false }).await.is_err() {
        debug!("conn: event receiver dropped before disconnect notice");
    }
    state.send_replace(LinkState::Closed);
}

async fn close_stream(stream: &mut Socket) {
    if let Err(error) = stream.close(None).await {
        debug!(%error, "conn: close handshake failed");
    }
}
