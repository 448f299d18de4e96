use crate::error::ServerError;
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use stockcorr_core::Ticker;
use stockcorr_feed::{DashboardCommand, DashboardEvent, DashboardState};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{
        broadcast,
        mpsc::{self, error::TrySendError},
        watch,
    },
};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Channels shared by every client connection.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub events_tx: broadcast::Sender<DashboardEvent>,
    pub state_tx: Arc<watch::Sender<DashboardState>>,
    pub available: Arc<[Ticker]>,
    /// Replies queued per client before further replies are dropped.
    pub reply_buffer: usize,
}

impl ServerContext {
    pub fn new(
        events_tx: broadcast::Sender<DashboardEvent>,
        state_tx: watch::Sender<DashboardState>,
        available: Vec<Ticker>,
        reply_buffer: usize,
    ) -> Self {
        Self {
            events_tx,
            state_tx: Arc::new(state_tx),
            available: available.into(),
            reply_buffer: reply_buffer.max(1),
        }
    }
}

/// Message addressed to a single client, as opposed to broadcast [`DashboardEvent`]s.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        message: String,
        timestamp: DateTime<Utc>,
        available: Vec<Ticker>,
        state: DashboardState,
    },
    Accepted {
        state: DashboardState,
    },
    Rejected {
        message: String,
    },
}

impl ServerMessage {
    pub fn welcome(context: &ServerContext) -> Self {
        Self::Welcome {
            message: "Connected to stockcorr dashboard feed".to_string(),
            timestamp: Utc::now(),
            available: context.available.to_vec(),
            state: context.state_tx.borrow().clone(),
        }
    }
}

/// Parse a client text frame as a [`DashboardCommand`] and apply it to the shared state.
///
/// Unparseable frames are ignored and yield `None`. A state change wakes every poller.
pub fn handle_command(
    state_tx: &watch::Sender<DashboardState>,
    available: &[Ticker],
    text: &str,
) -> Option<ServerMessage> {
    let command = match serde_json::from_str::<DashboardCommand>(text) {
        Ok(command) => command,
        Err(error) => {
            debug!(%error, text, "ignoring unparseable client command");
            return None;
        }
    };

    debug!(?command, "applying client command");

    let mut outcome = Ok(());
    state_tx.send_if_modified(|state| {
        let before = state.clone();
        outcome = state.apply(command, available);
        outcome.is_ok() && *state != before
    });

    let reply = match outcome {
        Ok(()) => ServerMessage::Accepted {
            state: state_tx.borrow().clone(),
        },
        Err(error) => {
            debug!(%error, "rejected client command");
            ServerMessage::Rejected {
                message: error.to_string(),
            }
        }
    };

    Some(reply)
}

/// Queue a reply for the client's send task, dropping it if the client is not draining replies.
///
/// Returns `false` once the send task has stopped.
fn queue_reply(
    reply_tx: &mpsc::Sender<ServerMessage>,
    reply: ServerMessage,
    peer_addr: SocketAddr,
) -> bool {
    match reply_tx.try_send(reply) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(%peer_addr, "client reply queue full, dropping reply");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, "dashboard server bound");
    Ok(listener)
}

/// Accept WebSocket clients until the listener fails.
pub async fn serve(listener: TcpListener, context: ServerContext) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                info!(%peer_addr, "new WebSocket connection");
                tokio::spawn(handle_client(stream, peer_addr, context.clone()));
            }
            Err(error) => {
                error!(%error, "failed to accept WebSocket connection");
                break;
            }
        }
    }
}

async fn handle_client(stream: TcpStream, peer_addr: SocketAddr, context: ServerContext) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(error) => {
            error!(%peer_addr, %error, "WebSocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut events_rx = context.events_tx.subscribe();
    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(context.reply_buffer);

    if let Ok(welcome) = serde_json::to_string(&ServerMessage::welcome(&context)) {
        if ws_sender.send(Message::Text(welcome.into())).await.is_err() {
            return;
        }
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let json = tokio::select! {
                event = events_rx.recv() => match event {
                    Ok(event) => serde_json::to_string(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%peer_addr, skipped, "client lagged behind dashboard events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!(%peer_addr, "dashboard event channel closed");
                        break;
                    }
                },
                reply = reply_rx.recv() => match reply {
                    Some(reply) => serde_json::to_string(&reply),
                    None => break,
                },
            };

            match json {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(error) => warn!(%peer_addr, %error, "failed to serialise outgoing message"),
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = ws_receiver.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let reply = handle_command(&context.state_tx, &context.available, text.as_str());
                    if let Some(reply) = reply {
                        if !queue_reply(&reply_tx, reply, peer_addr) {
                            break;
                        }
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    error!(%peer_addr, %error, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!(%peer_addr, "send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!(%peer_addr, "receive task completed");
            send_task.abort();
        }
    }

    info!(%peer_addr, "WebSocket connection closed");
}
