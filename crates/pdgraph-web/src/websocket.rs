//! WebSocket feed of status-changed signals.
//!
//! A client first receives the current status, then one message per
//! configuration update until either side closes.

use axum::{
    extract::{
        ws::{Message, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use pdgraph_core::StatusChanged;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| {
        let (sink, stream) = socket.split();
        status_feed(sink, stream, state)
    })
}

fn frame(signal: &StatusChanged) -> Option<Message> {
    match serde_json::to_string(signal) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!(error = %e, "Failed to encode status signal");
            None
        }
    }
}

/// Relay status signals to `sink` until the client side of `stream` ends.
async fn status_feed<S, R, E>(mut sink: S, mut stream: R, state: AppState)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    // Subscribe before reading the snapshot so no update falls in between.
    let mut signals = state.config().subscribe();

    info!("Status feed client connected");

    let current = StatusChanged {
        status: state.config().status(),
    };
    if let Some(message) = frame(&current) {
        if sink.send(message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Ok(signal) => {
                    let Some(message) = frame(&signal) else { continue };
                    if sink.send(message).await.is_err() {
                        debug!("Status feed send failed");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Status feed client lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Status feed client disconnected");
}
