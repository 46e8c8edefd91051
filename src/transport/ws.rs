//! Socket task: one per connection attempt.

use std::sync::mpsc;

use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::tungstenite::Message;

use crate::core::action::Action;
use crate::core::connection::ConnectionId;
use crate::core::protocol::ClientFrame;
use crate::transport::TransportError;

pub(super) async fn run(
    connection: ConnectionId,
    url: String,
    mut outbound: UnboundedReceiver<ClientFrame>,
    actions: mpsc::Sender<Action>,
) {
    let report = |action: Action| {
        if actions.send(action).is_err() {
            debug!("Transport {}: receiver dropped", connection);
            return false;
        }
        true
    };

    let stream = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            let error = TransportError::Connect(e);
            warn!("Transport {} to {}: {}", connection, url, error);
            report(Action::TransportFailed {
                connection,
                error: error.to_string(),
            });
            return;
        }
    };
    info!("Transport {} open: {}", connection, url);
    if !report(Action::TransportOpened(connection)) {
        return;
    }

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    // Handle closed locally; nobody is listening for a close event.
                    debug!("Transport {}: closing on request", connection);
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!("Transport {}: close frame not sent: {}", connection, e);
                    }
                    return;
                };
                let json = match frame.encode() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Transport {}: dropping frame: {}", connection, e);
                        continue;
                    }
                };
                debug!("Transport {} → {}", connection, json);
                if let Err(e) = write.send(Message::Text(json.into())).await {
                    let error = TransportError::Send(e);
                    warn!("Transport {}: {}", connection, error);
                    report(Action::TransportFailed { connection, error: error.to_string() });
                    return;
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text = text.to_string();
                        debug!("Transport {} ← {}", connection, text);
                        if !report(Action::FrameReceived { connection, text }) {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Transport {} closed by server: {:?}", connection, frame);
                        report(Action::TransportClosed(connection));
                        return;
                    }
                    Some(Ok(_)) => {} // Binary, ping, pong.
                    Some(Err(e)) => {
                        let error = TransportError::Receive(e);
                        warn!("Transport {}: {}", connection, error);
                        report(Action::TransportFailed { connection, error: error.to_string() });
                        return;
                    }
                    None => {
                        info!("Transport {} stream ended", connection);
                        report(Action::TransportClosed(connection));
                        return;
                    }
                }
            }
        }
    }
}
