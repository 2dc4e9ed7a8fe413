//! Per-connection WebSocket handler.
//!
//! Forwards every hub message to the client as a text frame. Clients do not
//! send application data; inbound text is ignored apart from refreshing the
//! heartbeat. The public contract pings every 5s and considers a connection
//! idle after 10s without client traffic. Tests shorten these intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;
use tracing::{debug, warn};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    updates: broadcast::Receiver<String>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(updates).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HubClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

struct WsSession {
    updates: broadcast::Receiver<String>,
}

impl WsSession {
    fn new(updates: broadcast::Receiver<String>) -> Self {
        Self { updates }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                update = self.updates.recv() => {
                    handle_update(&mut session, update).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(&error);
                if let Some(reason) = close_reason_for(error) {
                    if let Err(error) = session.close(reason).await {
                        warn!(error = %error, "Failed to close WebSocket session");
                    }
                }
                return;
            }
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let message = message
        .ok_or(SessionError::StreamClosed)?
        .map_err(SessionError::Protocol)?;
    *last_heartbeat = Instant::now();
    match message {
        Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
        Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        Message::Text(_)
        | Message::Pong(_)
        | Message::Binary(_)
        | Message::Continuation(_)
        | Message::Nop => Ok(()),
    }
}

async fn handle_update(
    session: &mut Session,
    update: Result<String, RecvError>,
) -> Result<(), SessionError> {
    match update {
        Ok(text) => session.text(text).await.map_err(SessionError::Network),
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "WebSocket client lagging; skipped hub messages");
            Ok(())
        }
        Err(RecvError::Closed) => Err(SessionError::HubClosed),
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::HubClosed => debug!("hub shut down; closing connection"),
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    match error {
        SessionError::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::HubClosed => Some(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("server shutting down".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
