//! Realtime push stream listener.
//!
//! Holds the websocket open, decodes text frames and forwards them to the
//! application. Dropped connections are retried with capped exponential
//! backoff until shutdown is signalled.

use crate::{AppCommand, AppError, AppResult};

use std::{future::Future, panic::Location, time::Duration};

use error_location::ErrorLocation;
use futures_util::{SinkExt, StreamExt};
use pushbell_core::StreamMessage;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

const BASE_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// The server sends a `nop` every 30 seconds; two missed ones mean the
/// connection is dead.
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(90);

/// Delay before reconnect attempt number `failures` (1-based).
pub fn backoff_delay(failures: u32) -> Duration {
    let exponent = failures.saturating_sub(1).min(16);
    BASE_BACKOFF
        .saturating_mul(2u32.saturating_pow(exponent))
        .min(MAX_BACKOFF)
}

enum Disconnect {
    Shutdown,
    Dropped,
}

/// Websocket listener feeding [`AppCommand::Stream`].
pub struct StreamListener {
    url: String,
    command_tx: mpsc::Sender<AppCommand>,
}

impl StreamListener {
    /// Create a listener for the full websocket `url` (token included).
    pub fn new(url: String, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { url, command_tx }
    }

    /// Run until `shutdown_rx` flips to `true` or the application stops
    /// accepting commands.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        // Reset when a session receives a frame, not on connect.
        let mut failures: u32 = 0;

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let connection_id = Uuid::new_v4();

            let outcome = self
                .connect_once(connection_id, &mut shutdown_rx, &mut failures)
                .await;
            failures = failures.saturating_add(1);
            let backoff = backoff_delay(failures);

            match outcome {
                Ok(Disconnect::Shutdown) => break,
                Ok(Disconnect::Dropped) => {
                    info!(
                        connection_id = %connection_id,
                        attempt = failures,
                        backoff_secs = backoff.as_secs(),
                        "Stream closed, will reconnect"
                    );
                }
                Err(e @ AppError::ChannelSendFailed { .. }) => return Err(e),
                Err(e) => {
                    warn!(
                        connection_id = %connection_id,
                        error = %e,
                        attempt = failures,
                        backoff_secs = backoff.as_secs(),
                        "Stream connection failed, will reconnect"
                    );
                }
            }

            self.notify(AppCommand::StreamConnected(false)).await?;

            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Stream listener stopped");

        Ok(())
    }

    async fn connect_once(
        &self,
        connection_id: Uuid,
        shutdown_rx: &mut watch::Receiver<bool>,
        failures: &mut u32,
    ) -> AppResult<Disconnect> {
        debug!(connection_id = %connection_id, "Connecting to push stream");

        let (mut ws, _) = connect_async(self.url.as_str()).await?;

        info!(connection_id = %connection_id, "Push stream connected");
        self.notify(AppCommand::StreamConnected(true)).await?;

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        let _ = ws.close(None).await;
                        return Ok(Disconnect::Shutdown);
                    }
                }
                frame = tokio::time::timeout(KEEPALIVE_TIMEOUT, ws.next()) => {
                    match frame {
                        Ok(Some(Ok(Message::Text(text)))) => {
                            *failures = 0;
                            self.forward(text.as_str()).await?;
                        }
                        Ok(Some(Ok(Message::Ping(data)))) => {
                            *failures = 0;
                            let _ = ws.send(Message::Pong(data)).await;
                        }
                        Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                            return Ok(Disconnect::Dropped);
                        }
                        Ok(Some(Ok(_))) => {}
                        Ok(Some(Err(e))) => return Err(e.into()),
                        Err(_) => {
                            return Err(AppError::StreamError {
                                reason: format!(
                                    "No frame within {}s",
                                    KEEPALIVE_TIMEOUT.as_secs()
                                ),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }
            }
        }
    }

    async fn forward(&self, text: &str) -> AppResult<()> {
        match StreamMessage::parse(text) {
            Ok(StreamMessage::Nop) => {
                trace!("Stream keepalive");
                Ok(())
            }
            Ok(message) => self.notify(AppCommand::Stream(message)).await,
            Err(e) => {
                warn!(error = %e, "Undecodable stream frame dropped");
                Ok(())
            }
        }
    }

    #[track_caller]
    fn notify(&self, command: AppCommand) -> impl Future<Output = AppResult<()>> + '_ {
        let location = ErrorLocation::from(Location::caller());
        async move {
            self.command_tx
                .send(command)
                .await
                .map_err(|e| AppError::ChannelSendFailed {
                    message: format!("Application stopped: {}", e),
                    location,
                })
        }
    }
}
