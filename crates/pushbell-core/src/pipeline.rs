//! Actor owning the push collection and the delivery watermark.
//!
//! All mutation happens on the actor task. Callers talk to it through a
//! [`PipelineHandle`]; paced deliveries report displayed pushes back over a
//! dedicated channel so watermark updates are serialized with everything else.

use crate::{
    CoreResult, PushError,
    notification::{IconLookup, NotificationSink, Presenter},
    push::{PushRecord, PushStore},
    settings::{LAST_NOTIFICATION, SettingsStore},
    throttle::{DeliveryTarget, Throttler},
};

use std::{future::Future, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};

/// Default number of pushes replayed by [`PipelineHandle::deliver_recent`].
pub const DEFAULT_MAX_RECENT: usize = 10;

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Everything the pipeline needs to run.
pub struct PipelineParts {
    /// Settings holding preferences and the watermark.
    pub settings: SettingsStore,
    /// Native notification backend.
    pub sink: Box<dyn NotificationSink>,
    /// Delivery pace.
    pub throttler: Throttler,
    /// How many pushes a cold-start replay shows at most (0 = all).
    pub max_recent: usize,
}

enum PipelineCommand {
    Admit {
        push: PushRecord,
        reply: oneshot::Sender<bool>,
    },
    Seed {
        pushes: Vec<PushRecord>,
    },
    DeliverRecent {
        reply: oneshot::Sender<Option<JoinHandle<usize>>>,
    },
    ShowNow {
        push: PushRecord,
    },
    UpdateLookup {
        lookup: IconLookup,
    },
    Watermark {
        reply: oneshot::Sender<f64>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a running [`PushPipeline`].
#[derive(Clone)]
pub struct PipelineHandle {
    command_tx: mpsc::Sender<PipelineCommand>,
}

impl PipelineHandle {
    /// Store `push`; if its id was unseen, schedule it for display.
    ///
    /// Returns whether the push was new.
    pub async fn admit(&self, push: PushRecord) -> CoreResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(PipelineCommand::Admit { push, reply }).await?;
        Self::receive(rx, "admit").await
    }

    /// Store pushes that predate the live stream without displaying them.
    pub async fn seed(&self, pushes: Vec<PushRecord>) -> CoreResult<()> {
        self.send(PipelineCommand::Seed { pushes }).await
    }

    /// Replay the most recent active pushes not yet delivered.
    ///
    /// Resolves to `None` when nothing was scheduled; otherwise the inner
    /// task yields the delivered count.
    pub async fn deliver_recent(&self) -> CoreResult<Option<JoinHandle<usize>>> {
        let (reply, rx) = oneshot::channel();
        self.send(PipelineCommand::DeliverRecent { reply }).await?;
        Self::receive(rx, "deliver_recent").await
    }

    /// Display `push` immediately, bypassing pacing and the watermark.
    pub async fn show_now(&self, push: PushRecord) -> CoreResult<()> {
        self.send(PipelineCommand::ShowNow { push }).await
    }

    /// Replace the icon lookup tables.
    pub async fn update_lookup(&self, lookup: IconLookup) -> CoreResult<()> {
        self.send(PipelineCommand::UpdateLookup { lookup }).await
    }

    /// Current watermark.
    pub async fn watermark(&self) -> CoreResult<f64> {
        let (reply, rx) = oneshot::channel();
        self.send(PipelineCommand::Watermark { reply }).await?;
        Self::receive(rx, "watermark").await
    }

    /// Stop the actor after flushing settings to disk.
    pub async fn shutdown(&self) -> CoreResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(PipelineCommand::Shutdown { reply }).await?;
        Self::receive(rx, "shutdown").await
    }

    #[track_caller]
    fn send(&self, command: PipelineCommand) -> impl Future<Output = CoreResult<()>> + '_ {
        let location = ErrorLocation::from(Location::caller());
        async move {
            self.command_tx
                .send(command)
                .await
                .map_err(|_| PushError::ChannelClosed {
                    message: "Push pipeline stopped".to_string(),
                    location,
                })
        }
    }

    #[track_caller]
    fn receive<T>(
        rx: oneshot::Receiver<T>,
        operation: &'static str,
    ) -> impl Future<Output = CoreResult<T>> {
        let location = ErrorLocation::from(Location::caller());
        async move {
            rx.await.map_err(|_| PushError::ChannelClosed {
                message: format!("Push pipeline dropped {operation} reply"),
                location,
            })
        }
    }
}

struct DeliveryChannel {
    presenter: Arc<Presenter>,
    watermark_tx: mpsc::UnboundedSender<f64>,
}

impl DeliveryTarget for DeliveryChannel {
    fn display(&self, push: &PushRecord) {
        self.presenter.present(push);
    }

    fn advance_watermark(&self, modified: f64) {
        if self.watermark_tx.send(modified).is_err() {
            warn!(modified, "Push pipeline stopped, watermark not advanced");
        }
    }
}

/// The push pipeline actor.
pub struct PushPipeline {
    store: PushStore,
    settings: SettingsStore,
    presenter: Arc<Presenter>,
    throttler: Throttler,
    max_recent: usize,
    watermark: f64,
    target: Arc<DeliveryChannel>,
    command_rx: mpsc::Receiver<PipelineCommand>,
    watermark_rx: mpsc::UnboundedReceiver<f64>,
}

impl PushPipeline {
    /// Spawn the actor on the current tokio runtime.
    #[instrument(skip(parts))]
    pub fn spawn(parts: PipelineParts) -> (PipelineHandle, JoinHandle<()>) {
        let PipelineParts {
            settings,
            sink,
            throttler,
            max_recent,
        } = parts;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (watermark_tx, watermark_rx) = mpsc::unbounded_channel();

        let presenter = Arc::new(Presenter::new(sink, settings.clone()));
        let watermark = settings.get_float(LAST_NOTIFICATION).unwrap_or(0.0);

        let pipeline = Self {
            store: PushStore::new(),
            settings,
            presenter: Arc::clone(&presenter),
            throttler,
            max_recent,
            watermark,
            target: Arc::new(DeliveryChannel {
                presenter,
                watermark_tx,
            }),
            command_rx,
            watermark_rx,
        };

        info!(watermark, max_recent, "Push pipeline started");

        let handle = tokio::spawn(pipeline.run());

        (PipelineHandle { command_tx }, handle)
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                Some(modified) = self.watermark_rx.recv() => {
                    self.advance_watermark(modified);
                }

                command = self.command_rx.recv() => match command {
                    Some(PipelineCommand::Shutdown { reply }) => {
                        self.flush_settings().await;
                        let _ = reply.send(());
                        info!("Push pipeline shut down");
                        return;
                    }
                    Some(command) => self.handle(command),
                    None => {
                        info!("All pipeline handles dropped, shutting down");
                        break;
                    }
                }
            }
        }

        self.flush_settings().await;
    }

    fn handle(&mut self, command: PipelineCommand) {
        match command {
            PipelineCommand::Admit { push, reply } => {
                let is_new = self.admit(push);
                let _ = reply.send(is_new);
            }
            PipelineCommand::Seed { pushes } => {
                let count = pushes.len();
                for push in pushes {
                    self.store.insert_or_update(push.id.clone(), push);
                }
                debug!(count, total = self.store.len(), "Pushes seeded");
            }
            PipelineCommand::DeliverRecent { reply } => {
                let candidates = self.store.select_recent(self.max_recent);
                let _ = reply.send(self.deliver(candidates));
            }
            PipelineCommand::ShowNow { push } => {
                self.presenter.present(&push);
            }
            PipelineCommand::UpdateLookup { lookup } => {
                self.presenter.set_lookup(lookup);
                debug!("Icon lookup tables updated");
            }
            PipelineCommand::Watermark { reply } => {
                let _ = reply.send(self.watermark);
            }
            PipelineCommand::Shutdown { .. } => {}
        }
    }

    fn admit(&mut self, push: PushRecord) -> bool {
        let is_new = self.store.insert_or_update(push.id.clone(), push.clone());
        if is_new {
            debug!(push_id = %push.id, "New push admitted");
            self.deliver(vec![push]);
        }
        is_new
    }

    fn deliver(&self, candidates: Vec<PushRecord>) -> Option<JoinHandle<usize>> {
        self.throttler
            .deliver(candidates, self.watermark, Arc::clone(&self.target))
    }

    fn advance_watermark(&mut self, modified: f64) {
        if modified <= self.watermark {
            debug!(
                modified,
                watermark = self.watermark,
                "Stale watermark update ignored"
            );
            return;
        }

        self.watermark = modified;
        if let Err(e) = self.settings.set(LAST_NOTIFICATION, modified) {
            warn!(error = ?e, modified, "Failed to persist watermark");
        }
    }

    async fn flush_settings(&self) {
        if let Err(e) = self.settings.flush().await {
            warn!(error = ?e, "Failed to flush settings on shutdown");
        }
    }
}
