use crate::{
    AppCommand, AppError, AppResult, StreamAction, TrayCommand, TrayIconState, TrayToggle,
    api_client::ApiClient, tray_manager::TrayMenuIds,
};

use std::panic::Location;

use error_location::ErrorLocation;
use pushbell_core::{
    PipelineHandle, PushRecord, SettingsStore, StreamMessage,
    settings::{SHOW_RECENT_PUSHES_ON_STARTUP, SNOOZE_NOTIFICATIONS},
};
use tao::event_loop::EventLoopProxy;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Pushes fetched on startup to seed the collection.
const HISTORY_LIMIT: usize = 100;

/// Main application state.
///
/// Runs on the async runtime thread. Communicates tray icon updates
/// back to the main thread via `tray_proxy` because `TrayIcon` is `!Send`
/// and must remain on the UI thread.
pub struct App {
    pub(crate) pipeline: PipelineHandle,
    pub(crate) settings: SettingsStore,
    pub(crate) api: Option<ApiClient>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: TrayMenuIds,
    pub(crate) connected: bool,
    /// Highest `modified` seen from the REST API; next sync starts here.
    pub(crate) sync_cursor: f64,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Pushbell starting");

        self.sync_tray();
        self.load_history().await;

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() returns a crossbeam_channel::Receiver which
        // has a blocking recv(), so one thread forwards events without polling.
        // Shutdown: when tray_event_rx is dropped, blocking_send() fails and
        // the loop exits on the next menu event.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if let Err(e) = self.handle_tray_event(event).await {
                        error!(error = ?e, "Failed to handle tray event");
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Stream(message) => {
                            if let Err(e) = self.handle_stream_message(message).await {
                                error!(error = ?e, "Failed to handle stream message");
                            }
                        }
                        AppCommand::StreamConnected(connected) => {
                            self.set_connected(connected).await;
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        let _ = self.shutdown_tx.send(true);

        if let Err(e) = self.pipeline.shutdown().await {
            error!(error = ?e, "Failed to stop push pipeline cleanly");
        }

        // The forwarder only notices the closed channel on the next menu
        // event, so it is normally still blocked here.
        if tray_handle.is_finished() {
            info!("Tray event forwarder stopped cleanly");
        } else {
            debug!("Tray event forwarder still blocked, will be cleaned up on exit");
        }

        let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
        info!("Pushbell shut down successfully");

        Ok(())
    }

    /// Push check marks and the icon state to the tray.
    fn sync_tray(&self) {
        for toggle in TrayToggle::ALL {
            let checked = self.settings.get_bool(toggle.settings_key()).unwrap_or(false);
            self.send_tray(TrayCommand::SetChecked { toggle, checked });
        }
        self.refresh_icon();
    }

    fn refresh_icon(&self) {
        let snoozed = self.settings.get_bool(SNOOZE_NOTIFICATIONS).unwrap_or(false);
        self.send_tray(TrayCommand::SetState(TrayIconState::resolve(
            self.connected,
            snoozed,
        )));
    }

    fn send_tray(&self, command: TrayCommand) {
        if self.tray_proxy.send_event(command).is_err() {
            warn!(?command, "Tray event loop closed, command dropped");
        }
    }

    /// Fetch lookup tables and push history, then replay recent pushes.
    #[instrument(skip(self))]
    async fn load_history(&mut self) {
        let Some(api) = self.api.clone() else {
            warn!("No access token configured, running without push service");
            return;
        };

        if let Err(e) = self.refresh_lookup().await {
            warn!(error = ?e, "Failed to load lookup tables, using default icons");
        }

        match api.pushes(0.0, HISTORY_LIMIT).await {
            Ok(pushes) => {
                self.advance_cursor(&pushes);
                if let Err(e) = self.pipeline.seed(pushes).await {
                    error!(error = ?e, "Failed to seed push pipeline");
                    return;
                }
            }
            Err(e) => {
                warn!(error = ?e, "Failed to fetch push history");
                return;
            }
        }

        if self
            .settings
            .get_bool(SHOW_RECENT_PUSHES_ON_STARTUP)
            .unwrap_or(false)
        {
            self.deliver_recent().await;
        }
    }

    async fn deliver_recent(&self) {
        match self.pipeline.deliver_recent().await {
            Ok(Some(delivery)) => {
                tokio::spawn(log_delivery(delivery));
            }
            Ok(None) => info!("No recent pushes to show"),
            Err(e) => error!(error = ?e, "Failed to replay recent pushes"),
        }
    }

    /// Fetch pushes changed since the last sync and admit them oldest first.
    #[instrument(skip(self))]
    async fn sync_pushes(&mut self) -> AppResult<()> {
        let Some(api) = self.api.clone() else {
            return Ok(());
        };

        let mut pushes = api.pushes(self.sync_cursor, 0).await?;
        pushes.sort_by(|a, b| a.modified.total_cmp(&b.modified));
        self.advance_cursor(&pushes);

        let mut admitted = 0usize;
        for push in pushes {
            if self.pipeline.admit(push).await? {
                admitted += 1;
            }
        }

        debug!(admitted, cursor = self.sync_cursor, "Pushes synced");

        Ok(())
    }

    fn advance_cursor(&mut self, pushes: &[PushRecord]) {
        self.sync_cursor = pushes
            .iter()
            .map(|push| push.modified)
            .fold(self.sync_cursor, f64::max);
    }

    #[instrument(skip(self))]
    async fn handle_stream_message(&mut self, message: StreamMessage) -> AppResult<()> {
        match StreamAction::for_message(message) {
            StreamAction::SyncPushes => self.sync_pushes().await,
            StreamAction::RefreshLookup => self.refresh_lookup().await,
            StreamAction::ShowNow(push) => Ok(self.pipeline.show_now(push).await?),
            StreamAction::Ignore => Ok(()),
        }
    }

    /// Refetch the icon lookup tables after a device, grant or account change.
    #[instrument(skip(self))]
    async fn refresh_lookup(&self) -> AppResult<()> {
        let Some(api) = self.api.as_ref() else {
            return Ok(());
        };

        let lookup = api.lookup_tables().await?;
        self.pipeline.update_lookup(lookup).await?;
        debug!("Lookup tables refreshed");

        Ok(())
    }

    async fn set_connected(&mut self, connected: bool) {
        if self.connected == connected {
            return;
        }
        self.connected = connected;
        self.refresh_icon();

        if connected {
            // Catch up on anything pushed while offline.
            if let Err(e) = self.sync_pushes().await {
                warn!(error = ?e, "Failed to sync pushes after reconnect");
            }
        }
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> AppResult<()> {
        let event_id = &event.id;

        if *event_id == self.menu_ids.show_recent {
            info!("Recent pushes requested from tray menu");
            self.deliver_recent().await;
        } else if *event_id == self.menu_ids.quit {
            info!("Quit requested from tray menu");
            self.command_tx
                .send(AppCommand::Shutdown)
                .await
                .map_err(|e| AppError::ChannelSendFailed {
                    message: format!("Failed to send shutdown command: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        } else if let Some(toggle) = self.menu_ids.toggle_for(event_id) {
            self.flip(toggle)?;
        }

        Ok(())
    }

    /// Invert a boolean preference and sync the tray with the new value.
    #[track_caller]
    fn flip(&self, toggle: TrayToggle) -> AppResult<()> {
        let key = toggle.settings_key();
        let checked = !self.settings.get_bool(key).unwrap_or(false);

        self.settings.set(key, checked)?;
        info!(?toggle, checked, "Preference toggled");

        self.send_tray(TrayCommand::SetChecked { toggle, checked });
        if toggle == TrayToggle::Snooze {
            self.refresh_icon();
        }

        Ok(())
    }
}

async fn log_delivery(delivery: JoinHandle<usize>) {
    match delivery.await {
        Ok(count) => info!(count, "Recent pushes shown"),
        Err(e) => error!(error = ?e, "Recent push delivery task failed"),
    }
}
