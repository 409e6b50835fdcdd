//! Pushbell: tray-resident desktop notifications for your pushes.

mod api_client;
mod app;
mod app_command;
mod config;
mod desktop_notifier;
mod error;
mod icon_cache;
mod logging;
mod sound_player;
mod stream_action;
mod stream_listener;
mod tray_command;
mod tray_icon_state;
mod tray_manager;
mod tray_toggle;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    stream_action::StreamAction,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
    tray_toggle::TrayToggle,
};

use crate::{
    api_client::ApiClient, config::Config, desktop_notifier::DesktopNotifier,
    icon_cache::IconCache, stream_listener::StreamListener, tray_manager::TrayMenuIds,
};

use std::time::Duration;

use pushbell_core::{
    PipelineParts, PushPipeline, SettingsStore, Throttler, default_settings,
    settings::{CURRENT_VERSION, LAST_NOTIFICATION, NOTIFICATION_FILE, validate_sound_file},
};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    let log_dir = Config::log_dir().ok();
    let _log_guard = logging::init_logging(log_dir.as_deref());

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager: Option<TrayManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                let Some(tray) = tray_manager.as_mut() else {
                    return;
                };
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::SetChecked { toggle, checked } => {
                        tray.set_checked(toggle, checked);
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                // Tray must be created after the event loop starts on macOS.
                let tray = match TrayManager::new() {
                    Ok(tm) => tm,
                    Err(e) => {
                        error!("Failed to create TrayManager: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let menu_ids = tray.menu_ids().clone();
                tray_manager = Some(tray);

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let tray_proxy = tray_proxy.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(run_services(config, tray_proxy.clone(), menu_ids));

                    rt.shutdown_timeout(Duration::from_secs(1));
                    let _ = tray_proxy.send_event(TrayCommand::Shutdown);
                });
            }
            _ => {}
        }
    });
}

/// Open settings, start the pipeline and stream listener, then run the app.
async fn run_services(
    config: Config,
    tray_proxy: EventLoopProxy<TrayCommand>,
    menu_ids: TrayMenuIds,
) {
    let settings = match open_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = ?e, "Failed to open settings");
            return;
        }
    };

    let icons = match Config::icon_cache_dir().and_then(IconCache::new) {
        Ok(icons) => icons,
        Err(e) => {
            error!(error = ?e, "Failed to set up icon cache");
            return;
        }
    };

    let (pipeline, pipeline_task) = PushPipeline::spawn(PipelineParts {
        settings: settings.clone(),
        sink: Box::new(DesktopNotifier::new(icons, Handle::current())),
        throttler: Throttler::from_rate(config.notifications.max_per_second),
        max_recent: config.notifications.max_recent,
    });

    let api = if config.stream.has_token() {
        match ApiClient::new(&config.stream) {
            Ok(api) => Some(api),
            Err(e) => {
                error!(error = ?e, "Failed to create API client");
                None
            }
        }
    } else {
        warn!("stream.access_token is empty, push service disabled");
        None
    };

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener = api.as_ref().map(|_| {
        let listener = StreamListener::new(config.stream.websocket_url(), command_tx.clone());
        tokio::spawn(async move {
            if let Err(e) = listener.run(shutdown_rx).await {
                error!(error = ?e, "Stream listener error");
            }
        })
    });

    let app = App {
        pipeline,
        sync_cursor: settings.get_float(LAST_NOTIFICATION).unwrap_or(0.0),
        settings,
        api,
        tray_proxy,
        command_tx,
        command_rx,
        shutdown_tx,
        menu_ids,
        connected: false,
    };

    if let Err(e) = app.run().await {
        error!(error = ?e, "App error");
    }

    if let Some(listener) = listener {
        let _ = listener.await;
    }
    let _ = pipeline_task.await;

    info!("Services stopped");
}

/// Open the settings store, record the running version and the configured
/// notification sound.
fn open_settings(config: &Config) -> AppResult<SettingsStore> {
    let version = env!("CARGO_PKG_VERSION");
    let settings = SettingsStore::open(Config::settings_path()?, default_settings(version))?;
    settings.set(CURRENT_VERSION, version)?;

    if let Some(sound_file) = &config.notifications.sound_file {
        match validate_sound_file(sound_file) {
            Ok(path) => settings.set(NOTIFICATION_FILE, path.to_string_lossy().into_owned())?,
            Err(e) => warn!(error = ?e, "Configured sound file rejected"),
        }
    }

    Ok(settings)
}
