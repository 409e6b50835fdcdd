//! Native desktop notifications via the platform notification server.

use crate::{icon_cache, icon_cache::IconCache, sound_player};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use pushbell_core::{CoreResult, Notification, NotificationSink, PushError};
use tokio::runtime::Handle;
use tracing::{Instrument, debug, instrument, warn};

const APP_NAME: &str = "Pushbell";

/// [`NotificationSink`] backed by `notify-rust`.
///
/// Inline and remote icons are cached to local files first, so display
/// happens on the runtime rather than on the caller. Sounds are played by
/// the application so the server's own sound is suppressed where the
/// platform allows it.
pub struct DesktopNotifier {
    icons: Arc<IconCache>,
    runtime: Handle,
}

impl DesktopNotifier {
    /// Create a notifier that resolves icons on `runtime`.
    pub fn new(icons: IconCache, runtime: Handle) -> Self {
        Self {
            icons: Arc::new(icons),
            runtime,
        }
    }
}

impl NotificationSink for DesktopNotifier {
    #[instrument(skip(self, notification), fields(tag = ?notification.tag))]
    fn show(&self, notification: &Notification) -> CoreResult<()> {
        let notification = notification.clone();
        let icons = Arc::clone(&self.icons);

        self.runtime.spawn(
            async move {
                let icon = local_icon(&icons, notification.icon.as_deref()).await;

                let shown = tokio::task::spawn_blocking(move || {
                    display(&notification, icon.as_deref())
                })
                .await;

                match shown {
                    Ok(Ok(())) => debug!("Notification shown"),
                    Ok(Err(e)) => warn!(error = ?e, "Failed to show notification"),
                    Err(e) => warn!(error = ?e, "Notification task failed"),
                }
            }
            .in_current_span(),
        );

        Ok(())
    }
}

/// Icon usable by the notification server: a cached file for inline and
/// remote images, anything else as given.
async fn local_icon(icons: &IconCache, icon: Option<&str>) -> Option<String> {
    match icon {
        Some(icon) if icon_cache::is_cacheable(icon) => match icons.resolve(icon).await {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                warn!(error = ?e, "Failed to cache notification icon");
                None
            }
        },
        other => other.map(str::to_string),
    }
}

fn display(notification: &Notification, icon: Option<&str>) -> CoreResult<()> {
    let mut native = notify_rust::Notification::new();
    native
        .appname(APP_NAME)
        .summary(&notification.title)
        .body(&notification.body);

    match icon {
        Some(icon) => {
            native.icon(icon);
        }
        None => {
            native.auto_icon();
        }
    }

    show_native(&mut native, notification)?;

    if let Some(sound) = &notification.sound {
        sound_player::play_in_background(sound.clone());
    }

    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
#[track_caller]
fn show_native(
    native: &mut notify_rust::Notification,
    notification: &Notification,
) -> CoreResult<()> {
    use notify_rust::Hint;

    native.hint(Hint::SuppressSound(notification.silent));
    if notification.url.is_some() {
        native.action("default", "Open");
    }

    let handle = native.show().map_err(display_error)?;

    if let Some(url) = notification.url.clone() {
        // Waiting for the click blocks until the notification closes.
        std::thread::spawn(move || {
            handle.wait_for_action(|action| {
                if action == "default" {
                    if let Err(e) = open::that(&url) {
                        warn!(error = ?e, url = %url, "Failed to open push URL");
                    }
                }
            });
        });
    }

    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
#[track_caller]
fn show_native(
    native: &mut notify_rust::Notification,
    _notification: &Notification,
) -> CoreResult<()> {
    native.show().map(|_| ()).map_err(display_error)
}

#[track_caller]
fn display_error(e: notify_rust::error::Error) -> PushError {
    PushError::Display {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
