mod sound;
mod store;

pub use {sound::validate_sound_file, store::SettingsStore};

use std::time::{SystemTime, UNIX_EPOCH};

use toml::{Table, Value};

/// Replay the newest pushes when the application starts.
pub const SHOW_RECENT_PUSHES_ON_STARTUP: &str = "user.show_recent_pushes_on_startup";
/// Play the notification sound.
pub const ENABLE_SOUND: &str = "user.enable_sound";
/// Suppress all notifications.
pub const SNOOZE_NOTIFICATIONS: &str = "user.snooze_notifications";
/// Watermark: `modified` of the most recently displayed push.
pub const LAST_NOTIFICATION: &str = "internal.last_notification";
/// Version that last wrote the settings file.
pub const CURRENT_VERSION: &str = "internal.current_version";
/// Sound file played with each notification.
pub const NOTIFICATION_FILE: &str = "internal.notification_file";

/// How far back the watermark starts on a fresh install.
pub const INITIAL_WATERMARK_AGE_SECS: f64 = 86_400.0;

/// Default settings document.
///
/// The watermark starts one day in the past so a fresh install shows the
/// last day of pushes at most.
pub fn default_settings(version: &str) -> Table {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64().floor())
        .unwrap_or_default();

    let mut user = Table::new();
    user.insert("show_recent_pushes_on_startup".into(), Value::Boolean(true));
    user.insert("enable_sound".into(), Value::Boolean(true));
    user.insert("snooze_notifications".into(), Value::Boolean(false));

    let mut internal = Table::new();
    internal.insert(
        "last_notification".into(),
        Value::Float(now - INITIAL_WATERMARK_AGE_SECS),
    );
    internal.insert("current_version".into(), Value::String(version.into()));

    let mut settings = Table::new();
    settings.insert("user".into(), Value::Table(user));
    settings.insert("internal".into(), Value::Table(internal));
    settings
}
