//! Turns pushes into displayed notifications.

use crate::{
    CoreResult,
    notification::{IconLookup, Notification, TagDictionary, to_notification},
    push::PushRecord,
    settings::{ENABLE_SOUND, NOTIFICATION_FILE, SNOOZE_NOTIFICATIONS, SettingsStore},
};

use std::{path::PathBuf, sync::RwLock};

use tracing::{debug, instrument, warn};

/// Native notification backend.
pub trait NotificationSink: Send + Sync + 'static {
    /// Display `notification`.
    fn show(&self, notification: &Notification) -> CoreResult<()>;
}

/// Decides whether a push is shown and hands it to the sink.
pub struct Presenter {
    sink: Box<dyn NotificationSink>,
    settings: SettingsStore,
    tags: TagDictionary,
    lookup: RwLock<IconLookup>,
}

impl Presenter {
    /// Create a presenter with the default tag dictionary and empty lookups.
    pub fn new(sink: Box<dyn NotificationSink>, settings: SettingsStore) -> Self {
        Self {
            sink,
            settings,
            tags: TagDictionary::default(),
            lookup: RwLock::new(IconLookup::default()),
        }
    }

    /// Replace the icon lookup tables.
    pub fn set_lookup(&self, lookup: IconLookup) {
        let mut current = self.lookup.write().unwrap_or_else(|e| e.into_inner());
        *current = lookup;
    }

    /// Show `push` unless snoozed or ineligible. Returns whether it was shown.
    #[instrument(skip(self, push), fields(push_id = %push.id))]
    pub fn present(&self, push: &PushRecord) -> bool {
        if self.settings.get_bool(SNOOZE_NOTIFICATIONS).unwrap_or(false) {
            debug!("Notifications snoozed, push not shown");
            return false;
        }

        if !push.active && !push.is_mirror() {
            debug!("Inactive push not shown");
            return false;
        }

        let mut notification = {
            let lookup = self.lookup.read().unwrap_or_else(|e| e.into_inner());
            to_notification(push, &lookup, &self.tags)
        };
        notification.sound = self.sound_file();

        match self.sink.show(&notification) {
            Ok(()) => {
                debug!(title = %notification.title, "Notification shown");
                true
            }
            Err(e) => {
                warn!(error = ?e, "Failed to show notification");
                false
            }
        }
    }

    fn sound_file(&self) -> Option<PathBuf> {
        if !self.settings.get_bool(ENABLE_SOUND).unwrap_or(false) {
            return None;
        }
        self.settings
            .get_string(NOTIFICATION_FILE)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }
}
