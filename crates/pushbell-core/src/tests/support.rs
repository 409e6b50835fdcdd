use crate::{
    CoreResult, Notification, NotificationSink, PushError, PushKind, PushRecord, SettingsStore,
    default_settings,
};

use std::{
    panic::Location,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;
use tempfile::TempDir;

pub(crate) const TEST_VERSION: &str = "0.0.0-test";

/// Active note push with identical created/modified timestamps.
pub(crate) fn note(id: &str, created: f64) -> PushRecord {
    PushRecord {
        id: id.to_string(),
        kind: PushKind::Note,
        created,
        modified: created,
        active: true,
        title: Some(format!("Note {id}")),
        body: Some(format!("Body {id}")),
        ..PushRecord::default()
    }
}

/// Sink that records every notification it is asked to show.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    pub(crate) shown: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub(crate) fn titles(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, notification: &Notification) -> CoreResult<()> {
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Sink that always fails.
pub(crate) struct FailingSink;

impl NotificationSink for FailingSink {
    fn show(&self, _notification: &Notification) -> CoreResult<()> {
        Err(PushError::Display {
            reason: "no notification server".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Settings store in a fresh temp dir. Keep the `TempDir` alive.
pub(crate) fn temp_settings() -> (TempDir, PathBuf, SettingsStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let store = SettingsStore::open(path.clone(), default_settings(TEST_VERSION)).unwrap();
    (dir, path, store)
}
