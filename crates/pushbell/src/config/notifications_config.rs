use crate::config::{
    DEFAULT_MAX_PER_SECOND, DEFAULT_MAX_RECENT, default_max_per_second, default_max_recent,
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Notification pacing and sound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Notifications shown per second at most.
    #[serde(default = "default_max_per_second")]
    pub max_per_second: f64,

    /// Pushes replayed on startup at most (0 = all).
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,

    /// Custom notification sound; must be an audio file.
    #[serde(default)]
    pub sound_file: Option<PathBuf>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_per_second: DEFAULT_MAX_PER_SECOND,
            max_recent: DEFAULT_MAX_RECENT,
            sound_file: None,
        }
    }
}
