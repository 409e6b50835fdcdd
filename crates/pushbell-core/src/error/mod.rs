use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Push pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum PushError {
    /// Settings file could not be read or written.
    #[error("Settings IO error: {source} {location}")]
    SettingsIo {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Settings file exists but is not valid TOML.
    #[error("Failed to parse settings: {reason} {location}")]
    SettingsParse {
        /// Description of the parse failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A dotted settings key cannot be resolved or assigned.
    #[error("Invalid settings key {key:?}: {reason} {location}")]
    SettingsKey {
        /// The dotted key, e.g. `user.enable_sound`.
        key: String,
        /// Why the key was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A realtime stream frame is not valid JSON for any known message.
    #[error("Failed to decode stream message: {source} {location}")]
    StreamDecode {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A file does not have the expected MIME type.
    #[error("Invalid file type for {path:?}: expected {expected}, found {found} {location}")]
    InvalidFileType {
        /// Path of the rejected file.
        path: PathBuf,
        /// Expected MIME type prefix.
        expected: String,
        /// MIME type that was detected.
        found: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Generic filesystem error.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The pipeline actor or settings flusher is gone.
    #[error("Channel closed: {message} {location}")]
    ChannelClosed {
        /// What was being sent or awaited.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The notification sink refused a notification.
    #[error("Failed to display notification: {reason} {location}")]
    Display {
        /// Description of the display failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for PushError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        PushError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for PushError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        PushError::StreamDecode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`PushError`].
pub type Result<T> = std::result::Result<T, PushError>;
