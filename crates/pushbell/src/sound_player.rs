//! Notification sound playback.

use crate::{AppError, AppResult};

use std::{fs::File, io::BufReader, panic::Location, path::Path, path::PathBuf};

use error_location::ErrorLocation;
use rodio::{Decoder, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

/// Playback volume relative to the source file.
pub const NOTIFICATION_VOLUME: f32 = 0.5;

/// Play `path` on a background thread and return immediately.
///
/// Playback failures are logged; a missing sound never blocks a
/// notification.
pub fn play_in_background(path: PathBuf) {
    let spawned = std::thread::Builder::new()
        .name("pushbell-sound".to_string())
        .spawn(move || {
            if let Err(e) = play_blocking(&path) {
                warn!(error = ?e, path = ?path, "Failed to play notification sound");
            }
        });

    if let Err(e) = spawned {
        warn!(error = ?e, "Failed to spawn sound thread");
    }
}

#[track_caller]
fn play_blocking(path: &Path) -> AppResult<()> {
    let file = File::open(path)?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| AppError::IoError {
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Output stream must stay alive until playback ends.
    let mut stream = OutputStreamBuilder::open_default_stream().map_err(|e| AppError::IoError {
        source: std::io::Error::other(format!("Failed to open audio output: {}", e)),
        location: ErrorLocation::from(Location::caller()),
    })?;
    stream.log_on_drop(false);

    let sink = Sink::connect_new(stream.mixer());
    prepare_sink(&sink);
    sink.append(source);
    sink.sleep_until_end();

    debug!(path = ?path, "Notification sound played");

    Ok(())
}

/// Apply playback settings shared by every notification sound.
pub fn prepare_sink(sink: &Sink) {
    sink.set_volume(NOTIFICATION_VOLUME);
}
