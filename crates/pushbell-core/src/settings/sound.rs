use crate::{CoreResult, PushError};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::debug;

const AUDIO_MIME_PREFIX: &str = "audio/";

/// Check that `path` is an existing audio file.
///
/// The type is guessed from the file extension, the same way file pushes
/// carry a MIME type derived from their name.
#[track_caller]
pub fn validate_sound_file(path: impl AsRef<Path>) -> CoreResult<PathBuf> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)?;

    let found = if metadata.is_dir() {
        "inode/directory".to_string()
    } else {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    };

    if !found.starts_with(AUDIO_MIME_PREFIX) {
        return Err(PushError::InvalidFileType {
            path: path.to_path_buf(),
            expected: AUDIO_MIME_PREFIX.to_string(),
            found,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    debug!(path = ?path, mime = %found, "Sound file accepted");

    Ok(path.to_path_buf())
}
