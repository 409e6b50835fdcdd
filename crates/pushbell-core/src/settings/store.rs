//! Write-through settings cache with asynchronous persistence.
//!
//! Reads and writes hit the in-memory TOML document. Every `set` queues a
//! flush; the flusher task coalesces queued flushes and writes the whole
//! document with the temp-file-then-rename pattern. Flush failures are
//! logged and never reach the caller of `set`.

use crate::{CoreResult, PushError};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, Weak},
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, oneshot};
use toml::{Table, Value};
use tracing::{debug, info, instrument, warn};

enum Persist {
    Write,
    Sync(oneshot::Sender<()>),
}

struct Shared {
    path: PathBuf,
    document: RwLock<Table>,
    persist_tx: mpsc::UnboundedSender<Persist>,
}

/// Dotted-key settings store backed by a TOML file.
///
/// Cheap to clone; all clones share one cache and one flusher task.
#[derive(Clone)]
pub struct SettingsStore {
    shared: Arc<Shared>,
}

impl SettingsStore {
    /// Open the store at `path`, filling in missing keys from `defaults`.
    ///
    /// Must be called from within a tokio runtime: the flusher task is
    /// spawned here. The merged document is queued for an initial write.
    #[track_caller]
    #[instrument(skip(defaults))]
    pub fn open(path: PathBuf, defaults: Table) -> CoreResult<Self> {
        let mut document = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| PushError::SettingsIo {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

            contents
                .parse::<Table>()
                .map_err(|e| PushError::SettingsParse {
                    reason: format!("Failed to parse {}: {}", path.display(), e),
                    location: ErrorLocation::from(Location::caller()),
                })?
        } else {
            debug!(path = ?path, "No settings file, starting from defaults");
            Table::new()
        };

        merge_defaults(&mut document, defaults);

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            path: path.clone(),
            document: RwLock::new(document),
            persist_tx,
        });

        tokio::spawn(run_flusher(Arc::downgrade(&shared), persist_rx));

        let store = Self { shared };
        store.queue_write();

        info!(path = ?path, "Settings loaded");

        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Value at a dotted `key`, e.g. `user.enable_sound`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let document = self.shared.document.read().unwrap_or_else(|e| e.into_inner());
        lookup(&document, key).cloned()
    }

    /// Boolean at `key`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Number at `key`; integers are widened.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Float(f) => Some(f),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    /// String at `key`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Set `key` in the cache and queue a flush to disk.
    ///
    /// Intermediate tables are created as needed. Fails only when the key is
    /// malformed or a parent segment holds a non-table value.
    #[track_caller]
    pub fn set(&self, key: &str, value: impl Into<Value>) -> CoreResult<()> {
        let segments: Vec<&str> = key.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(key_error(key, "empty key"));
        };
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(key_error(key, "empty segment"));
        }

        {
            let mut document = self
                .shared
                .document
                .write()
                .unwrap_or_else(|e| e.into_inner());

            let mut table: &mut Table = &mut document;
            for segment in parents {
                let entry = table
                    .entry(segment.to_string())
                    .or_insert(Value::Table(Table::new()));
                table = match entry {
                    Value::Table(child) => child,
                    _ => return Err(key_error(key, &format!("{segment:?} is not a table"))),
                };
            }
            table.insert(last.to_string(), value.into());
        }

        self.queue_write();
        debug!(key, "Setting updated");

        Ok(())
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) -> CoreResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();

        self.shared
            .persist_tx
            .send(Persist::Sync(ack_tx))
            .map_err(|_| PushError::ChannelClosed {
                message: "Settings flusher stopped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        ack_rx.await.map_err(|_| PushError::ChannelClosed {
            message: "Settings flusher dropped flush acknowledgement".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn queue_write(&self) {
        if self.shared.persist_tx.send(Persist::Write).is_err() {
            warn!("Settings flusher stopped, change kept in memory only");
        }
    }
}

async fn run_flusher(shared: Weak<Shared>, mut persist_rx: mpsc::UnboundedReceiver<Persist>) {
    while let Some(first) = persist_rx.recv().await {
        let mut acks = Vec::new();
        let mut pending = Some(first);

        while let Some(request) = pending.take().or_else(|| persist_rx.try_recv().ok()) {
            if let Persist::Sync(ack) = request {
                acks.push(ack);
            }
        }

        if let Some(shared) = shared.upgrade() {
            let path = shared.path.clone();
            let snapshot = shared
                .document
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .clone();
            drop(shared);

            match tokio::task::spawn_blocking(move || write_atomic(&path, &snapshot)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = ?e, "Failed to persist settings"),
                Err(e) => warn!(error = ?e, "Settings write task panicked"),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }

    debug!("Settings flusher stopped");
}

#[track_caller]
fn write_atomic(path: &Path, document: &Table) -> CoreResult<()> {
    let contents = toml::to_string_pretty(document).map_err(|e| PushError::SettingsParse {
        reason: format!("Failed to serialize settings: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let io_error = |e: std::io::Error| PushError::SettingsIo {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = fs::File::create(&temp_path).map_err(io_error)?;
    temp_file.write_all(contents.as_bytes()).map_err(io_error)?;
    temp_file.sync_all().map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)?;

    debug!(path = ?path, "Settings saved (atomic write)");

    Ok(())
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut value = table.get(segments.next()?)?;
    for segment in segments {
        value = value.as_table()?.get(segment)?;
    }
    Some(value)
}

fn merge_defaults(document: &mut Table, defaults: Table) {
    for (key, default) in defaults {
        match (document.get_mut(&key), default) {
            (Some(Value::Table(existing)), Value::Table(nested)) => {
                merge_defaults(existing, nested);
            }
            (Some(_), _) => {}
            (None, default) => {
                document.insert(key, default);
            }
        }
    }
}

#[track_caller]
fn key_error(key: &str, reason: &str) -> PushError {
    PushError::SettingsKey {
        key: key.to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
