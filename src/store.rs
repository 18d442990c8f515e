//! Core store type and builder.

use crate::debounce::Debouncer;
use crate::error::Result;
use crate::persist::{atomic_write, encode, ensure_backing_file, load, normalize_path};
use crate::value::coerce;
use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Backing file used when none is configured.
pub const DEFAULT_PATH: &str = "./db.json";

/// Idle delay before a flush when none is configured.
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(5000);

/// Callback invoked with the outcome of every flush attempt.
pub type FlushObserver = Box<dyn Fn(&Result<()>) + Send + Sync>;

// Map contents and the pending-flush flag live under one lock so that
// "update entries, mark dirty, rearm timer" acts as a unit.
struct State {
    entries: HashMap<String, String>,
    dirty: bool,
}

struct Shared {
    state: Mutex<State>,
    path: PathBuf,
    pretty: bool,
    debug: bool,
    on_flush: Option<FlushObserver>,
}

impl Shared {
    /// Snapshot-and-clear under the lock, write outside it.
    fn flush(&self) -> Result<()> {
        let snapshot = {
            let mut state = self.state.lock();
            state.dirty = false;
            state.entries.clone()
        };
        if self.debug {
            debug!(
                "writing {} entries to {}",
                snapshot.len(),
                self.path.display()
            );
        }
        let result =
            encode(&snapshot, self.pretty).and_then(|bytes| atomic_write(&self.path, &bytes));
        if self.debug {
            if let Err(ref e) = result {
                debug!("flush failed: {e}");
            }
        }
        if let Some(ref observer) = self.on_flush {
            observer(&result);
        }
        result
    }

    /// Timer path: skip the write when an explicit flush already ran.
    fn flush_if_dirty(&self) {
        if self.state.lock().dirty {
            let _ = self.flush();
        }
    }
}

/// In-process key-value store mirrored to a JSON file with debounced writes.
///
/// Every mutation restarts a single idle timer; once `flush_delay` passes
/// with no further mutations the whole map is written to disk. Reads touch
/// only memory. Failures to read or write the file are absorbed (logged when
/// `debug` is on) — the in-memory map stays the source of truth.
///
/// A mutation still inside its idle window when the store is dropped or the
/// process exits is lost. Call [`flush_now`](Self::flush_now) when you need
/// the file current.
pub struct DebouncedStore {
    shared: Arc<Shared>,
    worker: Debouncer,
    flush_delay: Duration,
}

impl DebouncedStore {
    /// Open (or create) a store at `path` with the default 5 s flush delay.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::builder().path(path).build()
    }

    /// Open with a specific flush delay. Shorthand for
    /// `builder().path(p).flush_delay(d).build()`.
    #[must_use]
    pub fn open_with_delay(path: impl AsRef<Path>, flush_delay: Duration) -> Self {
        Self::builder().path(path).flush_delay(flush_delay).build()
    }

    /// Start configuring a new store. Call
    /// [`.build()`](DebouncedStoreBuilder::build) when ready.
    #[must_use]
    pub fn builder() -> DebouncedStoreBuilder {
        DebouncedStoreBuilder::new()
    }

    // ---- reads ----

    /// Get the stored string for `key`, or `None` if absent. `Some("")` and
    /// `None` are distinct outcomes.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if self.shared.debug {
            debug!("get {key}");
        }
        self.shared.state.lock().entries.get(key).cloned()
    }

    /// `true` if the key exists.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.shared.state.lock().entries.contains_key(key)
    }

    /// Snapshot of all keys. Order is unspecified.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        if self.shared.debug {
            debug!("listing keys");
        }
        self.shared.state.lock().entries.keys().cloned().collect()
    }

    /// Snapshot of all values. Order is unspecified.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.shared.state.lock().entries.values().cloned().collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.state.lock().entries.len()
    }

    /// `true` when the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized absolute path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// The configured idle delay.
    #[must_use]
    pub fn flush_delay(&self) -> Duration {
        self.flush_delay
    }

    /// `true` while a mutation is waiting for its idle window to elapse.
    #[must_use]
    pub fn has_pending_flush(&self) -> bool {
        self.shared.state.lock().dirty
    }

    // ---- writes ----

    /// Insert or overwrite `key`. Any JSON-representable value is accepted
    /// and coerced to its string form (see [`crate::value::coerce`]), so this
    /// never fails. Restarts the flush timer.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = coerce(&value.into());
        if self.shared.debug {
            debug!("set {key}");
        }
        {
            let mut state = self.shared.state.lock();
            state.entries.insert(key, value);
            state.dirty = true;
        }
        self.worker.poke();
    }

    /// Remove `key`, returning whether it was present. Removing an existing
    /// key restarts the flush timer; removing an absent key is a strict
    /// no-op — no timer is armed.
    pub fn delete(&self, key: &str) -> bool {
        if self.shared.debug {
            debug!("delete {key}");
        }
        {
            let mut state = self.shared.state.lock();
            if state.entries.remove(key).is_none() {
                return false;
            }
            state.dirty = true;
        }
        self.worker.poke();
        true
    }

    /// Drop all entries. Restarts the flush timer unless the store was
    /// already empty.
    pub fn clear(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.entries.is_empty() {
                return;
            }
            state.entries.clear();
            state.dirty = true;
        }
        self.worker.poke();
    }

    // ---- persistence ----

    /// Write the current map to disk immediately (temp-file + rename) and
    /// clear the pending-flush flag, so an already-armed timer that fires
    /// later with nothing new skips its write.
    ///
    /// This is the one place write errors reach the caller; the debounced
    /// path absorbs them.
    pub fn flush_now(&self) -> Result<()> {
        self.shared.flush()
    }
}

impl std::fmt::Debug for DebouncedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedStore")
            .field("path", &self.shared.path)
            .field("flush_delay", &self.flush_delay)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`DebouncedStore`].
///
/// Every option has a default, so `DebouncedStore::builder().build()` gives a
/// store over `./db.json` flushing after 5 s of quiet.
///
/// ```rust,no_run
/// use json_debounce::DebouncedStore;
/// use std::time::Duration;
///
/// let db = DebouncedStore::builder()
///     .path("cache/session")
///     .flush_delay(Duration::from_millis(250))
///     .debug(true)
///     .build();
/// db.set("token", "abc123");
/// ```
pub struct DebouncedStoreBuilder {
    path: PathBuf,
    flush_delay: Duration,
    debug: bool,
    pretty: bool,
    on_flush: Option<FlushObserver>,
}

impl DebouncedStoreBuilder {
    fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            flush_delay: DEFAULT_FLUSH_DELAY,
            debug: false,
            pretty: false,
            on_flush: None,
        }
    }

    /// Backing file location (default `./db.json`). A `.json` suffix is
    /// appended if missing; relative paths resolve against the cwd.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Idle delay before the map is written (default 5000 ms).
    pub fn flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = delay;
        self
    }

    /// Emit diagnostic records through the `log` crate (default off). Purely
    /// observational.
    pub fn debug(mut self, yes: bool) -> Self {
        self.debug = yes;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Observe the outcome of every flush attempt, timer-driven or explicit.
    /// Lets tests assert flush success or failure without scraping logs.
    pub fn on_flush<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Result<()>) + Send + Sync + 'static,
    {
        self.on_flush = Some(Box::new(observer));
        self
    }

    /// Normalize the path, create the file if needed, load whatever is
    /// readable, and start the debounce worker. Never fails: an unusable or
    /// malformed file just means starting empty.
    #[must_use]
    pub fn build(self) -> DebouncedStore {
        let path = normalize_path(&self.path);
        if self.debug {
            debug!("starting store at {}", path.display());
        }

        if let Err(e) = ensure_backing_file(&path) {
            if self.debug {
                debug!("could not create backing file: {e}");
            }
        }

        let entries = match load(&path) {
            Ok(map) => map,
            Err(e) => {
                if self.debug {
                    debug!("could not load {}: {e}; starting empty", path.display());
                }
                HashMap::new()
            }
        };
        if self.debug {
            debug!("store ready with {} entries", entries.len());
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                entries,
                dirty: false,
            }),
            path,
            pretty: self.pretty,
            debug: self.debug,
            on_flush: self.on_flush,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = Debouncer::start(self.flush_delay, move || worker_shared.flush_if_dirty());

        DebouncedStore {
            shared,
            worker,
            flush_delay: self.flush_delay,
        }
    }
}

impl Default for DebouncedStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DebouncedStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedStoreBuilder")
            .field("path", &self.path)
            .field("flush_delay", &self.flush_delay)
            .field("debug", &self.debug)
            .field("pretty", &self.pretty)
            .field("on_flush", &self.on_flush.is_some())
            .finish()
    }
}
