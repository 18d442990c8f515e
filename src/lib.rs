//! In-process key-value store mirrored to a JSON file with debounced writes.
//!
//! Mutations land in memory immediately and (re)arm a single idle timer;
//! once the configured delay passes with no further mutations, the whole
//! map is written to the backing file. Rapid bursts of writes therefore
//! cost one disk write, not one per call.
//!
//! ```rust,no_run
//! use json_debounce::DebouncedStore;
//! use std::time::Duration;
//!
//! let db = DebouncedStore::open_with_delay("db.json", Duration::from_millis(100));
//! db.set("hello", "world");
//! db.set("answer", 42); // coerced to "42"
//! assert_eq!(db.get("hello").as_deref(), Some("world"));
//! ```
//!
//! **Durability is best-effort.** A mutation whose idle window has not
//! elapsed when the process exits is lost; call
//! [`flush_now`](DebouncedStore::flush_now) when the file must be current.
//!
//! **Single-process only.** If multiple processes open the same file they
//! will clobber each other. Use advisory file locking or a real database for
//! multi-process access.

#![deny(missing_docs)]
#![warn(clippy::all)]

mod debounce;
pub mod error;
pub mod persist;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use store::{
    DebouncedStore, DebouncedStoreBuilder, FlushObserver, DEFAULT_FLUSH_DELAY, DEFAULT_PATH,
};
