//! The debounce worker: one background thread modelling the flush timer.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Background thread that runs a flush closure after a quiet window.
///
/// Each [`poke`](Debouncer::poke) opens (or restarts) a window of `delay`.
/// Only when a full window elapses with no further pokes does the closure
/// run, so rapid mutations coalesce into a single flush. At most one window
/// is ever open. Joins the thread on drop so nothing leaks; a window still
/// open at drop is abandoned without flushing.
pub(crate) struct Debouncer {
    tx: Option<mpsc::Sender<()>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl Debouncer {
    /// Spawn the worker. The channel is unbounded, so a poke never blocks
    /// the mutating caller and is never dropped.
    pub(crate) fn start<F>(delay: Duration, flush_fn: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<()>();

        let join_handle = thread::spawn(move || 'idle: loop {
            // block until a mutation arms the timer
            if rx.recv().is_err() {
                break;
            }
            loop {
                match rx.recv_timeout(delay) {
                    // another mutation inside the window: restart it
                    Ok(()) => continue,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        flush_fn();
                        continue 'idle;
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break 'idle,
                }
            }
        });

        Self {
            tx: Some(tx),
            join_handle: Some(join_handle),
        }
    }

    /// Arm the flush window, or restart it if one is already open.
    pub(crate) fn poke(&self) {
        if let Some(ref t) = self.tx {
            let _ = t.send(());
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}
