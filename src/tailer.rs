//! The polling tailer: owns the poll loop, the tracked offset and the
//! listener registry.

use crate::error::{Error, Result};
use crate::listener::{ListenerHandle, ListenerRegistry, TailListener};
use crate::reader;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::fs::File;
use tokio::sync::Notify;

/// How long to wait between poll cycles unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polls a log file for appended content and notifies registered listeners
/// with each new line.
///
/// A `Tailer` is bound to one file. Register listeners, then await
/// [`start`](Tailer::start); the future resolves only after
/// [`stop`](Tailer::stop) is called. `stop`, [`add_listener`](Tailer::add_listener)
/// and [`remove_listener`](Tailer::remove_listener) are safe to call from
/// another task or thread while the loop runs, so callers typically share
/// the tailer through an [`Arc`](std::sync::Arc).
///
/// # Example
///
/// ```rust,no_run
/// use log_tailer::Tailer;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let tailer = Arc::new(
///         Tailer::new("app.log")
///             .await?
///             .with_poll_interval(Duration::from_millis(500)),
///     );
///     tailer.add_listener(|line: &str| print!("{line}"));
///
///     let handle = {
///         let tailer = Arc::clone(&tailer);
///         tokio::spawn(async move { tailer.start().await })
///     };
///
///     tokio::time::sleep(Duration::from_secs(10)).await;
///     tailer.stop();
///     handle.await??;
///     Ok(())
/// }
/// ```
pub struct Tailer {
    path: PathBuf,
    poll_interval: Duration,
    start_at_beginning: bool,
    shared: TailerShared,
}

/// Loop state that other tasks observe or mutate while `start` runs.
struct TailerShared {
    running: AtomicBool,
    stop_signal: Notify,
    offset: AtomicU64,
    listeners: Mutex<ListenerRegistry>,
}

impl Tailer {
    /// Create a tailer bound to `path`, polling every
    /// [`DEFAULT_POLL_INTERVAL`] and starting at the beginning of the file.
    ///
    /// Fails with [`Error::FileAccess`] if the file does not exist or is
    /// not readable.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        check_readable(&path).await?;

        Ok(Self {
            path,
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_at_beginning: true,
            shared: TailerShared {
                running: AtomicBool::new(false),
                stop_signal: Notify::new(),
                offset: AtomicU64::new(0),
                listeners: Mutex::new(ListenerRegistry::new()),
            },
        })
    }

    /// Set how long the loop sleeps between poll cycles.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Choose where tailing starts: from the beginning of the file
    /// (`true`, the default) or from just before its current end (`false`),
    /// in which case the last byte of pre-existing content is re-delivered
    /// as the first line.
    pub fn with_start_at_beginning(mut self, start_at_beginning: bool) -> Self {
        self.start_at_beginning = start_at_beginning;
        self
    }

    /// The path this tailer is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a listener; every subsequently discovered line is delivered
    /// to it. Returns a handle for later removal. There is no bound on the
    /// number of listeners.
    pub fn add_listener<L>(&self, listener: L) -> ListenerHandle
    where
        L: TailListener + 'static,
    {
        self.lock_listeners().add(Box::new(listener))
    }

    /// Remove a previously registered listener. Removing a handle that is
    /// not registered is a silent no-op.
    pub fn remove_listener(&self, handle: ListenerHandle) {
        self.lock_listeners().remove(handle);
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Whether the poll loop is currently running.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Byte position up to which the file has been consumed.
    pub fn offset(&self) -> u64 {
        self.shared.offset.load(Ordering::SeqCst)
    }

    /// Request the poll loop to exit. The cycle in progress (or the next
    /// one, if called before `start`) is the last; `start` returns within
    /// one poll interval plus one read pass.
    ///
    /// Non-blocking, idempotent, safe from any thread or task, and a no-op
    /// when the loop is not running.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.stop_signal.notify_waiters();
    }

    /// Run the polling loop until [`stop`](Tailer::stop) is called.
    ///
    /// Re-validates that the file is readable (time has passed since
    /// construction), resolves the initial offset, then polls: each cycle
    /// takes a fresh stat, resets the offset to 0 if the file shrank,
    /// reads any appended lines and delivers each one to every registered
    /// listener in registration order, then sleeps for the poll interval.
    /// Cycles where the size is unchanged never open the file.
    ///
    /// Fails with [`Error::FileAccess`] only on entry; once the loop is
    /// running, stat and read failures are logged and the next cycle
    /// retries from the same offset.
    pub async fn start(&self) -> Result<()> {
        check_readable(&self.path).await?;

        let size = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| Error::file_access(&self.path, e))?
            .len();
        let mut offset = reader::initial_offset(self.start_at_beginning, size);
        self.shared.offset.store(offset, Ordering::SeqCst);

        self.shared.running.store(true, Ordering::SeqCst);
        tracing::debug!(path = %self.path.display(), offset, "tailer started");

        while self.shared.running.load(Ordering::SeqCst) {
            self.poll_cycle(&mut offset).await;

            tokio::select! {
                _ = self.shared.stop_signal.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::debug!(path = %self.path.display(), offset, "tailer stopped");
        Ok(())
    }

    /// One poll cycle: stat, shrink check, read pass.
    async fn poll_cycle(&self, offset: &mut u64) {
        // Fresh stat every cycle so the size reflects the current file.
        let size = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to stat file; will retry next cycle"
                );
                return;
            }
        };

        if reader::detect_truncation(size, *offset) {
            // File was truncated or rotated; restart from the top.
            tracing::info!(
                path = %self.path.display(),
                old_offset = *offset,
                size,
                "file shrank; resetting offset"
            );
            *offset = 0;
            self.shared.offset.store(0, Ordering::SeqCst);
        }

        if size > *offset {
            let result = reader::drain_appended(&self.path, offset, |line| {
                self.lock_listeners().notify(line);
            })
            .await;
            self.shared.offset.store(*offset, Ordering::SeqCst);

            if let Err(e) = result {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "read pass failed; will retry next cycle"
                );
            }
        }
        // size == *offset: nothing new, skip the open entirely.
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, ListenerRegistry> {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Verify `path` exists and is readable by opening it.
async fn check_readable(path: &Path) -> Result<()> {
    File::open(path)
        .await
        .map(|_| ())
        .map_err(|e| Error::file_access(path, e))
}
