//! Listener contract and the registry that tracks registered listeners.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// An observer notified once per newly discovered line.
///
/// Implementations receive each line exactly as it appears in the file,
/// including the trailing newline when one is present. A line that reaches
/// end-of-file without a terminator is still delivered whole.
///
/// Listeners are invoked synchronously from the polling loop, in
/// registration order. A panicking listener is isolated and reported; the
/// remaining listeners still run. Calling [`crate::Tailer::stop`] from
/// inside a callback is supported; adding or removing listeners from inside
/// a callback is not (the registry is locked during notification).
pub trait TailListener: Send {
    /// Called for every new line appended to the tailed file.
    fn on_new_line(&mut self, line: &str);
}

/// Any `FnMut(&str)` closure can act as a listener.
impl<F> TailListener for F
where
    F: FnMut(&str) + Send,
{
    fn on_new_line(&mut self, line: &str) {
        self(line)
    }
}

/// Opaque identifier for a registered listener.
///
/// Handles are issued monotonically and never reused, even after the
/// listener they named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerHandle(u64);

/// Ordered collection of listeners, keyed by handle.
///
/// A `BTreeMap` keyed by the monotonically issued handle makes iteration
/// order equal registration order, and removal leaves a gap rather than
/// shifting later entries.
pub(crate) struct ListenerRegistry {
    entries: BTreeMap<u64, Box<dyn TailListener>>,
    next_handle: u64,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_handle: 0,
        }
    }

    /// Register a listener and return its handle.
    pub(crate) fn add(&mut self, listener: Box<dyn TailListener>) -> ListenerHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.entries.insert(handle, listener);
        ListenerHandle(handle)
    }

    /// Remove the listener with the given handle. Removing a handle that
    /// was never issued, or was already removed, is a silent no-op.
    pub(crate) fn remove(&mut self, handle: ListenerHandle) {
        self.entries.remove(&handle.0);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke every registered listener with `line`, in registration order.
    ///
    /// A panic in one listener is caught and reported so the remaining
    /// listeners (and subsequent lines) are still delivered.
    pub(crate) fn notify(&mut self, line: &str) {
        for (handle, listener) in self.entries.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| listener.on_new_line(line)));
            if result.is_err() {
                tracing::warn!(
                    handle = *handle,
                    "listener panicked while handling a line; continuing"
                );
            }
        }
    }
}
