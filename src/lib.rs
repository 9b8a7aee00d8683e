//! A log tailer library that polls a file for appended content and
//! notifies registered listeners with each new line.
//!
//! No kernel-level file-change notification is used: a single loop stats
//! the file on an interval, reads anything appended past the tracked byte
//! offset, and delivers every new line to each registered listener in
//! registration order. A shrinking file is treated as truncated or rotated
//! and tailing restarts from the top.
//!
//! # Example
//!
//! ```rust,no_run
//! use log_tailer::tail_log;
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut stream = tail_log("app.log", None).await?;
//!
//!     while let Some(line) = stream.next().await {
//!         match line {
//!             Ok(content) => print!("{}", content),
//!             Err(e) => eprintln!("Error: {}", e),
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! For observer-style delivery, register listeners on a [`Tailer`]
//! directly; see its documentation.

// Internal modules - not part of public API
mod error;
mod listener;
mod reader;
mod stream;
mod tailer;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use error::{Error, Result};
pub use listener::{ListenerHandle, TailListener};
pub use stream::TailStream;
pub use tailer::{DEFAULT_POLL_INTERVAL, Tailer};

use std::path::Path;
use std::time::Duration;

/// Creates a stream that tails a file and yields each new line.
///
/// # Arguments
///
/// * `path` - File path to tail
/// * `poll_interval` - Time between poll cycles (defaults to
///   [`DEFAULT_POLL_INTERVAL`])
///
/// # Example
///
/// ```rust,no_run
/// use log_tailer::tail_log;
/// use std::time::Duration;
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut stream = tail_log("app.log", Some(Duration::from_secs(1))).await?;
///
///     while let Some(line) = stream.next().await {
///         print!("{}", line?);
///     }
///
///     Ok(())
/// }
/// ```
pub async fn tail_log<P: AsRef<Path>>(
    path: P,
    poll_interval: Option<Duration>,
) -> Result<TailStream> {
    TailStream::new(path, poll_interval).await
}
