//! Stream adapter over a background tailer.

use crate::error::Result;
use crate::tailer::Tailer;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A stream that tails a file in the background and yields new lines.
///
/// Built on a [`Tailer`] running on a spawned task with a
/// channel-forwarding listener. Dropping the stream stops the tailer.
pub struct TailStream {
    receiver: mpsc::UnboundedReceiver<Result<String>>,
    tailer: Arc<Tailer>,
    task_handle: JoinHandle<()>,
}

impl TailStream {
    /// Creates a new `TailStream` for the specified file.
    ///
    /// `poll_interval` defaults to [`crate::DEFAULT_POLL_INTERVAL`].
    pub async fn new<P: AsRef<Path>>(path: P, poll_interval: Option<Duration>) -> Result<Self> {
        let mut tailer = Tailer::new(path).await?;
        if let Some(interval) = poll_interval {
            tailer = tailer.with_poll_interval(interval);
        }
        let tailer = Arc::new(tailer);

        let (tx, rx) = mpsc::unbounded_channel();

        let line_tx = tx.clone();
        tailer.add_listener(move |line: &str| {
            let _ = line_tx.send(Ok(line.to_string()));
        });

        // Run the poll loop in the background; a start failure is the
        // stream's last item.
        let task_tailer = Arc::clone(&tailer);
        let task_handle = tokio::spawn(async move {
            if let Err(e) = task_tailer.start().await {
                let _ = tx.send(Err(e));
            }
        });

        Ok(TailStream {
            receiver: rx,
            tailer,
            task_handle,
        })
    }

    /// The tailer driving this stream.
    pub fn tailer(&self) -> &Arc<Tailer> {
        &self.tailer
    }

    /// Check if the stream has been closed/dropped
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }
}

impl Drop for TailStream {
    fn drop(&mut self) {
        // Ask the loop to exit, then abort in case the spawned task had not
        // reached `start()` yet (a stop before start is a no-op and the
        // loop would otherwise run with nobody listening).
        self.tailer.stop();
        self.task_handle.abort();
    }
}

impl Stream for TailStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TempLogFile;
    use tokio_stream::StreamExt;
    use tokio_test::assert_ok;

    const FAST_POLL: Option<Duration> = Some(Duration::from_millis(10));

    // Helper function to collect stream items with timeout
    async fn collect_stream_items(
        stream: &mut TailStream,
        max_items: usize,
        timeout: Duration,
    ) -> Vec<String> {
        let mut items = Vec::new();
        let start = tokio::time::Instant::now();

        while items.len() < max_items && start.elapsed() < timeout {
            match tokio::time::timeout(Duration::from_millis(20), stream.next()).await {
                Ok(Some(Ok(item))) => items.push(item),
                Ok(Some(Err(_))) => break, // Error occurred
                Ok(None) => break,         // Stream ended
                Err(_) => {}               // Timeout on one item; keep waiting
            }
        }

        items
    }

    #[tokio::test]
    async fn test_tail_stream_creation() {
        let log = TempLogFile::new().unwrap();
        let stream = TailStream::new(log.path(), FAST_POLL).await;

        let stream = assert_ok!(stream);
        assert!(!stream.is_closed());
    }

    #[tokio::test]
    async fn test_tail_stream_creation_nonexistent_file() {
        let log = TempLogFile::new().unwrap();
        let missing = log.path().with_file_name("missing.log");

        let stream = TailStream::new(&missing, FAST_POLL).await;
        assert!(stream.is_err());
    }

    #[tokio::test]
    async fn test_tail_stream_yields_existing_content() {
        let log = TempLogFile::with_content("first\nsecond\n").unwrap();
        let mut stream = TailStream::new(log.path(), FAST_POLL).await.unwrap();

        let items = collect_stream_items(&mut stream, 2, Duration::from_secs(2)).await;

        assert_eq!(items, vec!["first\n", "second\n"]);
    }

    #[tokio::test]
    async fn test_tail_stream_yields_appended_content() {
        let log = TempLogFile::new().unwrap();
        let mut stream = TailStream::new(log.path(), FAST_POLL).await.unwrap();

        log.append_raw("hello\n").unwrap();

        let items = collect_stream_items(&mut stream, 1, Duration::from_secs(2)).await;
        assert_eq!(items, vec!["hello\n"]);
    }

    #[tokio::test]
    async fn test_tail_stream_empty_file_yields_nothing() {
        let log = TempLogFile::new().unwrap();
        let mut stream = TailStream::new(log.path(), FAST_POLL).await.unwrap();

        let items = collect_stream_items(&mut stream, 1, Duration::from_millis(100)).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_tail_stream_stops_tailer_on_drop() {
        let log = TempLogFile::with_content("line\n").unwrap();
        let stream = TailStream::new(log.path(), FAST_POLL).await.unwrap();
        let tailer = Arc::clone(stream.tailer());

        // Let the background loop spin up before dropping.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !tailer.is_running() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(tailer.is_running());

        drop(stream);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while tailer.is_running() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!tailer.is_running());
    }

    #[tokio::test]
    async fn test_multiple_streams_independence() {
        let log = TempLogFile::new().unwrap();
        let stream1 = TailStream::new(log.path(), FAST_POLL).await.unwrap();
        let stream2 = TailStream::new(log.path(), FAST_POLL).await.unwrap();

        assert!(!stream1.is_closed());
        assert!(!stream2.is_closed());

        drop(stream1);

        // Second stream should still be functional
        assert!(!stream2.is_closed());
    }
}
