//! File reading utilities for one poll cycle's read pass.

use crate::error::Result;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

/// Read every newline-delimited line appended past `offset`, invoking
/// `on_line` once per line and advancing `offset` past each delivered line.
///
/// Lines keep their trailing newline; a final chunk with no terminator is
/// delivered whole. An empty read at end-of-file ends the pass without
/// invoking `on_line`. On a decode failure `offset` stays at the last
/// fully-delivered line, so the undelivered bytes are retried by the next
/// cycle and delivered lines are never re-read.
pub(crate) async fn drain_appended<F>(
    file_path: &Path,
    offset: &mut u64,
    mut on_line: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let file = File::open(file_path).await?;
    let mut reader = BufReader::new(file);
    reader.seek(std::io::SeekFrom::Start(*offset)).await?;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break; // end of file
        }

        let line = String::from_utf8(buf.clone())?;
        *offset += n as u64;
        on_line(&line);
    }

    Ok(())
}

/// Detect if the file shrank (truncation or rotation) by comparing its
/// current size with the tracked offset.
pub(crate) fn detect_truncation(current_size: u64, offset: u64) -> bool {
    current_size < offset
}

/// Resolve the offset the loop starts from: the beginning of the file, or
/// just before its end for tail-from-near-end semantics. Clamped so an
/// empty file starts at 0 rather than underflowing.
pub(crate) fn initial_offset(start_at_beginning: bool, file_size: u64) -> u64 {
    if start_at_beginning {
        0
    } else {
        file_size.saturating_sub(1)
    }
}
