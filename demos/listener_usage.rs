use log_tailer::{TailListener, Tailer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A listener that counts lines by log level.
struct LevelCounter {
    errors: Arc<AtomicU64>,
    warnings: Arc<AtomicU64>,
}

impl TailListener for LevelCounter {
    fn on_new_line(&mut self, line: &str) {
        if line.contains("ERROR") {
            self.errors.fetch_add(1, Ordering::Relaxed);
        } else if line.contains("WARN") {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let errors = Arc::new(AtomicU64::new(0));
    let warnings = Arc::new(AtomicU64::new(0));

    let tailer = Arc::new(
        Tailer::new("app.log")
            .await?
            .with_poll_interval(Duration::from_secs(1)),
    );

    // A closure listener that echoes every line...
    let echo = tailer.add_listener(|line: &str| print!("{}", line));

    // ...and a struct listener that keeps statistics.
    tailer.add_listener(LevelCounter {
        errors: Arc::clone(&errors),
        warnings: Arc::clone(&warnings),
    });

    // Stop the tailer after 30 seconds from another task.
    {
        let tailer = Arc::clone(&tailer);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            tailer.stop();
        });
    }

    tailer.start().await?;

    tailer.remove_listener(echo);
    println!(
        "Done. Saw {} errors, {} warnings.",
        errors.load(Ordering::Relaxed),
        warnings.load(Ordering::Relaxed)
    );

    Ok(())
}
