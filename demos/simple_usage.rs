use log_tailer::tail_log;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tail a log file and print each new line as it appears
    let mut stream = tail_log("app.log", Some(Duration::from_secs(1))).await?;

    println!("Tailing app.log - press Ctrl-C to quit...");

    while let Some(line_result) = stream.next().await {
        match line_result {
            Ok(line) => print!("{}", line),
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
