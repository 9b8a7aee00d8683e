use log_tailer::tail_log;
use std::env;
use std::process;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <file_path>", args[0]);
        process::exit(1);
    }

    let file_path = &args[1];

    match tail_log(file_path, Some(Duration::from_secs(1))).await {
        Ok(mut stream) => {
            println!("Tailing file: {}", file_path);
            while let Some(line_result) = stream.next().await {
                match line_result {
                    Ok(line) => print!("{}", line),
                    Err(e) => {
                        eprintln!("Error reading file: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error setting up tailer: {}", e);
            process::exit(1);
        }
    }
}
