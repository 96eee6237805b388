use clap::Parser;
use std::error::Error;
use title_pipe::{StatusClass, TitlePipe};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URLs to fetch
    #[arg(required = true)]
    urls: Vec<String>,

    /// JSON configuration string
    #[arg(short, long)]
    config: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let args = Args::parse();

    let mut pipe = TitlePipe::new();
    if let Some(config_str) = args.config {
        println!("Applying configuration from string");
        pipe = pipe.with_config_str(&config_str)?;
    }
    if let Some(workers) = args.workers {
        pipe = pipe.with_workers(workers);
    }

    // The pipeline reads lines, so an in-memory buffer works as well as stdin
    let input = std::io::Cursor::new(args.urls.join("\n").into_bytes());
    let mut pipeline = pipe.generate(input).await?;

    let start_time = std::time::Instant::now();
    let mut received = 0;
    while let Some(result) = pipeline.results.recv().await {
        received += 1;
        match result.error() {
            Some(err) => println!("{:>3} {} failed: {}", received, result.url, err),
            None => println!(
                "{:>3} {} ({:?}, {}): {}",
                received,
                result.url,
                StatusClass::from_status(result.status),
                result.status,
                result.title().unwrap_or_default()
            ),
        }
    }
    let summary = pipeline.finish().await;

    println!(
        "Fetched {} of {} URLs in {:.2} seconds.",
        received,
        summary.queued,
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
