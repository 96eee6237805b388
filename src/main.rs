use clap::Parser;
use std::process::ExitCode;
use title_pipe::{Presenter, TitlePipe};
use tokio::io::AsyncRead;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Failed to run pipeline: {}", e);
            eprintln!("title-pipe: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> title_pipe::Result<()> {
    let pipe = match &args.config {
        Some(path) => TitlePipe::new().with_config_file(path)?,
        None => TitlePipe::new(),
    };
    let pipe = args.apply(pipe);

    let input: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    let mut pipeline = pipe.generate(input).await?;

    let start_time = std::time::Instant::now();
    let presenter = Presenter::new(std::io::stdout(), !args.no_color);
    let stats = presenter.drain(&mut pipeline.results).await?;
    let summary = pipeline.finish().await;

    ::log::info!(
        "Processed {} URLs in {:.2} seconds ({} errors, {} blank lines skipped)",
        stats.total,
        start_time.elapsed().as_secs_f64(),
        stats.errors,
        summary.skipped_blank
    );
    Ok(())
}
