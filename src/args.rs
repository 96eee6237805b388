use clap::Parser;
use std::path::PathBuf;
use title_pipe::TitlePipe;

#[derive(Parser, Debug)]
#[command(name = "title-pipe")]
#[command(about = "Fetches URLs read line by line and prints each page's <title>")]
#[command(version)]
pub struct Args {
    /// Number of concurrent workers (default 5)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Read URLs from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON configuration file; flags given here take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds (default 12)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds (default 5)
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Longest accepted input line in bytes (default 1048576)
    #[arg(long)]
    pub max_line_bytes: Option<usize>,

    /// Print results without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Apply command-line overrides on top of the builder's configuration
    pub fn apply(&self, mut pipe: TitlePipe) -> TitlePipe {
        if let Some(workers) = self.concurrency {
            pipe = pipe.with_workers(workers);
        }
        if let Some(seconds) = self.timeout {
            pipe = pipe.with_request_timeout(seconds);
        }
        if let Some(seconds) = self.connect_timeout {
            pipe = pipe.with_connect_timeout(seconds);
        }
        if let Some(bytes) = self.max_line_bytes {
            pipe = pipe.with_max_line_bytes(bytes);
        }
        pipe
    }
}
