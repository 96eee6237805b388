use crate::results::{FetchResult, Outcome};
use std::io::{self, Write};
use tokio::sync::mpsc;

pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_GREEN: &str = "\x1b[32m";
pub const COLOR_YELLOW: &str = "\x1b[33m";
pub const COLOR_ORANGE: &str = "\x1b[33;1m";
pub const COLOR_MAGENTA: &str = "\x1b[35m";

/// Display category of an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 200-299
    Success,
    /// 300-399
    Redirect,
    /// 400-499
    ClientError,
    /// 500-599
    ServerError,
    /// Anything else, including the 0 of a failed request
    Other,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }

    /// ANSI color that marks lines of this class
    pub fn color(self) -> &'static str {
        match self {
            StatusClass::Success => COLOR_GREEN,
            StatusClass::Redirect => COLOR_YELLOW,
            StatusClass::ClientError => COLOR_ORANGE,
            StatusClass::ServerError => COLOR_MAGENTA,
            StatusClass::Other => COLOR_RESET,
        }
    }
}

/// Counters gathered while presenting a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub errors: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub other: usize,
}

impl RunStats {
    fn record(&mut self, result: &FetchResult) {
        self.total += 1;
        if result.is_error() {
            self.errors += 1;
            return;
        }
        match StatusClass::from_status(result.status) {
            StatusClass::Success => self.success += 1,
            StatusClass::Redirect => self.redirect += 1,
            StatusClass::ClientError => self.client_error += 1,
            StatusClass::ServerError => self.server_error += 1,
            StatusClass::Other => self.other += 1,
        }
    }
}

/// Writes one line per result as soon as it arrives
pub struct Presenter<W: Write> {
    out: W,
    color: bool,
    stats: RunStats,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing to `out`, with or without ANSI colors
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            stats: RunStats::default(),
        }
    }

    /// Formats a result as `[status] url: title` or `[Error] url: error`
    pub fn format_line(&self, result: &FetchResult) -> String {
        let (color, body) = match &result.outcome {
            Outcome::Error(err) => (COLOR_MAGENTA, format!("[Error] {}: {}", result.url, err)),
            Outcome::Title(title) => (
                StatusClass::from_status(result.status).color(),
                format!("[{}] {}: {}", result.status, result.url, title),
            ),
        };

        if self.color {
            format!("{color}{body}{COLOR_RESET}")
        } else {
            body
        }
    }

    /// Writes and flushes the line for one result
    pub fn write_result(&mut self, result: &FetchResult) -> io::Result<()> {
        let line = self.format_line(result);
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        self.stats.record(result);
        Ok(())
    }

    /// Presents results until the queue closes, returning the counters
    pub async fn drain(mut self, results: &mut mpsc::Receiver<FetchResult>) -> io::Result<RunStats> {
        while let Some(result) = results.recv().await {
            self.write_result(&result)?;
        }
        Ok(self.stats)
    }
}
