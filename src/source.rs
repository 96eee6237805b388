use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};

/// What the URL source did with its input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSummary {
    /// Lines pushed onto the URL queue
    pub queued: usize,
    /// Blank or whitespace-only lines that were dropped
    pub skipped_blank: usize,
    /// Description of the read error that ended the input early, if any
    pub error: Option<String>,
}

/// Spawns the URL source on its own task
pub fn spawn_source<R>(
    input: R,
    max_line_bytes: usize,
    url_tx: mpsc::Sender<String>,
) -> JoinHandle<SourceSummary>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(read_urls(input, max_line_bytes, url_tx))
}

/// Reads `input` line by line and queues every non-blank, trimmed line
///
/// The sender is consumed, so the URL queue closes when this returns: at end
/// of input, after a read error, or when no worker is left to receive. A read
/// error (I/O failure or a line over `max_line_bytes`) is written to stderr
/// and stops the input; URLs already queued are still processed. Bytes that
/// are not valid UTF-8 are replaced rather than treated as a read error, so
/// such a line still becomes a URL and fails on its own.
pub async fn read_urls<R>(
    input: R,
    max_line_bytes: usize,
    url_tx: mpsc::Sender<String>,
) -> SourceSummary
where
    R: AsyncRead + Unpin,
{
    let codec =
        AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_line_bytes);
    let mut lines = FramedRead::new(input, codec);
    let mut summary = SourceSummary::default();

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                ::log::error!("Failed reading input after {} URLs: {}", summary.queued, e);
                eprintln!("[Input Error] {}", e);
                summary.error = Some(e.to_string());
                break;
            }
        };

        let line = String::from_utf8_lossy(&line);
        let url = line.trim();
        if url.is_empty() {
            summary.skipped_blank += 1;
            continue;
        }

        if url_tx.send(url.to_string()).await.is_err() {
            ::log::warn!("URL queue closed before input was exhausted");
            break;
        }
        summary.queued += 1;
    }

    ::log::debug!(
        "Input finished: {} URLs queued, {} blank lines skipped",
        summary.queued,
        summary.skipped_blank
    );
    summary
}
