use crate::results::TitleOutcome;
use futures::{Stream, StreamExt};
use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::fmt::Display;
use std::sync::LazyLock;

/// Matches the start of a title element in raw, possibly partial, HTML bytes
static TITLE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<title[\s>]").unwrap());

/// Matches the end of a title element in raw, possibly partial, HTML bytes
static TITLE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</title").unwrap());

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

/// Length of `<title>` or `</title` minus one: how far back a match may
/// straddle two chunks
const TAG_OVERLAP: usize = 6;

/// Extracts the first `<title>` of an already buffered HTML document
///
/// The title text has every run of whitespace collapsed to a single space and
/// is trimmed at both ends. A document without a title element yields
/// [`TitleOutcome::Missing`].
pub fn extract_title(html: &str) -> TitleOutcome {
    let doc = Html::parse_document(html);

    match doc.select(&TITLE_SELECTOR).next() {
        Some(element) => {
            let raw = element.text().collect::<String>();
            TitleOutcome::Found(normalize_whitespace(&raw))
        }
        None => TitleOutcome::Missing,
    }
}

/// Reads a response body stream until the title is complete and extracts it
///
/// Reading stops as soon as a closing title tag following an opening one has
/// been buffered, at the end of the stream, or once `limit` bytes have been read. The stream is dropped
/// before parsing on every path, which releases the underlying connection.
/// A stream error before any of those points turns into
/// [`TitleOutcome::Degraded`] carrying the error's description.
pub async fn title_from_stream<S, B, E>(stream: S, limit: usize) -> TitleOutcome
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut stream = Box::pin(stream);
    let mut buffer: Vec<u8> = Vec::new();
    // End offset of the first opening tag, once seen
    let mut open_end: Option<usize> = None;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                ::log::debug!("Body stream failed after {} bytes: {}", buffer.len(), e);
                return TitleOutcome::Degraded(e.to_string());
            }
        };

        let search_from = buffer.len().saturating_sub(TAG_OVERLAP);
        buffer.extend_from_slice(chunk.as_ref());

        if open_end.is_none() {
            open_end = TITLE_OPEN
                .find(&buffer[search_from..])
                .map(|m| search_from + m.end());
        }
        if let Some(open_end) = open_end {
            if TITLE_CLOSE.is_match(&buffer[search_from.max(open_end)..]) {
                ::log::trace!("Closing title tag found after {} bytes", buffer.len());
                break;
            }
        }
        if buffer.len() >= limit {
            ::log::debug!("Stopped reading body at {} bytes without a title end", limit);
            buffer.truncate(limit);
            break;
        }
    }
    drop(stream);

    extract_title(&String::from_utf8_lossy(&buffer))
}

/// Collapses whitespace runs to single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
