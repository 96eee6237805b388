use crate::parsers::title::title_from_stream;
use crate::results::TitleOutcome;
use futures::stream;

const NO_LIMIT: usize = usize::MAX;

type Chunk = Result<&'static str, String>;

fn chunks(parts: Vec<Chunk>) -> impl futures::Stream<Item = Chunk> {
    stream::iter(parts)
}

#[tokio::test]
async fn test_title_in_single_chunk() {
    let body = chunks(vec![Ok(
        "<html><head><title>Hello   World</title></head></html>",
    )]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("Hello World".to_string())
    );
}

#[tokio::test]
async fn test_close_tag_split_across_chunks() {
    let body = chunks(vec![
        Ok("<html><head><title>Split"),
        Ok(" Title</ti"),
        Ok("tle></head>"),
        Err("should never be read".to_string()),
    ]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("Split Title".to_string())
    );
}

#[tokio::test]
async fn test_stops_reading_once_title_is_complete() {
    // An error after the closing tag is never polled
    let body = chunks(vec![
        Ok("<title>Done</title>"),
        Err("connection reset".to_string()),
    ]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("Done".to_string())
    );
}

#[tokio::test]
async fn test_close_tag_before_any_title_does_not_stop_reading() {
    let body = chunks(vec![
        Ok("<html><head><!-- </title> -->"),
        Ok("<script>var s = '</title>';</script>"),
        Ok("<TITLE>Real</TITLE>"),
        Err("never read".to_string()),
    ]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("Real".to_string())
    );
}

#[tokio::test]
async fn test_open_tag_split_across_chunks() {
    let body = chunks(vec![
        Ok("<html><head><ti"),
        Ok("tle>Halves</title>"),
        Err("never read".to_string()),
    ]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("Halves".to_string())
    );
}

#[tokio::test]
async fn test_error_before_title_is_degraded() {
    let body = chunks(vec![
        Ok("<html><head>"),
        Err("error decoding response body".to_string()),
    ]);
    let outcome = title_from_stream(body, NO_LIMIT).await;
    assert_eq!(
        outcome,
        TitleOutcome::Degraded("error decoding response body".to_string())
    );
    assert_eq!(outcome.as_display(), "error decoding response body");
}

#[tokio::test]
async fn test_stream_without_title() {
    let body = chunks(vec![Ok("<html><body>"), Ok("<p>nothing</p>"), Ok("</body></html>")]);
    assert_eq!(title_from_stream(body, NO_LIMIT).await, TitleOutcome::Missing);
}

#[tokio::test]
async fn test_empty_stream() {
    let body = chunks(vec![]);
    assert_eq!(title_from_stream(body, NO_LIMIT).await, TitleOutcome::Missing);
}

#[tokio::test]
async fn test_title_beyond_limit_is_not_seen() {
    let body = chunks(vec![
        Ok("<html><head><meta charset=\"utf-8\"></head><body>"),
        Ok("<title>Too late</title>"),
    ]);
    assert_eq!(title_from_stream(body, 16).await, TitleOutcome::Missing);
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let body = stream::iter(vec![Ok::<Vec<u8>, String>(
        b"<title>caf\xe9</title>".to_vec(),
    )]);
    assert_eq!(
        title_from_stream(body, NO_LIMIT).await,
        TitleOutcome::Found("caf\u{fffd}".to_string())
    );
}
