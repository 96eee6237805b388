use crate::config::PipelineConfig;
use crate::error::Result;
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::pool;
use crate::results::FetchResult;
use crate::source::{self, SourceSummary};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Builder for configuring and starting a fetch-and-extract run
#[derive(Debug, Clone, Default)]
pub struct TitlePipe {
    config: PipelineConfig,
}

impl TitlePipe {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = PipelineConfig::from_file(path)?;
        Ok(self)
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(mut self, json: &str) -> Result<Self> {
        self.config = PipelineConfig::from_json(json)?;
        Ok(self)
    }

    /// Override the number of concurrent workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Override the per-request timeout
    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.request_timeout_secs = seconds;
        self
    }

    /// Override the connect timeout
    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.config.connect_timeout_secs = seconds;
        self
    }

    /// Override the longest accepted input line
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.config.max_line_bytes = max_line_bytes;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Start fetching URLs read from `input` over HTTP
    pub async fn generate<R>(self, input: R) -> Result<Pipeline>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let fetcher = HttpFetcher::new(&self.config)?;
        self.generate_with_fetcher(input, Arc::new(fetcher)).await
    }

    /// Like [`TitlePipe::generate`] but with a caller-supplied fetcher
    ///
    /// The configuration is validated here, before any queue or task exists.
    pub async fn generate_with_fetcher<R>(
        self,
        input: R,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Pipeline>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.config.validate()?;

        let capacity = self.config.queue_capacity();
        let (url_tx, url_rx) = mpsc::channel::<String>(capacity);
        let (result_tx, result_rx) = mpsc::channel::<FetchResult>(capacity);

        ::log::info!(
            "Starting {} workers (queue capacity {})",
            self.config.workers,
            capacity
        );

        let pool = pool::spawn_workers(self.config.workers, fetcher, url_rx, result_tx)?;
        let source = source::spawn_source(input, self.config.max_line_bytes, url_tx);

        Ok(Pipeline {
            results: result_rx,
            source,
            pool,
        })
    }
}

/// A running pipeline
///
/// Drain `results` until it yields `None`, then call [`Pipeline::finish`].
pub struct Pipeline {
    /// Results in completion order
    pub results: mpsc::Receiver<FetchResult>,
    source: JoinHandle<SourceSummary>,
    pool: JoinHandle<usize>,
}

impl Pipeline {
    /// Waits for the source and pool tasks and reports what the source read
    pub async fn finish(self) -> SourceSummary {
        let summary = match self.source.await {
            Ok(summary) => summary,
            Err(e) => {
                ::log::error!("URL source task failed: {}", e);
                SourceSummary {
                    error: Some(e.to_string()),
                    ..SourceSummary::default()
                }
            }
        };
        match self.pool.await {
            Ok(completed) => ::log::debug!("{} workers completed", completed),
            Err(e) => ::log::error!("Worker pool watcher failed: {}", e),
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::results::TitleOutcome;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fails every `.invalid` host, succeeds otherwise, and records each call
    #[derive(Default)]
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn fetch(&self, url: String) -> FetchResult {
            self.calls.lock().unwrap().push(url.clone());
            if url.contains(".invalid") {
                FetchResult::failed(url, "dns error: failed to lookup address information")
            } else {
                FetchResult::fetched(url, 200, TitleOutcome::Found("Example Domain".to_string()))
            }
        }
    }

    async fn drain(mut pipeline: Pipeline) -> (Vec<FetchResult>, SourceSummary) {
        let mut results = Vec::new();
        while let Some(res) = pipeline.results.recv().await {
            results.push(res);
        }
        (results, pipeline.finish().await)
    }

    #[tokio::test]
    async fn test_blank_lines_produce_no_results() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let pipeline = TitlePipe::new()
            .with_workers(2)
            .generate_with_fetcher(
                &b"http://example.com\n\n  \nhttp://bad.invalid\n"[..],
                fetcher.clone(),
            )
            .await
            .unwrap();

        let (mut results, summary) = drain(pipeline).await;
        results.sort_by(|a, b| a.url.cmp(&b.url));

        assert_eq!(results.len(), 2);
        assert_eq!(summary.queued, 2);
        assert_eq!(summary.skipped_blank, 2);

        assert_eq!(results[0].url, "http://bad.invalid");
        assert!(results[0].error().is_some());
        assert_eq!(results[0].title(), None);

        assert_eq!(results[1].url, "http://example.com");
        assert_eq!(results[1].status, 200);
        assert_eq!(results[1].title(), Some("Example Domain"));

        assert_eq!(fetcher.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_every_line_processed_exactly_once() {
        let input: String = (0..200)
            .map(|i| {
                if i % 7 == 0 {
                    "   \n".to_string()
                } else {
                    format!("http://host-{i}.test/\n")
                }
            })
            .collect();
        let expected = (0..200).filter(|i| i % 7 != 0).count();

        for workers in [1, 3, 8] {
            let fetcher = Arc::new(RecordingFetcher::default());
            let pipeline = TitlePipe::new()
                .with_workers(workers)
                .generate_with_fetcher(
                    std::io::Cursor::new(input.clone().into_bytes()),
                    fetcher.clone(),
                )
                .await
                .unwrap();

            let (results, summary) = drain(pipeline).await;
            assert_eq!(results.len(), expected, "workers = {workers}");
            assert_eq!(summary.queued, expected);

            let mut calls = fetcher.calls.lock().unwrap().clone();
            calls.sort();
            calls.dedup();
            assert_eq!(calls.len(), expected);
        }
    }

    #[tokio::test]
    async fn test_zero_workers_fails_before_any_request() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let result = TitlePipe::new()
            .with_workers(0)
            .generate_with_fetcher(&b"http://example.com\n"[..], fetcher.clone())
            .await;

        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_line_does_not_drop_later_urls() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let pipeline = TitlePipe::new()
            .with_workers(2)
            .generate_with_fetcher(
                &b"http://a.test\nhttp://caf\xe9.test/\nhttp://b.test\nhttp://c.test\n"[..],
                fetcher.clone(),
            )
            .await
            .unwrap();

        let (results, summary) = drain(pipeline).await;
        assert_eq!(results.len(), 4);
        assert_eq!(summary.queued, 4);
        assert_eq!(summary.error, None);
        assert!(results.iter().any(|r| r.url == "http://c.test"));
    }

    #[tokio::test]
    async fn test_huge_worker_count_is_a_config_error() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let result = TitlePipe::new()
            .with_workers(usize::MAX / 2)
            .generate_with_fetcher(&b"http://example.com\n"[..], fetcher.clone())
            .await;

        assert!(matches!(result, Err(Error::Config { ref key, .. }) if key.as_deref() == Some("workers")));
        assert!(fetcher.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_rejected_by_http_pipeline() {
        let result = TitlePipe::new()
            .with_workers(0)
            .generate(&b"http://example.com\n"[..])
            .await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_config_string_overrides() {
        let pipe = TitlePipe::new()
            .with_config_str(r#"{ "workers": 9, "request_timeout_secs": 3 }"#)
            .unwrap()
            .with_connect_timeout(2);
        assert_eq!(pipe.config().workers, 9);
        assert_eq!(pipe.config().request_timeout_secs, 3);
        assert_eq!(pipe.config().connect_timeout_secs, 2);
    }

    #[tokio::test]
    async fn test_http_pipeline_end_to_end() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/home"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<title>\n  Home   Page\n</title>"),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let input = format!(
            "{0}/home\n\n{0}/down\n   \nnot a url\n",
            mock_server.uri()
        );
        let pipeline = TitlePipe::new()
            .with_workers(2)
            .generate(std::io::Cursor::new(input.into_bytes()))
            .await
            .unwrap();

        let (results, summary) = drain(pipeline).await;
        assert_eq!(results.len(), 3);
        assert_eq!(summary.skipped_blank, 2);

        let home = results.iter().find(|r| r.url.ends_with("/home")).unwrap();
        assert_eq!(home.status, 200);
        assert_eq!(home.title(), Some("Home Page"));

        let down = results.iter().find(|r| r.url.ends_with("/down")).unwrap();
        assert_eq!(down.status, 500);
        assert_eq!(down.title(), Some("<title> tag missing"));

        let bad = results.iter().find(|r| r.url == "not a url").unwrap();
        assert!(bad.is_error());
        assert_eq!(bad.status, 0);
    }
}
