use crate::config::PipelineConfig;
use crate::error::Result;
use crate::fetchers::Fetcher;
use crate::parsers::title_from_stream;
use crate::results::FetchResult;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;

/// Fetches pages over HTTP(S) with one shared, pooled client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    request_timeout: Duration,
    body_limit: usize,
}

impl HttpFetcher {
    /// Builds the shared client from the timeouts and TLS policy in `config`
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.client_timeout())
            .connect_timeout(config.connect_timeout())
            .tcp_keepalive(config.keepalive())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent.as_str())
            .build()?;

        ::log::debug!(
            "HTTP client ready (connect timeout {:?}, request timeout {:?}, invalid certs accepted: {})",
            config.connect_timeout(),
            config.request_timeout(),
            config.accept_invalid_certs
        );

        Ok(Self {
            client,
            request_timeout: config.request_timeout(),
            body_limit: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: String) -> FetchResult {
        ::log::trace!("GET {}", url);

        let request = self.client.get(url.as_str()).send();
        let response = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                ::log::debug!("Request for {} failed: {}", url, e);
                return FetchResult::failed(url, describe(&e));
            }
            Err(_) => {
                ::log::debug!("Request for {} timed out", url);
                return FetchResult::failed(
                    url,
                    format!("request timed out after {:?}", self.request_timeout),
                );
            }
        };

        let status = response.status().as_u16();
        let body = response.bytes_stream().map_err(|e| describe(&e));
        let title = title_from_stream(body, self.body_limit).await;

        ::log::debug!("{} answered {}", url, status);
        FetchResult::fetched(url, status, title)
    }
}

/// Error text followed by each underlying cause, so DNS and connect failures stay visible
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
