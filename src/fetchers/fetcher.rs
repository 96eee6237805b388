use crate::results::FetchResult;
use async_trait::async_trait;

/// Turns one URL into one result
///
/// Implementations are shared by every worker of a pool, so they must be
/// usable concurrently through a shared reference. A fetch never fails as a
/// whole: failures are reported inside the returned [`FetchResult`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` once and describe the outcome
    async fn fetch(&self, url: String) -> FetchResult;
}
