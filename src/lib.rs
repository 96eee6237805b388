// Re-export modules
pub mod config;
pub mod error;
pub mod fetchers;
pub mod parsers;
pub mod pipeline;
pub mod pool;
pub mod present;
pub mod results;
pub mod source;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use fetchers::{Fetcher, HttpFetcher};
pub use pipeline::{Pipeline, TitlePipe};
pub use present::{Presenter, RunStats, StatusClass};
pub use results::{FetchResult, Outcome, TitleOutcome};
pub use source::SourceSummary;
