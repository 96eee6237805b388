use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Largest accepted capacity for the URL and result queues
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// Configuration for a fetch-and-extract run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Queue capacity as a multiple of the worker count
    #[serde(default = "default_queue_factor")]
    pub queue_factor: usize,

    /// Timeout for a single GET, from send to response headers
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Overall timeout configured on the shared HTTP client
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,

    /// Timeout for establishing a connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// TCP keep-alive interval
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,

    /// Whether hosts with self-signed or otherwise invalid certificates are fetched
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Longest accepted input line in bytes
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,

    /// Upper bound on body bytes buffered while looking for a title
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_factor: default_queue_factor(),
            request_timeout_secs: default_request_timeout_secs(),
            client_timeout_secs: default_client_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            keepalive_secs: default_keepalive_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
            max_line_bytes: default_max_line_bytes(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Checks every value that would make the pipeline unable to run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config("workers", "worker count must be at least 1"));
        }
        if self.queue_factor == 0 {
            return Err(Error::config(
                "queue_factor",
                "queue factor must be at least 1",
            ));
        }
        match self.workers.checked_mul(self.queue_factor) {
            Some(capacity) if capacity <= MAX_QUEUE_CAPACITY => {}
            _ => {
                return Err(Error::config(
                    "workers",
                    format!(
                        "workers ({}) x queue_factor ({}) exceeds the queue capacity limit of {}",
                        self.workers, self.queue_factor, MAX_QUEUE_CAPACITY
                    ),
                ));
            }
        }
        if self.max_line_bytes == 0 {
            return Err(Error::config(
                "max_line_bytes",
                "maximum line length must be at least 1 byte",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::config(
                "max_body_bytes",
                "maximum body size must be at least 1 byte",
            ));
        }
        for (key, value) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("client_timeout_secs", self.client_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::config(key, format!("{key} must be greater than 0")));
            }
        }
        Ok(())
    }

    /// Capacity of both the URL queue and the result queue
    pub fn queue_capacity(&self) -> usize {
        self.workers
            .saturating_mul(self.queue_factor)
            .clamp(1, MAX_QUEUE_CAPACITY)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }
}

/// Default value for workers
fn default_workers() -> usize {
    5
}

fn default_queue_factor() -> usize {
    2
}

fn default_request_timeout_secs() -> u64 {
    12
}

fn default_client_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_keepalive_secs() -> u64 {
    30
}

fn default_accept_invalid_certs() -> bool {
    true
}

/// 1 MiB, enough for any realistic URL
fn default_max_line_bytes() -> usize {
    1024 * 1024
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
