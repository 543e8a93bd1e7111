//! Harness configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

/// Deployment the harness targets when nothing else is configured
pub const DEFAULT_BASE_URL: &str =
    "https://4241007d-c4b5-4561-b535-0ad4d454dd48.preview.emergentagent.com/api";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// API root, including the `/api` prefix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Number of chunks used by the chunked upload group
    pub upload_chunks: u32,

    /// Directory for `test-results.json` (None = don't write)
    pub results_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            upload_chunks: 3,
            results_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values and normalise the base URL
    pub fn validate(mut self) -> E2eResult<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        let url = reqwest::Url::parse(&trimmed)
            .map_err(|e| E2eError::Config(format!("base_url '{}': {}", self.base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(E2eError::Config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(E2eError::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.upload_chunks == 0 {
            return Err(E2eError::Config("upload_chunks must be at least 1".to_string()));
        }

        self.base_url = trimmed;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
