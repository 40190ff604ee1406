//! Application configuration domain model

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::files::{FileSizePolicy, DEFAULT_MAX_FILE_SIZE};
use crate::retry::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
}

/// REST backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

/// Where session snapshots live. `None` keeps them in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub snapshot_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Map a parsed TOML document onto the config. Missing keys keep their
    /// default values.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let section = |name: &str| toml_value.get(name);

        let base_url = section("api")
            .and_then(|s| s.get("base_url"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or(defaults.api.base_url);
        let timeout_secs = section("api")
            .and_then(|s| s.get("timeout_secs"))
            .and_then(|v| v.as_integer())
            .map(u64::try_from)
            .transpose()?
            .unwrap_or(defaults.api.timeout_secs);
        let max_file_size_bytes = section("upload")
            .and_then(|s| s.get("max_file_size_bytes"))
            .and_then(|v| v.as_integer())
            .map(u64::try_from)
            .transpose()?
            .unwrap_or(defaults.upload.max_file_size_bytes);
        let max_attempts = section("retry")
            .and_then(|s| s.get("max_attempts"))
            .and_then(|v| v.as_integer())
            .map(u32::try_from)
            .transpose()?
            .unwrap_or(defaults.retry.max_attempts);
        let backoff_ms = section("retry")
            .and_then(|s| s.get("backoff_ms"))
            .and_then(|v| v.as_integer())
            .map(u64::try_from)
            .transpose()?
            .unwrap_or(defaults.retry.backoff_ms);
        let snapshot_dir = section("storage")
            .and_then(|s| s.get("snapshot_dir"))
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout_secs,
            },
            upload: UploadConfig {
                max_file_size_bytes,
            },
            retry: RetryConfig {
                max_attempts,
                backoff_ms,
            },
            storage: StorageConfig { snapshot_dir },
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.backoff_ms),
        )
    }

    pub fn file_size_policy(&self) -> FileSizePolicy {
        FileSizePolicy::new(self.upload.max_file_size_bytes)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            upload: UploadConfig {
                max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            },
            retry: RetryConfig {
                max_attempts: 1,
                backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            },
            storage: StorageConfig::default(),
        }
    }
}
