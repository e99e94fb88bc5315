/// Thumbnail cache configuration
///
/// Loaded from environment variables with defaults for everything except the
/// destination bucket and the thumbnail API URL.
use crate::error::{Result, ThumbnailCacheError};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TABLE: &str = "thumbnail-cache";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailCacheConfig {
    /// DynamoDB table holding cache records
    pub table: String,
    /// Bucket that receives newly created thumbnails
    pub thumb_bucket: String,
    /// Base URL of the thumbnail rendering API
    pub api_url: String,
    /// HTTP timeout for one render call
    pub api_timeout_secs: u64,
    /// AWS region
    pub region: String,
    /// Endpoint override for LocalStack / MinIO
    pub endpoint_url: Option<String>,
    /// Serialize lookups per cache key inside this process
    pub single_flight: bool,
}

impl ThumbnailCacheConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let thumb_bucket = lookup("THUMB_BUCKET")
            .ok_or_else(|| ThumbnailCacheError::Config("THUMB_BUCKET not set".to_string()))?;
        let api_url = lookup("THUMBNAIL_API_URL").ok_or_else(|| {
            ThumbnailCacheError::Config("THUMBNAIL_API_URL not set".to_string())
        })?;

        let config = Self {
            table: lookup("THUMB_CACHE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            thumb_bucket,
            api_url,
            api_timeout_secs: lookup("THUMBNAIL_API_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_API_TIMEOUT_SECS),
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            single_flight: lookup("THUMB_CACHE_SINGLE_FLIGHT")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(ThumbnailCacheError::Config(
                "Cache table name is empty".to_string(),
            ));
        }
        if self.thumb_bucket.trim().is_empty() {
            return Err(ThumbnailCacheError::Config(
                "Thumbnail bucket name is empty".to_string(),
            ));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ThumbnailCacheError::Config(format!(
                "Thumbnail API URL must be http(s): {}",
                self.api_url
            )));
        }
        if self.api_timeout_secs == 0 {
            return Err(ThumbnailCacheError::Config(
                "Thumbnail API timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Shared AWS SDK configuration (default credential chain)
    pub async fn aws_sdk_config(&self) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));

        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}
