//! Thumbnail cache
//!
//! Memoizes rendered thumbnails keyed by source object and rendering options:
//! - Deterministic cache keys (`b={bucket}k={key}[w=..][h=..][c=..]`)
//! - Source change detection through S3 ETags
//! - Rendering delegated to the thumbnail HTTP API
//! - Records persisted in DynamoDB, one item per key
//!
//! # Example
//!
//! ```no_run
//! use thumbnail_cache::{ObjectRef, ThumbnailCacheConfig, ThumbnailOptions, CropMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ThumbnailCacheConfig::from_env()?;
//!     let cache = thumbnail_cache::connect(&config).await?;
//!
//!     let source = ObjectRef::new("imgs", "a.png");
//!     let options = ThumbnailOptions::default().with_width(100).with_crop(CropMode::Center);
//!     let cached = cache.lookup_or_populate(&source, &options).await?;
//!     println!("{} -> {}/{}", cached.status, cached.record.thumb_bucket, cached.record.thumb_key);
//!     Ok(())
//! }
//! ```

mod config;
mod coordinator;
mod error;
mod generator;
mod keys;
mod metrics;
mod models;
mod single_flight;
mod traits;

pub mod dynamodb;
pub mod renderer;
pub mod s3;

pub use config::ThumbnailCacheConfig;
pub use coordinator::ThumbnailCache;
pub use error::{ErrorKind, Result, ThumbnailCacheError};
pub use generator::ThumbnailGenerator;
pub use keys::CacheKey;
pub use metrics::ThumbnailMetrics;
pub use models::{CacheRecord, CacheStatus, CachedThumbnail, CropMode, ObjectRef, ThumbnailOptions};
pub use renderer::{HttpThumbnailApi, RenderOutcome, RenderRequest};
pub use single_flight::{KeyGuard, KeyLocks};
pub use traits::{MetadataStore, ObjectStore, RenderingCapability};

use dynamodb::DynamoMetadataStore;
use s3::S3ObjectStore;
use std::sync::Arc;
use tracing::info;

/// Build a [`ThumbnailCache`] wired to DynamoDB, S3 and the thumbnail API
pub async fn connect(config: &ThumbnailCacheConfig) -> Result<ThumbnailCache> {
    config.validate()?;

    let sdk_config = config.aws_sdk_config().await;

    let dynamodb = aws_sdk_dynamodb::Client::new(&sdk_config);

    // Custom endpoints (MinIO, LocalStack) need path-style addressing
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();
    let s3 = aws_sdk_s3::Client::from_conf(s3_config);

    let renderer = HttpThumbnailApi::new(&config.api_url, config.api_timeout())?;

    let mut cache = ThumbnailCache::new(
        Arc::new(DynamoMetadataStore::new(dynamodb, &config.table)),
        Arc::new(S3ObjectStore::new(s3)),
        Arc::new(renderer),
        &config.thumb_bucket,
    );
    if config.single_flight {
        cache = cache.with_single_flight();
    }

    info!(
        table = %config.table,
        thumb_bucket = %config.thumb_bucket,
        api_url = %config.api_url,
        single_flight = config.single_flight,
        "Thumbnail cache initialized"
    );

    Ok(cache)
}
