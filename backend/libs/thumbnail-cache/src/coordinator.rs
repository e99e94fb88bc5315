//! Cache coordinator
//!
//! Decides, per request, whether the stored thumbnail can be served, must be
//! re-rendered because the source changed, or has to be created:
//!
//! 1. derive the cache key and read the record
//! 2. no record: render into a fresh slot in the thumbnail bucket
//! 3. record found: compare the stored source ETag with the current one
//!    - equal: serve the record as is
//!    - different: re-render into the record's existing slot

use crate::error::Result;
use crate::generator::ThumbnailGenerator;
use crate::keys::CacheKey;
use crate::metrics::ThumbnailMetrics;
use crate::models::{CacheRecord, CacheStatus, CachedThumbnail, ObjectRef, ThumbnailOptions};
use crate::single_flight::KeyLocks;
use crate::traits::{MetadataStore, ObjectStore, RenderingCapability};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Thumbnail cache client
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct ThumbnailCache {
    metadata: Arc<dyn MetadataStore>,
    objects: Arc<dyn ObjectStore>,
    generator: ThumbnailGenerator,
    thumb_bucket: String,
    key_locks: Option<Arc<KeyLocks>>,
    metrics: ThumbnailMetrics,
}

impl ThumbnailCache {
    /// Create a cache writing new thumbnails to `thumb_bucket`
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        objects: Arc<dyn ObjectStore>,
        renderer: Arc<dyn RenderingCapability>,
        thumb_bucket: impl Into<String>,
    ) -> Self {
        let generator = ThumbnailGenerator::new(renderer, Arc::clone(&metadata));
        Self {
            metadata,
            objects,
            generator,
            thumb_bucket: thumb_bucket.into(),
            key_locks: None,
            metrics: ThumbnailMetrics::new(),
        }
    }

    /// Serialize lookups per cache key within this process.
    ///
    /// Off by default: without it, concurrent misses for one key each render
    /// and the last record write wins.
    pub fn with_single_flight(mut self) -> Self {
        self.key_locks = Some(Arc::new(KeyLocks::new()));
        self
    }

    pub fn thumb_bucket(&self) -> &str {
        &self.thumb_bucket
    }

    /// Return the thumbnail record for `source` rendered with `options`,
    /// creating or refreshing it when needed
    pub async fn lookup_or_populate(
        &self,
        source: &ObjectRef,
        options: &ThumbnailOptions,
    ) -> Result<CachedThumbnail> {
        let key = CacheKey::derive(source, options);
        debug!(cache_key = %key, "Thumbnail lookup");

        let _guard = match &self.key_locks {
            Some(locks) => Some(locks.acquire(&key).await),
            None => None,
        };

        let result = self.resolve(&key, source, options).await;
        match &result {
            Ok(cached) => self.metrics.record_lookup(cached.status),
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Thumbnail lookup failed");
                self.metrics.record_error(e.kind());
            }
        }
        result
    }

    async fn resolve(
        &self,
        key: &CacheKey,
        source: &ObjectRef,
        options: &ThumbnailOptions,
    ) -> Result<CachedThumbnail> {
        let existing = match self.metadata.get(key).await? {
            Some(record) => record,
            None => return self.create(key, source, options).await,
        };

        let current_etag = self.objects.head_fingerprint(source).await?;
        if current_etag == existing.image_etag {
            debug!(cache_key = %key, "Thumbnail is current");
            return Ok(CachedThumbnail {
                record: existing,
                status: CacheStatus::Unchanged,
            });
        }

        self.refresh(key, source, options, existing, current_etag)
            .await
    }

    async fn create(
        &self,
        key: &CacheKey,
        source: &ObjectRef,
        options: &ThumbnailOptions,
    ) -> Result<CachedThumbnail> {
        let destination = ObjectRef::new(&self.thumb_bucket, Uuid::new_v4().to_string());

        let record = self.generator.generate(source, &destination, options).await?;
        info!(cache_key = %key, thumb = %destination, "Thumbnail created");

        Ok(CachedThumbnail {
            record,
            status: CacheStatus::Created,
        })
    }

    async fn refresh(
        &self,
        key: &CacheKey,
        source: &ObjectRef,
        options: &ThumbnailOptions,
        existing: CacheRecord,
        current_etag: String,
    ) -> Result<CachedThumbnail> {
        let destination = existing.thumb_ref();

        let record = self.generator.generate(source, &destination, options).await?;
        info!(
            cache_key = %key,
            thumb = %destination,
            previous_etag = %existing.image_etag,
            current_etag = %current_etag,
            "Thumbnail refreshed"
        );

        Ok(CachedThumbnail {
            record,
            status: CacheStatus::Refreshed,
        })
    }
}
