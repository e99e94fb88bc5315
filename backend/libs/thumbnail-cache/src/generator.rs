//! Thumbnail generation
//!
//! Renders a thumbnail through the [`RenderingCapability`] and persists the
//! resulting [`CacheRecord`]. This is the only code path that writes records.

use crate::error::Result;
use crate::keys::CacheKey;
use crate::metrics::ThumbnailMetrics;
use crate::models::{CacheRecord, ObjectRef, ThumbnailOptions};
use crate::renderer::RenderRequest;
use crate::traits::{MetadataStore, RenderingCapability};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ThumbnailGenerator {
    renderer: Arc<dyn RenderingCapability>,
    store: Arc<dyn MetadataStore>,
    metrics: ThumbnailMetrics,
}

impl ThumbnailGenerator {
    pub fn new(renderer: Arc<dyn RenderingCapability>, store: Arc<dyn MetadataStore>) -> Self {
        Self {
            renderer,
            store,
            metrics: ThumbnailMetrics::new(),
        }
    }

    /// Render `source` into `destination` and store the new record.
    ///
    /// No retries. If the store write fails the rendered object stays in the
    /// destination bucket without a record pointing at it.
    pub async fn generate(
        &self,
        source: &ObjectRef,
        destination: &ObjectRef,
        options: &ThumbnailOptions,
    ) -> Result<CacheRecord> {
        let request = RenderRequest::new(source, destination, options);

        let started = Instant::now();
        let outcome = self.renderer.render(&request).await?;
        self.metrics.record_render(started.elapsed());

        let record = CacheRecord {
            index: CacheKey::derive(source, options),
            image_bucket: source.bucket.clone(),
            image_key: source.key.clone(),
            image_etag: outcome.image_etag,
            thumb_bucket: destination.bucket.clone(),
            thumb_key: destination.key.clone(),
            thumb_content_type: outcome.thumb_type,
            width: options.width,
            height: options.height,
            crop: options.crop,
        };

        if let Err(e) = self.store.put(&record).await {
            warn!(
                cache_key = %record.index,
                thumb = %destination,
                error = %e,
                "Thumbnail rendered but record write failed"
            );
            return Err(e);
        }

        debug!(
            cache_key = %record.index,
            image_etag = %record.image_etag,
            content_type = %record.thumb_content_type,
            "Thumbnail record stored"
        );

        Ok(record)
    }
}
