//! In-memory collaborators for thumbnail cache tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thumbnail_cache::{
    CacheKey, CacheRecord, MetadataStore, ObjectRef, ObjectStore, RenderOutcome, RenderRequest,
    RenderingCapability, Result, ThumbnailCache, ThumbnailCacheError,
};

pub const THUMB_BUCKET: &str = "thumbs";

/// Metadata store keeping records in a map
#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: Mutex<HashMap<CacheKey, CacheRecord>>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    fail_get: Mutex<bool>,
    fail_put: Mutex<bool>,
}

impl InMemoryMetadataStore {
    pub fn insert(&self, record: CacheRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.index.clone(), record);
    }

    pub fn record(&self, key: &CacheKey) -> Option<CacheRecord> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn fail_reads(&self) {
        *self.fail_get.lock().unwrap() = true;
    }

    pub fn fail_writes(&self) {
        *self.fail_put.lock().unwrap() = true;
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if *self.fail_get.lock().unwrap() {
            return Err(ThumbnailCacheError::MetadataStore(
                "ProvisionedThroughputExceededException".to_string(),
            ));
        }
        Ok(self.record(key))
    }

    async fn put(&self, record: &CacheRecord) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if *self.fail_put.lock().unwrap() {
            return Err(ThumbnailCacheError::MetadataStore(
                "ConditionalCheckFailed".to_string(),
            ));
        }
        self.insert(record.clone());
        Ok(())
    }
}

/// Object store with settable ETags
#[derive(Default)]
pub struct FakeObjectStore {
    etags: Mutex<HashMap<ObjectRef, String>>,
    pub heads: AtomicUsize,
    fail: Mutex<bool>,
}

impl FakeObjectStore {
    pub fn set_etag(&self, object: &ObjectRef, etag: &str) {
        self.etags
            .lock()
            .unwrap()
            .insert(object.clone(), etag.to_string());
    }

    /// Current ETag without counting a head request
    pub fn current_etag(&self, object: &ObjectRef) -> Option<String> {
        self.etags.lock().unwrap().get(object).cloned()
    }

    pub fn fail_heads(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn head_count(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn head_fingerprint(&self, object: &ObjectRef) -> Result<String> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(ThumbnailCacheError::ObjectStore(format!(
                "HeadObject {} failed: AccessDenied",
                object
            )));
        }
        self.etags
            .lock()
            .unwrap()
            .get(object)
            .cloned()
            .ok_or_else(|| ThumbnailCacheError::ObjectStore(format!("{} NotFound", object)))
    }
}

/// How the fake renderer answers
#[derive(Clone)]
pub enum RenderBehavior {
    /// Report the object store's current ETag for the source
    Succeed { thumb_type: String },
    Status(u16),
    Malformed,
    Unreachable,
}

/// Renderer that reads the current source ETag from a [`FakeObjectStore`],
/// the way the real API reads it from S3 while rendering
pub struct FakeRenderer {
    objects: Arc<FakeObjectStore>,
    behavior: Mutex<RenderBehavior>,
    requests: Mutex<Vec<RenderRequest>>,
    delay: Duration,
}

impl FakeRenderer {
    pub fn new(objects: Arc<FakeObjectStore>) -> Self {
        Self {
            objects,
            behavior: Mutex::new(RenderBehavior::Succeed {
                thumb_type: "image/png".to_string(),
            }),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_behavior(&self, behavior: RenderBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RenderingCapability for FakeRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            RenderBehavior::Succeed { thumb_type } => {
                let etag = self.objects.current_etag(&request.source).ok_or_else(|| {
                    ThumbnailCacheError::ExternalApi { status: 404 }
                })?;
                Ok(RenderOutcome {
                    image_etag: etag,
                    thumb_type,
                })
            }
            RenderBehavior::Status(status) => Err(ThumbnailCacheError::ExternalApi { status }),
            RenderBehavior::Malformed => RenderOutcome::from_body("{\"thumbType\":\"image/png\"}"),
            RenderBehavior::Unreachable => Err(ThumbnailCacheError::ThumbnailApi(
                "connection refused".to_string(),
            )),
        }
    }
}

/// A cache wired to fresh fakes
pub struct Harness {
    pub metadata: Arc<InMemoryMetadataStore>,
    pub objects: Arc<FakeObjectStore>,
    pub renderer: Arc<FakeRenderer>,
    pub cache: ThumbnailCache,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(Duration::ZERO, false)
    }

    pub fn build(render_delay: Duration, single_flight: bool) -> Self {
        let metadata = Arc::new(InMemoryMetadataStore::default());
        let objects = Arc::new(FakeObjectStore::default());
        let renderer = Arc::new(FakeRenderer::new(Arc::clone(&objects)).with_delay(render_delay));

        let mut cache = ThumbnailCache::new(
            metadata.clone(),
            objects.clone(),
            renderer.clone(),
            THUMB_BUCKET,
        );
        if single_flight {
            cache = cache.with_single_flight();
        }

        Self {
            metadata,
            objects,
            renderer,
            cache,
        }
    }
}
