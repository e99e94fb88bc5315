//! Collaborator seams
//!
//! The coordinator and generator only talk to these traits, so the DynamoDB,
//! S3 and HTTP implementations can be swapped for fakes in tests.

use crate::error::Result;
use crate::keys::CacheKey;
use crate::models::{CacheRecord, ObjectRef};
use crate::renderer::{RenderOutcome, RenderRequest};
use async_trait::async_trait;

/// Durable owner of cache records
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Fetch the record stored under `key`, if any
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>>;

    /// Store `record` under `record.index`, replacing any previous record
    async fn put(&self, record: &CacheRecord) -> Result<()>;
}

/// Read-only view of object metadata
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Current content fingerprint (ETag) of `object`
    async fn head_fingerprint(&self, object: &ObjectRef) -> Result<String>;
}

/// External service that renders a thumbnail from a source object
#[async_trait]
pub trait RenderingCapability: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome>;
}
