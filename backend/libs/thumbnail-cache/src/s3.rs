//! S3-backed [`ObjectStore`]

use crate::error::{Result, ThumbnailCacheError};
use crate::models::ObjectRef;
use crate::traits::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::debug;

/// Reads source object ETags with `HeadObject`
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_fingerprint(&self, object: &ObjectRef) -> Result<String> {
        let response = self
            .client
            .head_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| {
                ThumbnailCacheError::ObjectStore(format!(
                    "HeadObject {} failed: {}",
                    object,
                    DisplayErrorContext(&e)
                ))
            })?;

        let etag = response.e_tag().ok_or_else(|| {
            ThumbnailCacheError::ObjectStore(format!("HeadObject {} returned no ETag", object))
        })?;

        debug!(object = %object, etag = %etag, "Source object fingerprint");
        Ok(etag.to_string())
    }
}
