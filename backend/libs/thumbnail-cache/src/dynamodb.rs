//! DynamoDB-backed [`MetadataStore`]
//!
//! One item per cache key, hash key `Index`. Strings are stored as `S`,
//! dimensions as `N`. Item encoding stays in this module.

use crate::error::{Result, ThumbnailCacheError};
use crate::keys::CacheKey;
use crate::models::{CacheRecord, CropMode};
use crate::traits::MetadataStore;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use std::num::NonZeroU32;
use tracing::debug;

pub const ATTR_INDEX: &str = "Index";
pub const ATTR_IMAGE_BUCKET: &str = "ImageBucket";
pub const ATTR_IMAGE_KEY: &str = "ImageKey";
pub const ATTR_IMAGE_ETAG: &str = "ImageETag";
pub const ATTR_THUMB_BUCKET: &str = "ThumbBucket";
pub const ATTR_THUMB_KEY: &str = "ThumbKey";
pub const ATTR_THUMB_CONTENT_TYPE: &str = "ThumbContentType";
pub const ATTR_WIDTH: &str = "Width";
pub const ATTR_HEIGHT: &str = "Height";
pub const ATTR_CROP: &str = "Crop";

pub type Item = HashMap<String, AttributeValue>;

#[derive(Clone)]
pub struct DynamoMetadataStore {
    client: Client,
    table: String,
}

impl DynamoMetadataStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(ATTR_INDEX, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| {
                ThumbnailCacheError::MetadataStore(format!(
                    "GetItem on {} failed: {}",
                    self.table,
                    DisplayErrorContext(&e)
                ))
            })?;

        match output.item() {
            Some(item) => {
                debug!(cache_key = %key, table = %self.table, "Cache record found");
                decode_item(item).map(Some)
            }
            None => {
                debug!(cache_key = %key, table = %self.table, "No cache record");
                Ok(None)
            }
        }
    }

    async fn put(&self, record: &CacheRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(encode_record(record)))
            .send()
            .await
            .map_err(|e| {
                ThumbnailCacheError::MetadataStore(format!(
                    "PutItem on {} failed: {}",
                    self.table,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }
}

/// Encode a record as a DynamoDB item; unset options are not written
pub fn encode_record(record: &CacheRecord) -> Item {
    let mut item = HashMap::new();
    item.insert(
        ATTR_INDEX.to_string(),
        AttributeValue::S(record.index.to_string()),
    );
    item.insert(
        ATTR_IMAGE_BUCKET.to_string(),
        AttributeValue::S(record.image_bucket.clone()),
    );
    item.insert(
        ATTR_IMAGE_KEY.to_string(),
        AttributeValue::S(record.image_key.clone()),
    );
    item.insert(
        ATTR_IMAGE_ETAG.to_string(),
        AttributeValue::S(record.image_etag.clone()),
    );
    item.insert(
        ATTR_THUMB_BUCKET.to_string(),
        AttributeValue::S(record.thumb_bucket.clone()),
    );
    item.insert(
        ATTR_THUMB_KEY.to_string(),
        AttributeValue::S(record.thumb_key.clone()),
    );
    item.insert(
        ATTR_THUMB_CONTENT_TYPE.to_string(),
        AttributeValue::S(record.thumb_content_type.clone()),
    );
    if let Some(width) = record.width {
        item.insert(ATTR_WIDTH.to_string(), AttributeValue::N(width.to_string()));
    }
    if let Some(height) = record.height {
        item.insert(
            ATTR_HEIGHT.to_string(),
            AttributeValue::N(height.to_string()),
        );
    }
    if let Some(crop) = record.crop {
        item.insert(ATTR_CROP.to_string(), AttributeValue::S(crop.to_string()));
    }
    item
}

/// Decode a stored item back into a record
pub fn decode_item(item: &Item) -> Result<CacheRecord> {
    Ok(CacheRecord {
        index: CacheKey::from_stored(required_s(item, ATTR_INDEX)?),
        image_bucket: required_s(item, ATTR_IMAGE_BUCKET)?,
        image_key: required_s(item, ATTR_IMAGE_KEY)?,
        image_etag: required_s(item, ATTR_IMAGE_ETAG)?,
        thumb_bucket: required_s(item, ATTR_THUMB_BUCKET)?,
        thumb_key: required_s(item, ATTR_THUMB_KEY)?,
        thumb_content_type: required_s(item, ATTR_THUMB_CONTENT_TYPE)?,
        width: optional_dimension(item, ATTR_WIDTH)?,
        height: optional_dimension(item, ATTR_HEIGHT)?,
        crop: optional_crop(item)?,
    })
}

fn malformed(name: &str, reason: &str) -> ThumbnailCacheError {
    ThumbnailCacheError::MetadataStore(format!("Malformed cache item: {} {}", name, reason))
}

fn required_s(item: &Item, name: &str) -> Result<String> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(malformed(name, "is not a string")),
        None => Err(malformed(name, "is missing")),
    }
}

fn optional_dimension(item: &Item, name: &str) -> Result<Option<NonZeroU32>> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => value
            .parse::<NonZeroU32>()
            .map(Some)
            .map_err(|_| malformed(name, "is not a positive integer")),
        Some(_) => Err(malformed(name, "is not a number")),
        None => Ok(None),
    }
}

fn optional_crop(item: &Item) -> Result<Option<CropMode>> {
    match item.get(ATTR_CROP) {
        Some(AttributeValue::S(value)) => value
            .parse::<CropMode>()
            .map(Some)
            .map_err(|e| malformed(ATTR_CROP, &e)),
        Some(_) => Err(malformed(ATTR_CROP, "is not a string")),
        None => Ok(None),
    }
}
