//! Thumbnail cache data model
//!
//! Field names of [`CacheRecord`] follow the stored item layout
//! (`Index`, `ImageBucket`, `ImageETag`, ...), which is also what callers of the
//! HTTP service receive.

use crate::keys::CacheKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// An object in the object store, addressed by bucket and key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Crop method understood by the thumbnail API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropMode {
    Center,
    North,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Center => "Center",
            CropMode::North => "North",
        }
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "center" => Ok(CropMode::Center),
            "north" => Ok(CropMode::North),
            _ => Err(format!("Unknown crop mode: {}", s)),
        }
    }
}

/// Optional rendering parameters
///
/// Absent fields are omitted from the cache key, the API request and the
/// stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThumbnailOptions {
    pub width: Option<NonZeroU32>,
    pub height: Option<NonZeroU32>,
    pub crop: Option<CropMode>,
}

impl ThumbnailOptions {
    /// Build options from raw dimensions. A zero dimension counts as unset.
    pub fn new(width: Option<u32>, height: Option<u32>, crop: Option<CropMode>) -> Self {
        Self {
            width: width.and_then(NonZeroU32::new),
            height: height.and_then(NonZeroU32::new),
            crop,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = NonZeroU32::new(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = NonZeroU32::new(height);
        self
    }

    pub fn with_crop(mut self, crop: CropMode) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.crop.is_none()
    }
}

/// Persisted metadata for one generated thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    #[serde(rename = "Index")]
    pub index: CacheKey,
    #[serde(rename = "ImageBucket")]
    pub image_bucket: String,
    #[serde(rename = "ImageKey")]
    pub image_key: String,
    /// Source ETag observed when the thumbnail was rendered
    #[serde(rename = "ImageETag")]
    pub image_etag: String,
    #[serde(rename = "ThumbBucket")]
    pub thumb_bucket: String,
    #[serde(rename = "ThumbKey")]
    pub thumb_key: String,
    #[serde(rename = "ThumbContentType")]
    pub thumb_content_type: String,
    #[serde(rename = "Width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<NonZeroU32>,
    #[serde(rename = "Height", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<NonZeroU32>,
    #[serde(rename = "Crop", default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropMode>,
}

impl CacheRecord {
    pub fn image_ref(&self) -> ObjectRef {
        ObjectRef::new(&self.image_bucket, &self.image_key)
    }

    /// Storage slot of the thumbnail, reused when the source changes
    pub fn thumb_ref(&self) -> ObjectRef {
        ObjectRef::new(&self.thumb_bucket, &self.thumb_key)
    }

    pub fn options(&self) -> ThumbnailOptions {
        ThumbnailOptions {
            width: self.width,
            height: self.height,
            crop: self.crop,
        }
    }
}

/// Outcome of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// No record existed; a thumbnail was rendered into a new slot
    Created,
    /// The source changed; the thumbnail was re-rendered into its existing slot
    Refreshed,
    /// The stored thumbnail is still current
    Unchanged,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Created => "created",
            CacheStatus::Refreshed => "refreshed",
            CacheStatus::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cache record together with how it was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedThumbnail {
    #[serde(flatten)]
    pub record: CacheRecord,
    #[serde(rename = "Status")]
    pub status: CacheStatus,
}
