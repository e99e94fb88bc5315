//! Cache key schema
//!
//! Key format: b={bucket}k={key}[w={width}][h={height}][c={crop}]
//!
//! Options are appended only when present and always in width, height, crop
//! order. Existing records are addressed by this exact string, so the format
//! must not change.

use crate::models::{ObjectRef, ThumbnailOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a cache record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a source object rendered with `options`
    pub fn derive(source: &ObjectRef, options: &ThumbnailOptions) -> Self {
        let mut key = format!("b={}k={}", source.bucket, source.key);
        if let Some(width) = options.width {
            key.push_str(&format!("w={}", width));
        }
        if let Some(height) = options.height {
            key.push_str(&format!("h={}", height));
        }
        if let Some(crop) = options.crop {
            key.push_str(&format!("c={}", crop));
        }
        CacheKey(key)
    }

    /// Wrap a key read back from the metadata store
    pub fn from_stored(raw: impl Into<String>) -> Self {
        CacheKey(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
