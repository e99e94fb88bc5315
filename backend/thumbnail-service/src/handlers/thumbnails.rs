use crate::error::{AppError, Result};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use thumbnail_cache::{CropMode, ObjectRef, ThumbnailCache, ThumbnailOptions};
use tracing::info;

/// Query string of `GET /api/v1/thumbnails`
///
/// Sizes are taken as raw strings so malformed values produce the service's
/// JSON validation error instead of the extractor's plain-text one.
#[derive(Debug, Default, Deserialize)]
pub struct ThumbnailQuery {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub crop: Option<String>,
}

impl ThumbnailQuery {
    pub fn source(&self) -> Result<ObjectRef> {
        let bucket = required(&self.bucket, "bucket")?;
        let key = required(&self.key, "key")?;
        Ok(ObjectRef::new(bucket, key))
    }

    pub fn options(&self) -> Result<ThumbnailOptions> {
        let width = parse_dimension(&self.width, "width")?;
        let height = parse_dimension(&self.height, "height")?;
        let crop = match self.crop.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => Some(raw.parse::<CropMode>().map_err(AppError::ValidationError)?),
            None => None,
        };
        Ok(ThumbnailOptions::new(width, height, crop))
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(format!("{} is required", name))),
    }
}

// Empty and zero values mean "not set"
fn parse_dimension(value: &Option<String>, name: &str) -> Result<Option<u32>> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| {
            AppError::ValidationError(format!("{} must be a non-negative integer: {}", name, raw))
        }),
    }
}

/// Resolve a thumbnail, rendering it when missing or stale
pub async fn get_thumbnail(
    cache: web::Data<ThumbnailCache>,
    query: web::Query<ThumbnailQuery>,
) -> Result<HttpResponse> {
    let source = query.source()?;
    let options = query.options()?;

    let cached = cache.lookup_or_populate(&source, &options).await?;

    info!(
        image = %source,
        status = %cached.status,
        thumb_key = %cached.record.thumb_key,
        "Thumbnail resolved"
    );

    Ok(HttpResponse::Ok().json(cached))
}
