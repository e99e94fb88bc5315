//! HTTP client for the thumbnail rendering API
//!
//! The API reads the source image from S3, writes the thumbnail to the given
//! destination and answers with the source ETag it saw plus the thumbnail's
//! content type:
//!
//! ```text
//! GET {base}?imagebucket=..&imagekey=..&thumbbucket=..&thumbkey=..[&width=..][&height=..][&crop=..]
//! 200 {"imageETag": "\"9b2cf535f27731c974343645a3985328\"", "thumbType": "image/png"}
//! ```

use crate::error::{Result, ThumbnailCacheError};
use crate::models::{ObjectRef, ThumbnailOptions};
use crate::traits::RenderingCapability;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// One render invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub source: ObjectRef,
    pub destination: ObjectRef,
    pub options: ThumbnailOptions,
}

impl RenderRequest {
    pub fn new(source: &ObjectRef, destination: &ObjectRef, options: &ThumbnailOptions) -> Self {
        Self {
            source: source.clone(),
            destination: destination.clone(),
            options: *options,
        }
    }

    /// Query parameters in API order; unset options are left out so the API
    /// applies its own defaults
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("imagebucket", self.source.bucket.clone()),
            ("imagekey", self.source.key.clone()),
            ("thumbbucket", self.destination.bucket.clone()),
            ("thumbkey", self.destination.key.clone()),
        ];
        if let Some(width) = self.options.width {
            pairs.push(("width", width.to_string()));
        }
        if let Some(height) = self.options.height {
            pairs.push(("height", height.to_string()));
        }
        if let Some(crop) = self.options.crop {
            pairs.push(("crop", crop.to_string()));
        }
        pairs
    }
}

/// Fields read from a successful render response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderOutcome {
    #[serde(rename = "imageETag")]
    pub image_etag: String,
    #[serde(rename = "thumbType")]
    pub thumb_type: String,
}

impl RenderOutcome {
    /// Parse a response body. Extra fields are ignored.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            ThumbnailCacheError::BadResponse(format!("Failed to parse render response: {}", e))
        })
    }
}

/// [`RenderingCapability`] backed by the thumbnail HTTP API
#[derive(Clone)]
pub struct HttpThumbnailApi {
    client: Client,
    base_url: Url,
}

impl HttpThumbnailApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ThumbnailCacheError::Config(format!("Invalid thumbnail API URL {}: {}", base_url, e))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ThumbnailCacheError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Use an already configured client (shared connection pool, custom TLS)
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl RenderingCapability for HttpThumbnailApi {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, image = %request.source, "Thumbnail API unreachable");
                ThumbnailCacheError::ThumbnailApi(e.to_string())
            })?;

        debug!(url = %response.url(), status = %response.status(), "Thumbnail API responded");

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), image = %request.source, "Thumbnail API request error");
            return Err(ThumbnailCacheError::ExternalApi {
                status: status.as_u16(),
            });
        }

        // Body read failures after a 200 count as a bad response
        let body = response.text().await.map_err(|e| {
            warn!(error = %e, image = %request.source, "Thumbnail API response body unreadable");
            ThumbnailCacheError::BadResponse(format!("Failed to read render response: {}", e))
        })?;
        debug!(body = %body, "Thumbnail API response body");

        RenderOutcome::from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CropMode;

    fn request(options: ThumbnailOptions) -> RenderRequest {
        RenderRequest::new(
            &ObjectRef::new("imgs", "a.png"),
            &ObjectRef::new("thumbs", "0d9e"),
            &options,
        )
    }

    #[test]
    fn test_query_pairs_without_options() {
        let pairs = request(ThumbnailOptions::default()).query_pairs();
        let names: Vec<&str> = pairs.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["imagebucket", "imagekey", "thumbbucket", "thumbkey"]);
    }

    #[test]
    fn test_query_pairs_with_options() {
        let pairs = request(ThumbnailOptions::new(Some(100), None, Some(CropMode::North)))
            .query_pairs();
        assert_eq!(pairs[4], ("width", "100".to_string()));
        assert_eq!(pairs[5], ("crop", "North".to_string()));
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn test_parse_outcome() {
        let outcome =
            RenderOutcome::from_body(r#"{"imageETag":"e1","thumbType":"image/png","size":12}"#)
                .unwrap();
        assert_eq!(outcome.image_etag, "e1");
        assert_eq!(outcome.thumb_type, "image/png");
    }

    #[test]
    fn test_parse_outcome_missing_field() {
        let err = RenderOutcome::from_body(r#"{"imageETag":"e1"}"#).unwrap_err();
        assert!(matches!(err, ThumbnailCacheError::BadResponse(_)));
    }

    #[test]
    fn test_parse_outcome_not_json() {
        let err = RenderOutcome::from_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ThumbnailCacheError::BadResponse(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpThumbnailApi::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ThumbnailCacheError::Config(_))));
    }
}
