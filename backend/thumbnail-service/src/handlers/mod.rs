/// HTTP handlers for thumbnail-service
///
/// - Thumbnails: resolve a source image and options to a cached thumbnail
/// - Health: liveness, readiness and Prometheus metrics
pub mod health;
pub mod thumbnails;

pub use health::{health, live, metrics, ready};
pub use thumbnails::{get_thumbnail, ThumbnailQuery};
