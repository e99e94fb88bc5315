//! Thumbnail Service
//!
//! HTTP front end for the thumbnail cache: resolves a source image plus
//! rendering options to a stored thumbnail, rendering it on demand.

pub mod config;
pub mod error;
pub mod handlers;

pub use config::Config;
pub use error::{AppError, Result};

use actix_web::web;

/// Register all service routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(handlers::metrics))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health))
                .route("/health/live", web::get().to(handlers::live))
                .route("/health/ready", web::get().to(handlers::ready))
                .route("/thumbnails", web::get().to(handlers::get_thumbnail)),
        );
}
