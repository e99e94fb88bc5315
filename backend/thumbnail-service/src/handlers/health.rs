use actix_web::{http::header, web, HttpResponse};
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::json;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "service": "thumbnail-service" }))
}

pub async fn live() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn ready() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Prometheus text exposition of the service registry
pub async fn metrics(registry: web::Data<Registry>) -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, encoder.format_type()))
        .body(buffer)
}
