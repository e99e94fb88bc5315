/// Thumbnail Service - HTTP Server
///
/// Serves cached thumbnails, rendering them through the thumbnail API on
/// first request or when the source image changed.
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use prometheus::Registry;
use thumbnail_cache::ThumbnailMetrics;
use thumbnail_service::{configure, Config};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "thumbnail_service=info,thumbnail_cache=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    let registry = Registry::new();
    ThumbnailMetrics::register(&registry).context("Failed to register metrics")?;

    let cache = thumbnail_cache::connect(&config.cache)
        .await
        .context("Failed to initialize thumbnail cache")?;
    let cache = web::Data::new(cache);
    let registry = web::Data::new(registry);

    let bind_address = config.app.bind_address();
    info!(address = %bind_address, "Thumbnail service starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(cache.clone())
            .app_data(registry.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    info!("Thumbnail service shutting down");
    Ok(())
}
