//! Server mode
//!
//! Runs the startup pipeline (fetch → extract → open) and then serves HTTP.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{AppStartTime, health_routes, locate_routes};
use crate::config::{AppConfig, CorsConfig};
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Use '[\"*\"]' to allow any origin."
        );
    }
}

/// Build CORS middleware from configuration
///
/// Handles preflight requests; the wildcard headers on plain responses come
/// from [`cors_default_headers`].
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "HEAD", "OPTIONS"])
        .allow_any_header()
        .max_age(cors_config.max_age);

    if cors_config.is_any_origin() {
        cors = cors.allow_any_origin().send_wildcard();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Wildcard CORS headers added to every response when any origin is allowed
pub fn cors_default_headers(cors_config: &CorsConfig) -> DefaultHeaders {
    let headers = DefaultHeaders::new();
    if cors_config.is_any_origin() {
        headers
            .add(("Access-Control-Allow-Origin", "*"))
            .add(("Access-Control-Allow-Headers", "*"))
    } else {
        headers
    }
}

/// Register all HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_routes()).service(locate_routes());
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let (startup, _report) = lifetime::startup::prepare_database(&config.geoip)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;
    let resolver = startup.resolver;

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);
    let proxy_config = config.proxy.clone();

    if proxy_config.trusted_proxies.is_empty() {
        info!(
            "Client IP: auto-detect mode. Connections from private IPs will use X-Forwarded-For."
        );
    } else {
        info!(
            "Client IP: explicit trusted proxies configured: {:?}",
            proxy_config.trusted_proxies
        );
    }

    let workers = config.server.workers.clamp(1, 32);
    info!("Using {} workers for the server", workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(cors_default_headers(&cors_config))
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .app_data(web::Data::new(resolver.clone()))
            .app_data(web::Data::new(proxy_config.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers)
    .disable_signals();

    let bind_address = (config.server.host.as_str(), config.server.port);
    warn!(
        "Starting server at http://{}:{}",
        config.server.host, config.server.port
    );
    let server = server.bind(bind_address)?.run();

    tokio::spawn(lifetime::shutdown::listen_for_shutdown(server.handle()));
    server.await?;

    Ok(())
}
