//! # Quill API Server
//!
//! Actix-web HTTP server for the blog: posts, categories and tags.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use quill_core::domain::BLOG_EVENTS_CHANNEL;
use quill_core::ports::{EventPublisher, PubSub};
use quill_infra::{InMemoryPubSub, PubSubEventPublisher};

mod config;
mod handlers;
mod middleware;
mod observability;
mod params;
mod payload;
mod state;
mod telemetry;
mod transformers;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting Quill API Server"
    );

    let db = quill_infra::connect(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    let publisher = PubSubEventPublisher::new(InMemoryPubSub::default());
    publisher
        .pubsub()
        .subscribe(BLOG_EVENTS_CHANNEL, |msg| async move {
            tracing::info!(channel = %msg.channel, payload = %msg.payload, "Blog event");
        })
        .await
        .map_err(std::io::Error::other)?;
    let events: Arc<dyn EventPublisher> = Arc::new(publisher);

    let state = AppState::new(db, events, config.blog.clone());
    let blog = web::Data::new(config.blog.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .app_data(blog.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
