use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deal_feed_service::config::Config;
use deal_feed_service::handlers::{configure_routes, FeedHandlerState};
use deal_feed_service::services::{
    FeedPipeline, RpcCandidateRetriever, StaticBlockedContent, StaticCuisinePreferences,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting deal-feed-service v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);

    let retriever = match RpcCandidateRetriever::new(&config.retrieval) {
        Ok(retriever) => retriever,
        Err(e) => {
            tracing::error!("Deal retriever initialization failed: {}", e);
            eprintln!("ERROR: Failed to build deal retriever: {}", e);
            std::process::exit(1);
        }
    };
    info!("Deal retrieval RPC endpoint: {}", retriever.endpoint());

    let pipeline = FeedPipeline::builder(
        Arc::new(retriever),
        Arc::new(StaticCuisinePreferences::new(
            config.providers.preferred_cuisine_ids.clone(),
        )),
        Arc::new(StaticBlockedContent::new(
            config.providers.blocked_deal_ids.clone(),
        )),
    )
    .ranking(config.ranking.clone())
    .radius_miles(config.retrieval.radius_miles)
    .build();

    let feed_state = web::Data::new(FeedHandlerState {
        pipeline: Arc::new(pipeline),
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(feed_state.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
