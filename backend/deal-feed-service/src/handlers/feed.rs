/// Deal Feed API Handlers
///
/// HTTP entry point for the ranked deal feed.
use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::FeedRequest;
use crate::services::FeedPipeline;

pub struct FeedHandlerState {
    pub pipeline: Arc<FeedPipeline>,
}

/// POST /api/v1/feed
///
/// Returns the ranked deals near `location` as `[{deal_id, title}]`.
pub async fn generate_deal_feed(
    body: web::Json<FeedRequest>,
    state: web::Data<FeedHandlerState>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let request_id = Uuid::new_v4();
    debug!(
        %request_id,
        user_id = %request.user_id,
        lat = request.location.latitude,
        lng = request.location.longitude,
        "Deal feed request"
    );

    match state
        .pipeline
        .generate_feed(&request.user_id, request.location.into(), Utc::now())
        .await
    {
        Ok((feed, _stats)) => {
            metrics::record_request(if feed.is_empty() { "empty" } else { "success" });
            Ok(HttpResponse::Ok().json(feed))
        }
        Err(e) => {
            metrics::record_request("error");
            warn!(%request_id, "Deal feed request failed: {}", e);
            Err(AppError::from(e))
        }
    }
}

/// Malformed bodies come back as `400 {"error": ...}` like every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .route("/feed", web::post().to(generate_deal_feed))
            .route("/health/live", web::get().to(super::health::liveness_check)),
    )
    .route("/metrics", web::get().to(metrics::serve_metrics));
}
