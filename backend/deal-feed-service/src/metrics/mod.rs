//! Prometheus metrics for deal-feed-service.
//!
//! Collectors for the ranking pipeline and the `/metrics` HTTP handler.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Duration;

static FEED_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "deal_feed_requests_total",
        "Total deal feed requests by outcome",
        &["status"]
    )
    .expect("Failed to register deal feed requests metric")
});

static PIPELINE_STAGE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "deal_feed_pipeline_duration_seconds",
        "Duration of deal feed pipeline stages",
        &["stage"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 3.0]
    )
    .expect("Failed to register deal feed pipeline duration metric")
});

static CANDIDATES_DROPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "deal_feed_candidates_dropped_total",
        "Candidates removed at the content gate",
        &["reason"]
    )
    .expect("Failed to register deal feed dropped candidates metric")
});

/// Record request outcome (success/empty/error)
pub fn record_request(status: &str) {
    FEED_REQUESTS_TOTAL.with_label_values(&[status]).inc();
}

pub fn record_stage_duration(stage: &str, duration: Duration) {
    PIPELINE_STAGE_DURATION_SECONDS
        .with_label_values(&[stage])
        .observe(duration.as_secs_f64());
}

/// Record gate drops by reason (blocked/malformed)
pub fn record_dropped(reason: &str, count: usize) {
    if count > 0 {
        CANDIDATES_DROPPED_TOTAL
            .with_label_values(&[reason])
            .inc_by(count as u64);
    }
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
