use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use property_insights::error::AppError;
use property_insights::insights::{
    CoachRequest, CoachResponse, EnrichedProperty, PropertyFilter, SummaryStats,
};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/properties", get(properties_endpoint))
        .route("/api/insights/summary", get(summary_endpoint))
        .route("/api/coach", post(coach_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn properties_endpoint(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<Vec<EnrichedProperty>>, AppError> {
    let properties = state.insights.list_properties(&filter.normalized()).await?;
    Ok(Json(properties))
}

pub(crate) async fn summary_endpoint(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<Json<SummaryStats>, AppError> {
    let summary = state.insights.summary(&filter.normalized()).await?;
    Ok(Json(summary))
}

pub(crate) async fn coach_endpoint(
    State(state): State<AppState>,
    Json(request): Json<CoachRequest>,
) -> Json<CoachResponse> {
    Json(state.insights.coach(&request).await)
}
