use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Extension;
use axum::Json;
use loan_eligibility::workflows::eligibility::{
    eligibility_router, EligibilityService, LoanClassifier,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

const INDEX_PAGE: &str = include_str!("../static/index.html");

pub(crate) fn with_eligibility_routes<C>(service: Arc<EligibilityService<C>>) -> axum::Router
where
    C: LoanClassifier + 'static,
{
    eligibility_router(service)
        .route("/", axum::routing::get(index_page))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/loan/feature-importance",
            axum::routing::get(feature_importance_endpoint),
        )
}

pub(crate) async fn index_page() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Streams the pre-rendered feature importance chart; it is never computed here.
pub(crate) async fn feature_importance_endpoint(
    Extension(state): Extension<AppState>,
) -> Response {
    let path = state.feature_importance.as_path();
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "feature importance image not found");
            let payload = json!({ "warning": "Feature importance image not found." });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "feature importance image unreadable");
            let payload = json!({ "error": "feature importance image could not be read" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
