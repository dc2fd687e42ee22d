use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{ApplicantSubmission, InvalidInput};
use super::model::LoanClassifier;
use super::service::{EligibilityError, EligibilityService};
use crate::error::AppError;

/// Router builder exposing the eligibility endpoints.
pub fn eligibility_router<C>(service: Arc<EligibilityService<C>>) -> Router
where
    C: LoanClassifier + 'static,
{
    Router::new()
        .route("/api/v1/loan/eligibility", post(evaluate_handler::<C>))
        .route("/api/v1/loan/eligibility/batch", post(batch_handler::<C>))
        .route("/api/v1/loan/features", post(features_handler::<C>))
        .route("/api/v1/loan/model", get(model_handler::<C>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    payload: Result<Json<ApplicantSubmission>, JsonRejection>,
) -> Response
where
    C: LoanClassifier + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.evaluate(&submission) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn batch_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    payload: Result<Json<Vec<ApplicantSubmission>>, JsonRejection>,
) -> Response
where
    C: LoanClassifier + 'static,
{
    let Json(submissions) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    if submissions.is_empty() {
        let payload = json!({ "error": "batch contains no applicants" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let results = service.evaluate_batch(&submissions);
    (StatusCode::OK, Json(json!({ "results": results }))).into_response()
}

pub(crate) async fn features_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    payload: Result<Json<ApplicantSubmission>, JsonRejection>,
) -> Response
where
    C: LoanClassifier + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.encode(&submission) {
        Ok(features) => {
            let payload = json!({
                "features": features,
                "columns": features.named(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => AppError::from(EligibilityError::from(err)).into_response(),
    }
}

pub(crate) async fn model_handler<C>(State(service): State<Arc<EligibilityService<C>>>) -> Response
where
    C: LoanClassifier + 'static,
{
    (StatusCode::OK, Json(service.model_info())).into_response()
}

/// Payloads that fail to deserialize still answer with the JSON error shape. Type and
/// missing-field failures name the offending field.
fn rejection_response(rejection: JsonRejection) -> Response {
    let detail = rejection.body_text();
    warn!(status = %rejection.status(), %detail, "applicant payload rejected");

    match &rejection {
        JsonRejection::JsonDataError(_) => match field_from_detail(&detail) {
            Some((field, reason)) => {
                let err = EligibilityError::from(InvalidInput { field, reason });
                AppError::from(err).into_response()
            }
            None => (rejection.status(), Json(json!({ "error": detail }))).into_response(),
        },
        _ => (rejection.status(), Json(json!({ "error": detail }))).into_response(),
    }
}

/// Pulls the field name out of a deserialization message such as
/// `...target type: [1].applicant_income: invalid type: ...` or
/// `...target type: missing field `loan_amount` at line 1 column 9`.
fn field_from_detail(detail: &str) -> Option<(&'static str, String)> {
    let message = detail
        .split_once("target type: ")
        .map_or(detail, |(_, rest)| rest);

    if let Some(found) = missing_field(message) {
        return Some(found);
    }

    let (path, reason) = message.split_once(": ")?;
    if let Some(found) = missing_field(reason) {
        return Some(found);
    }
    let name = path.rsplit('.').next()?;
    let field = ApplicantSubmission::field_named(name)?;
    Some((field, reason.to_string()))
}

fn missing_field(message: &str) -> Option<(&'static str, String)> {
    let rest = message.strip_prefix("missing field `")?;
    let (name, _) = rest.split_once('`')?;
    let field = ApplicantSubmission::field_named(name)?;
    Some((field, "value is missing".to_string()))
}
