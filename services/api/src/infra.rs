use loan_eligibility::error::AppError;
use loan_eligibility::workflows::eligibility::{ForestModel, LoanClassifier, LoanTerm};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) feature_importance: Arc<PathBuf>,
}

/// Load the model artifact once; failure stops the process before it accepts submissions.
pub(crate) fn load_classifier(path: &Path) -> Result<Arc<ForestModel>, AppError> {
    match ForestModel::load(path) {
        Ok(model) => {
            let info = model.info();
            info!(
                path = %path.display(),
                version = %info.version,
                estimators = info.estimators,
                "model artifact loaded"
            );
            Ok(Arc::new(model))
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "model artifact unavailable");
            Err(err.into())
        }
    }
}

/// Restricts loan terms to the options offered on the form.
pub(crate) fn parse_loan_term(raw: &str) -> Result<i64, String> {
    let months = raw
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("'{raw}' is not a number of months ({err})"))?;
    LoanTerm::from_months(months)
        .map(|term| i64::from(term.months()))
        .map_err(|err| err.reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_term_parser_accepts_form_options_only() {
        assert_eq!(parse_loan_term("360"), Ok(360));
        assert_eq!(parse_loan_term(" 60 "), Ok(60));
        assert!(parse_loan_term("300").is_err());
        assert!(parse_loan_term("thirty").is_err());
    }

    #[test]
    fn missing_artifact_is_fatal() {
        let result = load_classifier(Path::new("models/not-shipped.json"));
        assert!(matches!(result, Err(AppError::Artifact(_))));
    }
}
