use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::domain::{ApplicantRecord, ApplicantSubmission, InvalidInput};
use super::encoding::FeatureVector;
use super::model::{Label, LoanClassifier, ModelInfo, PredictionError, Verdict};

/// Service composing the feature encoder with an injected, read-only classifier.
pub struct EligibilityService<C> {
    classifier: Arc<C>,
}

impl<C> EligibilityService<C>
where
    C: LoanClassifier + 'static,
{
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    pub fn model_info(&self) -> ModelInfo {
        self.classifier.info()
    }

    /// Validate and encode without consulting the model.
    pub fn encode(&self, submission: &ApplicantSubmission) -> Result<FeatureVector, InvalidInput> {
        let record = ApplicantRecord::try_from(submission).map_err(|err| {
            warn!(field = err.field, reason = %err.reason, "submission rejected");
            err
        })?;
        Ok(FeatureVector::from_record(&record))
    }

    /// Run a single submission through validation, encoding, and prediction.
    pub fn evaluate(
        &self,
        submission: &ApplicantSubmission,
    ) -> Result<EligibilityOutcome, EligibilityError> {
        let features = self.encode(submission)?;
        Ok(self.predict(features)?)
    }

    pub fn evaluate_record(
        &self,
        record: &ApplicantRecord,
    ) -> Result<EligibilityOutcome, PredictionError> {
        self.predict(FeatureVector::from_record(record))
    }

    /// Evaluate each submission independently; one failure never aborts the rest.
    pub fn evaluate_batch(&self, submissions: &[ApplicantSubmission]) -> Vec<BatchEntry> {
        submissions
            .iter()
            .enumerate()
            .map(|(index, submission)| match self.evaluate(submission) {
                Ok(outcome) => BatchEntry::Evaluated { index, outcome },
                Err(err) => BatchEntry::Rejected {
                    index,
                    field: err.field(),
                    error: err.public_message(),
                },
            })
            .collect()
    }

    fn predict(&self, features: FeatureVector) -> Result<EligibilityOutcome, PredictionError> {
        let label = self.classifier.predict(&features).map_err(|err| {
            error!(error = %err, "prediction failed");
            err
        })?;
        let verdict = Verdict::from_label(&label);
        info!(?verdict, label = label.as_str(), "eligibility evaluated");

        Ok(EligibilityOutcome {
            verdict,
            label,
            message: verdict.message().to_string(),
            features,
            evaluated_at: Utc::now(),
        })
    }
}

/// Result of one eligibility evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityOutcome {
    pub verdict: Verdict,
    pub label: Label,
    pub message: String,
    pub features: FeatureVector,
    pub evaluated_at: DateTime<Utc>,
}

/// Per-submission entry of a batch evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchEntry {
    Evaluated {
        index: usize,
        outcome: EligibilityOutcome,
    },
    Rejected {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
        error: String,
    },
}

/// Error raised by the eligibility service. Always scoped to one submission.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl EligibilityError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EligibilityError::InvalidInput(err) => Some(err.field),
            EligibilityError::Prediction(_) => None,
        }
    }

    /// Text safe to show the applicant; model internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            EligibilityError::InvalidInput(err) => err.to_string(),
            EligibilityError::Prediction(_) => {
                "an error occurred during prediction".to_string()
            }
        }
    }
}
