mod forest;

pub use forest::{ArtifactError, ForestModel};

use serde::{Deserialize, Serialize};

use super::encoding::FeatureVector;

/// Class the model emits for an approvable applicant.
pub const ELIGIBLE_LABEL: &str = "Y";

/// Opaque category value returned by a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub String);

impl Label {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Binary outcome rendered to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Eligible,
    NotEligible,
}

impl Verdict {
    /// Only the exact eligible marker counts as approval; unknown labels are negative.
    pub fn from_label(label: &Label) -> Self {
        if label.as_str() == ELIGIBLE_LABEL {
            Verdict::Eligible
        } else {
            Verdict::NotEligible
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Verdict::Eligible => "You are eligible for the loan!",
            Verdict::NotEligible => "Sorry, you are not eligible for the loan.",
        }
    }
}

/// Read-only classifier injected into the eligibility service.
pub trait LoanClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Label, PredictionError>;
    fn info(&self) -> ModelInfo;
}

/// Metadata describing the loaded model for operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub version: String,
    pub algorithm: String,
    pub estimators: usize,
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
}

/// Failure raised by a single prediction call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// For classifiers whose input width differs from the encoded vector.
    #[error("model expects {expected} features, received {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("tree {tree} reached a leaf with no class weight")]
    EmptyLeaf { tree: usize },
    #[error("model failure: {0}")]
    Model(String),
}
