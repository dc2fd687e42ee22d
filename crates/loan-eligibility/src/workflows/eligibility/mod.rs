//! Loan eligibility intake, feature encoding, and model-backed verdicts.
//!
//! Submissions are validated into an [`ApplicantRecord`], projected onto the fixed
//! [`FEATURE_SCHEMA`], and handed to an injected [`LoanClassifier`]. The classifier is
//! loaded once at startup and shared read-only for the life of the process.

pub mod batch;
pub mod domain;
pub mod encoding;
pub mod model;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use batch::{parse_applicants, ApplicantRow};
pub use domain::{
    ApplicantRecord, ApplicantSubmission, Category, CreditHistory, Dependents, Education, Gender,
    InvalidInput, LoanTerm, Married, PropertyArea, SelfEmployed, YesNo,
};
pub use encoding::{
    encode_submission, feature_names, FeatureColumn, FeatureVector, NamedFeature, FEATURE_COUNT,
    FEATURE_SCHEMA,
};
pub use model::{
    ArtifactError, ForestModel, Label, LoanClassifier, ModelInfo, PredictionError, Verdict,
    ELIGIBLE_LABEL,
};
pub use router::eligibility_router;
pub use service::{BatchEntry, EligibilityError, EligibilityOutcome, EligibilityService};
