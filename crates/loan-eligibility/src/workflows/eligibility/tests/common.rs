use std::sync::Mutex;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::eligibility::domain::{
    ApplicantRecord, ApplicantSubmission, Category, CreditHistory, Dependents, Education, Gender,
    LoanTerm, Married, PropertyArea, SelfEmployed,
};
use crate::workflows::eligibility::encoding::{feature_names, FeatureVector};
use crate::workflows::eligibility::model::{
    ForestModel, Label, LoanClassifier, ModelInfo, PredictionError,
};

pub(super) const SCENARIO_VECTOR: [f64; 20] = [
    5000.0, 0.0, 150.0, 360.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

pub(super) fn scenario_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        gender: "Female".to_string(),
        married: "Yes".to_string(),
        dependents: "1".to_string(),
        education: "Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: 5000,
        coapplicant_income: 0,
        loan_amount: 150,
        loan_amount_term: 360,
        credit_history: 1,
        property_area: "Urban".to_string(),
    }
}

pub(super) fn no_credit_submission() -> ApplicantSubmission {
    let mut submission = scenario_submission();
    submission.credit_history = 0;
    submission
}

pub(super) fn scenario_record() -> ApplicantRecord {
    ApplicantRecord::try_from(scenario_submission()).expect("scenario is valid")
}

/// Every combination of categorical values with fixed numeric fields.
pub(super) fn all_records() -> Vec<ApplicantRecord> {
    let base = scenario_record();
    let mut records = Vec::new();
    for &gender in Gender::ALL {
        for &married in Married::ALL {
            for &dependents in Dependents::ALL {
                for &education in Education::ALL {
                    for &self_employed in SelfEmployed::ALL {
                        for &property_area in PropertyArea::ALL {
                            for loan_amount_term in LoanTerm::ALL {
                                for credit_history in [CreditHistory::Unmet, CreditHistory::Met] {
                                    records.push(ApplicantRecord {
                                        gender,
                                        married,
                                        dependents,
                                        education,
                                        self_employed,
                                        loan_amount_term,
                                        credit_history,
                                        property_area,
                                        ..base
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    records
}

/// Classifier returning a fixed label and remembering what it was asked.
pub(super) struct FixedClassifier {
    label: String,
    seen: Mutex<Vec<FeatureVector>>,
}

impl FixedClassifier {
    pub(super) fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().expect("classifier mutex poisoned").clone()
    }
}

impl LoanClassifier for FixedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label, PredictionError> {
        self.seen
            .lock()
            .expect("classifier mutex poisoned")
            .push(*features);
        Ok(Label::new(self.label.clone()))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            version: "test".to_string(),
            algorithm: "fixed".to_string(),
            estimators: 0,
            classes: vec![self.label.clone()],
            feature_names: feature_names(),
        }
    }
}

/// Classifier that approves only applicants with credit history, like the trained forest.
pub(super) struct CreditRuleClassifier;

impl LoanClassifier for CreditRuleClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Label, PredictionError> {
        match features.get(4) {
            Some(flag) if flag >= 1.0 => Ok(Label::new("Y")),
            Some(_) => Ok(Label::new("N")),
            None => Err(PredictionError::ShapeMismatch {
                expected: 20,
                actual: features.len(),
            }),
        }
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            version: "test".to_string(),
            algorithm: "credit_rule".to_string(),
            estimators: 1,
            classes: vec!["N".to_string(), "Y".to_string()],
            feature_names: feature_names(),
        }
    }
}

pub(super) struct FailingClassifier;

impl LoanClassifier for FailingClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<Label, PredictionError> {
        Err(PredictionError::ShapeMismatch {
            expected: 21,
            actual: 20,
        })
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            version: "broken".to_string(),
            algorithm: "failing".to_string(),
            estimators: 0,
            classes: Vec::new(),
            feature_names: feature_names(),
        }
    }
}

/// Artifact JSON with the encoder's feature names and `N`/`Y` classes around `trees`.
pub(super) fn forest_json(trees: &str) -> String {
    let names = serde_json::to_string(&feature_names()).expect("names serialize");
    format!(
        r#"{{"version":"test-1","feature_names":{names},"classes":["N","Y"],"trees":{trees}}}"#
    )
}

pub(super) fn forest_from(trees: &str) -> ForestModel {
    ForestModel::from_reader(forest_json(trees).as_bytes()).expect("forest artifact is valid")
}

pub(super) fn shipped_model_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models/loan_forest.json")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
