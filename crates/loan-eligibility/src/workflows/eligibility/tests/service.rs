use std::sync::Arc;

use super::common::*;
use crate::workflows::eligibility::model::{Label, PredictionError, Verdict};
use crate::workflows::eligibility::service::{BatchEntry, EligibilityError, EligibilityService};

#[test]
fn eligible_marker_yields_eligible_verdict() {
    let classifier = Arc::new(FixedClassifier::new("Y"));
    let service = EligibilityService::new(classifier.clone());

    let outcome = service
        .evaluate(&scenario_submission())
        .expect("evaluation succeeds");

    assert_eq!(outcome.verdict, Verdict::Eligible);
    assert_eq!(outcome.label, Label::new("Y"));
    assert_eq!(outcome.message, "You are eligible for the loan!");
    assert_eq!(outcome.features.as_slice(), &SCENARIO_VECTOR[..]);

    let seen = classifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].as_slice(), &SCENARIO_VECTOR[..]);
}

#[test]
fn any_other_label_is_not_eligible() {
    for label in ["N", "maybe", ""] {
        let service = EligibilityService::new(Arc::new(FixedClassifier::new(label)));
        let outcome = service
            .evaluate(&no_credit_submission())
            .expect("evaluation succeeds");
        assert_eq!(outcome.verdict, Verdict::NotEligible);
        assert_eq!(outcome.message, "Sorry, you are not eligible for the loan.");
        assert_eq!(outcome.features.get(4), Some(0.0));
    }
}

#[test]
fn invalid_input_never_reaches_the_classifier() {
    let classifier = Arc::new(FixedClassifier::new("Y"));
    let service = EligibilityService::new(classifier.clone());
    let mut submission = scenario_submission();
    submission.gender = "Other".to_string();

    match service.evaluate(&submission) {
        Err(EligibilityError::InvalidInput(err)) => assert_eq!(err.field, "gender"),
        other => panic!("expected invalid input, got {other:?}"),
    }
    assert!(classifier.seen().is_empty());
}

#[test]
fn prediction_failure_is_scoped_and_generic() {
    let service = EligibilityService::new(Arc::new(FailingClassifier));

    let err = service
        .evaluate(&scenario_submission())
        .expect_err("classifier fails");
    assert!(matches!(
        err,
        EligibilityError::Prediction(PredictionError::ShapeMismatch { .. })
    ));
    assert_eq!(err.field(), None);
    assert_eq!(err.public_message(), "an error occurred during prediction");

    // The service stays usable for the next submission.
    assert!(service.encode(&scenario_submission()).is_ok());
}

#[test]
fn batch_keeps_going_past_rejected_entries() {
    let service = EligibilityService::new(Arc::new(CreditRuleClassifier));
    let mut invalid = scenario_submission();
    invalid.loan_amount = -5;

    let entries = service.evaluate_batch(&[scenario_submission(), invalid, no_credit_submission()]);
    assert_eq!(entries.len(), 3);

    match &entries[0] {
        BatchEntry::Evaluated { index, outcome } => {
            assert_eq!(*index, 0);
            assert_eq!(outcome.verdict, Verdict::Eligible);
        }
        other => panic!("expected evaluation, got {other:?}"),
    }
    match &entries[1] {
        BatchEntry::Rejected { index, field, error } => {
            assert_eq!(*index, 1);
            assert_eq!(*field, Some("loan_amount"));
            assert_eq!(error, "invalid loan_amount: -5 is negative");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    match &entries[2] {
        BatchEntry::Evaluated { outcome, .. } => {
            assert_eq!(outcome.verdict, Verdict::NotEligible)
        }
        other => panic!("expected evaluation, got {other:?}"),
    }
}

#[test]
fn evaluate_record_skips_validation() {
    let service = EligibilityService::new(Arc::new(CreditRuleClassifier));
    let outcome = service
        .evaluate_record(&scenario_record())
        .expect("evaluation succeeds");
    assert_eq!(outcome.verdict, Verdict::Eligible);
    assert_eq!(service.model_info().algorithm, "credit_rule");
}
