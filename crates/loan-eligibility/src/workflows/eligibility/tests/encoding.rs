use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::eligibility::domain::{
    ApplicantRecord, Category, Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use crate::workflows::eligibility::encoding::{
    encode_submission, feature_names, FeatureColumn, FeatureVector, FEATURE_COUNT, FEATURE_SCHEMA,
};

fn group_sums(vector: &FeatureVector) -> BTreeMap<&'static str, f64> {
    let mut sums = BTreeMap::new();
    for (column, value) in FEATURE_SCHEMA.iter().zip(vector.as_slice()) {
        if let Some(group) = column.group() {
            *sums.entry(group).or_insert(0.0) += *value;
        }
    }
    sums
}

#[test]
fn scenario_one_encodes_to_expected_vector() {
    let vector = encode_submission(&scenario_submission()).expect("valid submission");
    assert_eq!(vector.as_slice(), &SCENARIO_VECTOR[..]);
}

#[test]
fn missing_credit_history_only_changes_position_five() {
    let with_credit = encode_submission(&scenario_submission()).expect("valid");
    let without_credit = encode_submission(&no_credit_submission()).expect("valid");

    for index in 0..FEATURE_COUNT {
        if index == 4 {
            assert_eq!(with_credit.get(index), Some(1.0));
            assert_eq!(without_credit.get(index), Some(0.0));
        } else {
            assert_eq!(with_credit.get(index), without_credit.get(index));
        }
    }
}

#[test]
fn every_record_has_twenty_features_and_exclusive_groups() {
    let records = all_records();
    assert_eq!(records.len(), 2 * 2 * 4 * 2 * 2 * 3 * 5 * 2);

    for record in &records {
        let vector = FeatureVector::from_record(record);
        assert_eq!(vector.len(), 20);
        let sums = group_sums(&vector);
        assert_eq!(sums.len(), 6);
        for (group, sum) in sums {
            assert_eq!(sum, 1.0, "group {group} not one-hot for {record:?}");
        }
        for value in &vector.as_slice()[5..] {
            assert!(*value == 0.0 || *value == 1.0);
        }
    }
}

#[test]
fn schema_covers_each_category_exactly_once() {
    fn count<C: Category, F: Fn(&FeatureColumn, C) -> bool>(matches: F) {
        for &category in C::ALL {
            let hits = FEATURE_SCHEMA
                .iter()
                .filter(|column| matches(column, category))
                .count();
            assert_eq!(hits, 1, "{} '{}'", C::FIELD, category.label());
        }
    }

    count::<Gender, _>(|column, value| *column == FeatureColumn::Gender(value));
    count::<Married, _>(|column, value| *column == FeatureColumn::Married(value));
    count::<Dependents, _>(|column, value| *column == FeatureColumn::Dependents(value));
    count::<Education, _>(|column, value| *column == FeatureColumn::Education(value));
    count::<SelfEmployed, _>(|column, value| *column == FeatureColumn::SelfEmployed(value));
    count::<PropertyArea, _>(|column, value| *column == FeatureColumn::PropertyArea(value));
}

#[test]
fn encoding_is_bit_identical_across_calls() {
    for record in all_records().iter().step_by(37) {
        let first = FeatureVector::from_record(record);
        let second = FeatureVector::from_record(record);
        let first_bits: Vec<u64> = first.as_slice().iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u64> = second.as_slice().iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }
}

#[test]
fn zero_income_and_amount_are_accepted() {
    let mut submission = scenario_submission();
    submission.applicant_income = 0;
    submission.loan_amount = 0;
    let vector = encode_submission(&submission).expect("zero is in range");
    assert_eq!(vector.get(0), Some(0.0));
    assert_eq!(vector.get(2), Some(0.0));
}

#[test]
fn numeric_fields_pass_through_unscaled() {
    let mut record: ApplicantRecord = scenario_record();
    record.applicant_income = 81_000;
    record.coapplicant_income = 41_667;
    record.loan_amount = 700;
    let vector = FeatureVector::from_record(&record);
    assert_eq!(&vector.as_slice()[..3], &[81_000.0, 41_667.0, 700.0]);
}

#[test]
fn unknown_dependents_value_is_invalid_input() {
    let mut submission = scenario_submission();
    submission.dependents = "4".to_string();
    let err = encode_submission(&submission).expect_err("4 dependents is not a category");
    assert_eq!(err.field, "dependents");
    assert_eq!(err.reason, "'4' is not one of '0', '1', '2', '3+'");
}

#[test]
fn negative_income_is_invalid_input() {
    let mut submission = scenario_submission();
    submission.applicant_income = -1;
    let err = encode_submission(&submission).expect_err("negative income");
    assert_eq!(err.field, "applicant_income");
}

#[test]
fn column_names_match_training_frame() {
    let names = feature_names();
    assert_eq!(names.len(), FEATURE_COUNT);
    assert_eq!(names[3], "Loan_Amount_Term");
    assert_eq!(names[12], "Dependents_3+");
    assert_eq!(names[14], "Education_Not Graduate");
    assert_eq!(names[19], "Property_Area_Urban");

    let named = encode_submission(&scenario_submission())
        .expect("valid")
        .named();
    assert_eq!(named[5].name, "Gender_Female");
    assert_eq!(named[5].value, 1.0);
}

#[test]
fn vector_serializes_as_flat_array() {
    let vector = FeatureVector::from_record(&scenario_record());
    let json = serde_json::to_value(vector).expect("serializes");
    let values: Vec<f64> = serde_json::from_value(json).expect("array of numbers");
    assert_eq!(values, SCENARIO_VECTOR.to_vec());
}
