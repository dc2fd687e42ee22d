//! Fixed-order feature encoding shared with the trained model.
//!
//! The model consumes a flat vector of twenty numbers. Five numeric attributes lead the
//! vector unscaled; each categorical attribute then contributes one indicator column per
//! category. Column order is part of the model contract: [`FEATURE_SCHEMA`] is the single
//! place it is declared and every other view (names, encoding, artifact validation) is
//! derived from it.

use serde::{Serialize, Serializer};

use super::domain::{
    ApplicantRecord, ApplicantSubmission, Category, Dependents, Education, Gender, InvalidInput,
    Married, PropertyArea, SelfEmployed, YesNo,
};

pub const FEATURE_COUNT: usize = 20;

/// One column of the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureColumn {
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanAmountTerm,
    CreditHistory,
    Gender(Gender),
    Married(Married),
    Dependents(Dependents),
    Education(Education),
    SelfEmployed(SelfEmployed),
    PropertyArea(PropertyArea),
}

pub const FEATURE_SCHEMA: [FeatureColumn; FEATURE_COUNT] = [
    FeatureColumn::ApplicantIncome,
    FeatureColumn::CoapplicantIncome,
    FeatureColumn::LoanAmount,
    FeatureColumn::LoanAmountTerm,
    FeatureColumn::CreditHistory,
    FeatureColumn::Gender(Gender::Female),
    FeatureColumn::Gender(Gender::Male),
    FeatureColumn::Married(Married(YesNo::No)),
    FeatureColumn::Married(Married(YesNo::Yes)),
    FeatureColumn::Dependents(Dependents::Zero),
    FeatureColumn::Dependents(Dependents::One),
    FeatureColumn::Dependents(Dependents::Two),
    FeatureColumn::Dependents(Dependents::ThreeOrMore),
    FeatureColumn::Education(Education::Graduate),
    FeatureColumn::Education(Education::NotGraduate),
    FeatureColumn::SelfEmployed(SelfEmployed(YesNo::No)),
    FeatureColumn::SelfEmployed(SelfEmployed(YesNo::Yes)),
    FeatureColumn::PropertyArea(PropertyArea::Rural),
    FeatureColumn::PropertyArea(PropertyArea::Semiurban),
    FeatureColumn::PropertyArea(PropertyArea::Urban),
];

impl FeatureColumn {
    /// Column name as it appeared in the training frame (`Gender_Female`, `Dependents_3+`).
    pub fn name(self) -> String {
        match self {
            FeatureColumn::ApplicantIncome => "ApplicantIncome".to_string(),
            FeatureColumn::CoapplicantIncome => "CoapplicantIncome".to_string(),
            FeatureColumn::LoanAmount => "LoanAmount".to_string(),
            FeatureColumn::LoanAmountTerm => "Loan_Amount_Term".to_string(),
            FeatureColumn::CreditHistory => "Credit_History".to_string(),
            FeatureColumn::Gender(value) => dummy_name("Gender", value),
            FeatureColumn::Married(value) => dummy_name("Married", value),
            FeatureColumn::Dependents(value) => dummy_name("Dependents", value),
            FeatureColumn::Education(value) => dummy_name("Education", value),
            FeatureColumn::SelfEmployed(value) => dummy_name("Self_Employed", value),
            FeatureColumn::PropertyArea(value) => dummy_name("Property_Area", value),
        }
    }

    /// Name of the one-hot group this column belongs to, if any.
    pub fn group(self) -> Option<&'static str> {
        match self {
            FeatureColumn::ApplicantIncome
            | FeatureColumn::CoapplicantIncome
            | FeatureColumn::LoanAmount
            | FeatureColumn::LoanAmountTerm
            | FeatureColumn::CreditHistory => None,
            FeatureColumn::Gender(_) => Some(Gender::FIELD),
            FeatureColumn::Married(_) => Some(Married::FIELD),
            FeatureColumn::Dependents(_) => Some(Dependents::FIELD),
            FeatureColumn::Education(_) => Some(Education::FIELD),
            FeatureColumn::SelfEmployed(_) => Some(SelfEmployed::FIELD),
            FeatureColumn::PropertyArea(_) => Some(PropertyArea::FIELD),
        }
    }

    pub fn value(self, record: &ApplicantRecord) -> f64 {
        match self {
            FeatureColumn::ApplicantIncome => record.applicant_income as f64,
            FeatureColumn::CoapplicantIncome => record.coapplicant_income as f64,
            FeatureColumn::LoanAmount => record.loan_amount as f64,
            FeatureColumn::LoanAmountTerm => f64::from(record.loan_amount_term.months()),
            FeatureColumn::CreditHistory => f64::from(record.credit_history.flag()),
            FeatureColumn::Gender(value) => indicator(record.gender == value),
            FeatureColumn::Married(value) => indicator(record.married == value),
            FeatureColumn::Dependents(value) => indicator(record.dependents == value),
            FeatureColumn::Education(value) => indicator(record.education == value),
            FeatureColumn::SelfEmployed(value) => indicator(record.self_employed == value),
            FeatureColumn::PropertyArea(value) => indicator(record.property_area == value),
        }
    }
}

fn dummy_name<C: Category>(prefix: &str, value: C) -> String {
    format!("{prefix}_{}", value.label())
}

fn indicator(selected: bool) -> f64 {
    if selected {
        1.0
    } else {
        0.0
    }
}

/// Column names in model order.
pub fn feature_names() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|column| column.name()).collect()
}

/// Model input for a single applicant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_record(record: &ApplicantRecord) -> Self {
        Self(FEATURE_SCHEMA.map(|column| column.value(record)))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Pairs every value with its column name for display.
    pub fn named(&self) -> Vec<NamedFeature> {
        FEATURE_SCHEMA
            .iter()
            .zip(self.0.iter())
            .map(|(column, value)| NamedFeature {
                name: column.name(),
                value: *value,
            })
            .collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFeature {
    pub name: String,
    pub value: f64,
}

/// Validate a raw submission and project it onto the model's feature schema.
pub fn encode_submission(submission: &ApplicantSubmission) -> Result<FeatureVector, InvalidInput> {
    let record = ApplicantRecord::try_from(submission)?;
    Ok(FeatureVector::from_record(&record))
}
