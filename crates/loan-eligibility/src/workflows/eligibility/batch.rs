//! CSV intake for scoring many applicants at once.
//!
//! Files use the column headers of the loan training data. `Loan_ID` and `Loan_Status`
//! are optional and any other column is ignored.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{ApplicantSubmission, InvalidInput};

/// One data row of an applicant CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantRow {
    /// 1-based data row number, header excluded.
    pub row: usize,
    pub loan_id: Option<String>,
    pub submission: Result<ApplicantSubmission, InvalidInput>,
}

impl ApplicantRow {
    pub fn display_id(&self) -> String {
        self.loan_id
            .clone()
            .unwrap_or_else(|| format!("row {}", self.row))
    }
}

pub fn parse_applicants<R: Read>(reader: R) -> Result<Vec<ApplicantRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<CsvApplicant>().enumerate() {
        let raw = record?;
        rows.push(ApplicantRow {
            row: index + 1,
            loan_id: raw.loan_id.clone(),
            submission: raw.into_submission(),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvApplicant {
    #[serde(rename = "Loan_ID", default, deserialize_with = "empty_string_as_none")]
    loan_id: Option<String>,
    #[serde(rename = "Gender", default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(rename = "Married", default, deserialize_with = "empty_string_as_none")]
    married: Option<String>,
    #[serde(rename = "Dependents", default, deserialize_with = "empty_string_as_none")]
    dependents: Option<String>,
    #[serde(rename = "Education", default, deserialize_with = "empty_string_as_none")]
    education: Option<String>,
    #[serde(
        rename = "Self_Employed",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    self_employed: Option<String>,
    #[serde(
        rename = "ApplicantIncome",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    applicant_income: Option<String>,
    #[serde(
        rename = "CoapplicantIncome",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    coapplicant_income: Option<String>,
    #[serde(rename = "LoanAmount", default, deserialize_with = "empty_string_as_none")]
    loan_amount: Option<String>,
    #[serde(
        rename = "Loan_Amount_Term",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    loan_amount_term: Option<String>,
    #[serde(
        rename = "Credit_History",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    credit_history: Option<String>,
    #[serde(
        rename = "Property_Area",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    property_area: Option<String>,
}

impl CsvApplicant {
    fn into_submission(self) -> Result<ApplicantSubmission, InvalidInput> {
        Ok(ApplicantSubmission {
            gender: required("gender", self.gender)?,
            married: required("married", self.married)?,
            dependents: required("dependents", self.dependents)?,
            education: required("education", self.education)?,
            self_employed: required("self_employed", self.self_employed)?,
            applicant_income: whole_number("applicant_income", self.applicant_income)?,
            coapplicant_income: whole_number("coapplicant_income", self.coapplicant_income)?,
            loan_amount: whole_number("loan_amount", self.loan_amount)?,
            loan_amount_term: whole_number("loan_amount_term", self.loan_amount_term)?,
            credit_history: whole_number("credit_history", self.credit_history)?,
            property_area: required("property_area", self.property_area)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, InvalidInput> {
    value.ok_or_else(|| InvalidInput {
        field,
        reason: "value is missing".to_string(),
    })
}

// 2^63 is exactly representable; every whole f64 in [-2^63, 2^63) fits in an i64.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Accepts `360` as well as the `360.0` spelling spreadsheet exports produce.
fn whole_number(field: &'static str, value: Option<String>) -> Result<i64, InvalidInput> {
    let raw = required(field, value)?;
    if let Ok(parsed) = raw.parse::<i64>() {
        return Ok(parsed);
    }

    match raw.parse::<f64>() {
        Ok(parsed) if parsed.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&parsed) => {
            Ok(parsed as i64)
        }
        _ => Err(InvalidInput {
            field,
            reason: format!("'{raw}' is not a whole number"),
        }),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
