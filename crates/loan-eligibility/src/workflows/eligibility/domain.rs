use serde::{Deserialize, Serialize};

/// Raw applicant attributes exactly as the form collects them.
///
/// Nothing here is trusted; [`ApplicantRecord::try_from`] performs the domain checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub gender: String,
    pub married: String,
    pub dependents: String,
    pub education: String,
    pub self_employed: String,
    pub applicant_income: i64,
    pub coapplicant_income: i64,
    pub loan_amount: i64,
    pub loan_amount_term: i64,
    pub credit_history: i64,
    pub property_area: String,
}

impl ApplicantSubmission {
    /// Field names as they appear in JSON payloads.
    pub const FIELDS: [&'static str; 11] = [
        "gender",
        "married",
        "dependents",
        "education",
        "self_employed",
        "applicant_income",
        "coapplicant_income",
        "loan_amount",
        "loan_amount_term",
        "credit_history",
        "property_area",
    ];

    /// Resolves a payload field name to its canonical static form.
    pub fn field_named(name: &str) -> Option<&'static str> {
        Self::FIELDS.iter().copied().find(|field| *field == name)
    }
}

/// Closed set of categories for one applicant attribute.
///
/// `ALL` is listed in the column order the model was trained with.
pub trait Category: Copy + Eq + Sized + 'static {
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Result<Self, InvalidInput> {
        let trimmed = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.label() == trimmed)
            .ok_or_else(|| InvalidInput::unknown_category(Self::FIELD, raw, Self::ALL))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Category for Gender {
    const FIELD: &'static str = "gender";
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// Yes/No answers share one representation across questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    fn label(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Married(pub YesNo);

impl Category for Married {
    const FIELD: &'static str = "married";
    const ALL: &'static [Self] = &[Married(YesNo::No), Married(YesNo::Yes)];

    fn label(self) -> &'static str {
        self.0.label()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelfEmployed(pub YesNo);

impl Category for SelfEmployed {
    const FIELD: &'static str = "self_employed";
    const ALL: &'static [Self] = &[SelfEmployed(YesNo::No), SelfEmployed(YesNo::Yes)];

    fn label(self) -> &'static str {
        self.0.label()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dependents {
    Zero,
    One,
    Two,
    ThreeOrMore,
}

impl Category for Dependents {
    const FIELD: &'static str = "dependents";
    const ALL: &'static [Self] = &[
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreeOrMore,
    ];

    fn label(self) -> &'static str {
        match self {
            Dependents::Zero => "0",
            Dependents::One => "1",
            Dependents::Two => "2",
            Dependents::ThreeOrMore => "3+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    NotGraduate,
}

impl Category for Education {
    const FIELD: &'static str = "education";
    const ALL: &'static [Self] = &[Education::Graduate, Education::NotGraduate];

    fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyArea {
    Rural,
    Semiurban,
    Urban,
}

impl Category for PropertyArea {
    const FIELD: &'static str = "property_area";
    const ALL: &'static [Self] = &[
        PropertyArea::Rural,
        PropertyArea::Semiurban,
        PropertyArea::Urban,
    ];

    fn label(self) -> &'static str {
        match self {
            PropertyArea::Rural => "Rural",
            PropertyArea::Semiurban => "Semiurban",
            PropertyArea::Urban => "Urban",
        }
    }
}

/// Loan repayment term in months. Passed to the model as a raw integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanTerm {
    Months60,
    Months120,
    Months180,
    Months240,
    Months360,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 5] = [
        LoanTerm::Months60,
        LoanTerm::Months120,
        LoanTerm::Months180,
        LoanTerm::Months240,
        LoanTerm::Months360,
    ];

    pub const fn months(self) -> u16 {
        match self {
            LoanTerm::Months60 => 60,
            LoanTerm::Months120 => 120,
            LoanTerm::Months180 => 180,
            LoanTerm::Months240 => 240,
            LoanTerm::Months360 => 360,
        }
    }

    pub fn from_months(raw: i64) -> Result<Self, InvalidInput> {
        Self::ALL
            .into_iter()
            .find(|term| i64::from(term.months()) == raw)
            .ok_or_else(|| InvalidInput {
                field: "loan_amount_term",
                reason: format!("{raw} is not one of 60, 120, 180, 240, 360 months"),
            })
    }
}

/// Whether the applicant's credit history meets guidelines (1) or not (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditHistory {
    Unmet,
    Met,
}

impl CreditHistory {
    pub const fn flag(self) -> u8 {
        match self {
            CreditHistory::Unmet => 0,
            CreditHistory::Met => 1,
        }
    }

    pub fn from_flag(raw: i64) -> Result<Self, InvalidInput> {
        match raw {
            0 => Ok(CreditHistory::Unmet),
            1 => Ok(CreditHistory::Met),
            other => Err(InvalidInput {
                field: "credit_history",
                reason: format!("{other} is not 0 or 1"),
            }),
        }
    }
}

/// Validated applicant attributes; every field is inside its declared domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub gender: Gender,
    pub married: Married,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub applicant_income: u64,
    pub coapplicant_income: u64,
    pub loan_amount: u64,
    pub loan_amount_term: LoanTerm,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

impl TryFrom<&ApplicantSubmission> for ApplicantRecord {
    type Error = InvalidInput;

    fn try_from(submission: &ApplicantSubmission) -> Result<Self, Self::Error> {
        Ok(Self {
            gender: Gender::parse(&submission.gender)?,
            married: Married::parse(&submission.married)?,
            dependents: Dependents::parse(&submission.dependents)?,
            education: Education::parse(&submission.education)?,
            self_employed: SelfEmployed::parse(&submission.self_employed)?,
            applicant_income: non_negative("applicant_income", submission.applicant_income)?,
            coapplicant_income: non_negative(
                "coapplicant_income",
                submission.coapplicant_income,
            )?,
            loan_amount: non_negative("loan_amount", submission.loan_amount)?,
            loan_amount_term: LoanTerm::from_months(submission.loan_amount_term)?,
            credit_history: CreditHistory::from_flag(submission.credit_history)?,
            property_area: PropertyArea::parse(&submission.property_area)?,
        })
    }
}

impl TryFrom<ApplicantSubmission> for ApplicantRecord {
    type Error = InvalidInput;

    fn try_from(submission: ApplicantSubmission) -> Result<Self, Self::Error> {
        Self::try_from(&submission)
    }
}

impl From<&ApplicantRecord> for ApplicantSubmission {
    fn from(record: &ApplicantRecord) -> Self {
        Self {
            gender: record.gender.label().to_string(),
            married: record.married.label().to_string(),
            dependents: record.dependents.label().to_string(),
            education: record.education.label().to_string(),
            self_employed: record.self_employed.label().to_string(),
            applicant_income: saturating_i64(record.applicant_income),
            coapplicant_income: saturating_i64(record.coapplicant_income),
            loan_amount: saturating_i64(record.loan_amount),
            loan_amount_term: i64::from(record.loan_amount_term.months()),
            credit_history: i64::from(record.credit_history.flag()),
            property_area: record.property_area.label().to_string(),
        }
    }
}

fn non_negative(field: &'static str, raw: i64) -> Result<u64, InvalidInput> {
    u64::try_from(raw).map_err(|_| InvalidInput {
        field,
        reason: format!("{raw} is negative"),
    })
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A submitted field fell outside its domain. Scoped to a single submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidInput {
    pub field: &'static str,
    pub reason: String,
}

impl InvalidInput {
    fn unknown_category<C: Category>(field: &'static str, raw: &str, allowed: &[C]) -> Self {
        let options = allowed
            .iter()
            .map(|candidate| format!("'{}'", candidate.label()))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            field,
            reason: format!("'{raw}' is not one of {options}"),
        }
    }
}
