use crate::infra::{load_classifier, parse_loan_term};
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::workflows::eligibility::{
    parse_applicants, ApplicantSubmission, EligibilityService, FeatureVector, Verdict,
    FEATURE_SCHEMA,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    #[arg(long, default_value = "Male", value_parser = ["Male", "Female"])]
    pub(crate) gender: String,
    /// Marital status
    #[arg(long, default_value = "Yes", value_parser = ["Yes", "No"])]
    pub(crate) married: String,
    /// Number of dependents
    #[arg(long, default_value = "0", value_parser = ["0", "1", "2", "3+"])]
    pub(crate) dependents: String,
    /// Education level
    #[arg(long, default_value = "Graduate", value_parser = ["Graduate", "Not Graduate"])]
    pub(crate) education: String,
    #[arg(long, default_value = "Yes", value_parser = ["Yes", "No"])]
    pub(crate) self_employed: String,
    /// Applicant monthly income
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub(crate) applicant_income: i64,
    /// Coapplicant monthly income
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub(crate) coapplicant_income: i64,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub(crate) loan_amount: i64,
    /// Loan amount term in months (360, 180, 240, 120, 60)
    #[arg(long, default_value = "360", value_parser = parse_loan_term)]
    pub(crate) loan_amount_term: i64,
    /// 1 if the credit history meets guidelines, otherwise 0
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(0..=1))]
    pub(crate) credit_history: i64,
    #[arg(long, default_value = "Urban", value_parser = ["Urban", "Semiurban", "Rural"])]
    pub(crate) property_area: String,
    /// Model artifact to load instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the encoded feature vector alongside the verdict
    #[arg(long)]
    pub(crate) show_features: bool,
}

impl PredictArgs {
    pub(crate) fn submission(&self) -> ApplicantSubmission {
        ApplicantSubmission {
            gender: self.gender.clone(),
            married: self.married.clone(),
            dependents: self.dependents.clone(),
            education: self.education.clone(),
            self_employed: self.self_employed.clone(),
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_amount_term: self.loan_amount_term,
            credit_history: self.credit_history,
            property_area: self.property_area.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file using the training column headers (Gender, Married, ..., Property_Area)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Model artifact to load instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let artifact = args
        .model
        .clone()
        .unwrap_or_else(|| config.model.artifact_path.clone());
    let service = EligibilityService::new(load_classifier(&artifact)?);

    let outcome = service.evaluate(&args.submission())?;
    println!("Prediction Result:");
    println!("{}", outcome.message);
    if args.show_features {
        println!("{}", render_features(&outcome.features));
    }
    println!(
        "{}",
        feature_importance_notice(&config.model.feature_importance_path)
    );
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let artifact = args
        .model
        .unwrap_or_else(|| config.model.artifact_path.clone());
    let service = EligibilityService::new(load_classifier(&artifact)?);

    let file = File::open(&args.input)?;
    let rows = parse_applicants(BufReader::new(file))?;

    let mut tally = BatchTally::default();
    for row in &rows {
        let id = row.display_id();
        let result = match &row.submission {
            Ok(submission) => service.evaluate(submission).map_err(|err| err.public_message()),
            Err(err) => Err(err.to_string()),
        };
        match result {
            Ok(outcome) => {
                tally.record(outcome.verdict);
                println!("{id:<12} {}", verdict_label(outcome.verdict));
            }
            Err(message) => {
                tally.rejected += 1;
                println!("{id:<12} rejected: {message}");
            }
        }
    }

    println!("\n{}", tally.summary());
    Ok(())
}

pub(crate) fn print_schema() {
    println!("Model feature order");
    for (index, column) in FEATURE_SCHEMA.iter().enumerate() {
        let group = column.group().unwrap_or("numeric");
        println!("{:>3}  {:<24} {}", index + 1, column.name(), group);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BatchTally {
    eligible: usize,
    not_eligible: usize,
    rejected: usize,
}

impl BatchTally {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Eligible => self.eligible += 1,
            Verdict::NotEligible => self.not_eligible += 1,
        }
    }

    fn summary(&self) -> String {
        let total = self.eligible + self.not_eligible + self.rejected;
        format!(
            "Scored {total} applicant(s): {} eligible, {} not eligible, {} rejected",
            self.eligible, self.not_eligible, self.rejected
        )
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Eligible => "eligible",
        Verdict::NotEligible => "not eligible",
    }
}

fn render_features(features: &FeatureVector) -> String {
    features
        .named()
        .into_iter()
        .map(|feature| format!("  {:<24} {}", feature.name, feature.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn feature_importance_notice(path: &Path) -> String {
    if path.is_file() {
        format!("Feature importance chart: {}", path.display())
    } else {
        "Feature importance image not found.".to_string()
    }
}
