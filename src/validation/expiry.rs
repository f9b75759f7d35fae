use chrono::NaiveDate;

use crate::models::{ExtractedPassportFields, ExtractionConfig};
use crate::processing::dates::{years_between, DateExtractor};

#[derive(Debug, Default)]
pub struct TemporalIssues {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct ExpiryValidator;

impl ExpiryValidator {
    /// An expired document blocks success; an implausible age only warns.
    pub fn validate(fields: &ExtractedPassportFields, today: NaiveDate, config: &ExtractionConfig) -> TemporalIssues {
        let mut issues = TemporalIssues::default();

        if let Some(expiry) = fields.expiration_date.as_deref().and_then(DateExtractor::parse_canonical) {
            if expiry < today {
                issues.errors.push(format!("Passport has expired (expiration date {})", DateExtractor::canonical(expiry)));
            }
        }

        if let Some(birth) = fields.date_of_birth.as_deref().and_then(DateExtractor::parse_canonical) {
            let age = years_between(birth, today);
            if age < config.min_plausible_age || age > config.max_plausible_age {
                issues.warnings.push(format!(
                    "Date of birth implies an age of {} years, outside the plausible range {}-{}",
                    age, config.min_plausible_age, config.max_plausible_age
                ));
            }
        }

        issues
    }
}
