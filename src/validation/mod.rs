pub mod expiry;
pub mod format;

pub use expiry::ExpiryValidator;
pub use format::FormatValidator;

use chrono::NaiveDate;
use log::debug;

use crate::models::{ExtractedPassportFields, ExtractionConfig, ValidationResult};

pub struct FieldValidator;

impl FieldValidator {
    pub fn validate(fields: &ExtractedPassportFields, today: NaiveDate, config: &ExtractionConfig) -> ValidationResult {
        let mut errors = FormatValidator::validate(fields);
        let temporal = ExpiryValidator::validate(fields, today, config);
        errors.extend(temporal.errors);

        debug!("Validation: {} errors, {} warnings", errors.len(), temporal.warnings.len());
        ValidationResult::from_issues(errors, temporal.warnings)
    }
}
