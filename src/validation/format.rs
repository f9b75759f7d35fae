use crate::models::{ExtractedPassportFields, PassportField};

pub struct FormatValidator;

impl FormatValidator {
    /// Required-field check. Every missing field is a blocking error.
    pub fn validate(fields: &ExtractedPassportFields) -> Vec<String> {
        let mut errors = Vec::new();

        if !fields.has(PassportField::PassportNumber) {
            errors.push("Passport number is missing".to_string());
        }

        if !fields.has(PassportField::FullName) {
            errors.push("Full name is missing".to_string());
        }

        errors
    }
}
