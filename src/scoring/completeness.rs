use crate::models::{ExtractedPassportFields, PassportField};

/// Percentage of the canonical fields that are populated, rounded.
pub fn completeness(fields: &ExtractedPassportFields) -> u8 {
    let present = PassportField::ALL.iter().filter(|f| fields.has(**f)).count();
    (100.0 * present as f32 / PassportField::ALL.len() as f32).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_steps() {
        let mut fields = ExtractedPassportFields::default();
        assert_eq!(completeness(&fields), 0);
        fields.nationality = Some("USA".to_string());
        assert_eq!(completeness(&fields), 20);
        fields.gender = Some("M".to_string());
        fields.personal_number = Some("12345678901234".to_string());
        assert_eq!(completeness(&fields), 20);
        fields.passport_number = Some("E12345678".to_string());
        fields.full_name = Some("JOHN SMITH".to_string());
        fields.date_of_birth = Some("1986-03-15".to_string());
        fields.expiration_date = Some("2033-05-20".to_string());
        assert_eq!(completeness(&fields), 100);
    }
}
