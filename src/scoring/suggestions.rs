use crate::models::{ExtractionConfig, ExtractionMethod, ExtractionResult, PassportField};

impl ExtractionResult {
    /// Retry guidance for the caller, most actionable first. Empty for mock results.
    pub fn improvement_suggestions(&self, config: &ExtractionConfig) -> Vec<String> {
        let mut suggestions = Vec::new();
        if self.method == ExtractionMethod::MockData {
            return suggestions;
        }

        if self.confidence.ocr_quality < config.suggestion_ocr_quality_floor {
            suggestions.push("Improve lighting and hold the camera steady to reduce blur and glare".to_string());
        }
        if self.completeness < config.suggestion_completeness_floor {
            suggestions.push("Make sure the whole passport data page is inside the frame".to_string());
        }
        if !self.fields.has(PassportField::PassportNumber) {
            suggestions.push("The passport number could not be read; retake the photo closer to the number".to_string());
        }
        if !self.fields.has(PassportField::FullName) {
            suggestions.push("The holder's name could not be read; keep the name area free of reflections".to_string());
        }

        suggestions
    }
}
