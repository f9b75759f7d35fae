use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::*;
use crate::processing::*;
use crate::scoring::{completeness, ConfidenceScorer};
use crate::utils::{PassportError, RecognitionError};
use crate::validation::FieldValidator;

/// Turns a passport photo into scored, validated fields. Holds no per-call
/// state, so one instance can serve concurrent extractions.
pub struct PassportExtractor {
    recognizer: Option<Arc<dyn TextRecognizer>>,
    config: ExtractionConfig,
    reference_date: Option<NaiveDate>,
}

impl PassportExtractor {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        PassportExtractor {
            recognizer: Some(recognizer),
            config: ExtractionConfig::default(),
            reference_date: None,
        }
    }

    /// No recognition capability on this device: every call yields the mock result.
    pub fn without_recognizer() -> Self {
        PassportExtractor {
            recognizer: None,
            config: ExtractionConfig::default(),
            reference_date: None,
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin "today" for every temporal rule.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }

    // Main entry point: one recognition call, then synchronous extraction
    pub async fn extract_passport_data(&self, image: &ImageHandle) -> Result<ExtractionResult, PassportError> {
        let recognizer = match &self.recognizer {
            Some(recognizer) => recognizer,
            None => {
                warn!("No text recognizer configured; returning mock passport data");
                return Ok(Self::mock_result());
            }
        };

        match recognizer.recognize(image).await {
            Ok(regions) => Ok(self.extract_from_regions(&regions)),
            Err(RecognitionError::Unavailable(msg)) => {
                warn!("Text recognition unavailable ({}); returning mock passport data", msg);
                Ok(Self::mock_result())
            }
            Err(RecognitionError::Failed(msg)) => {
                error!("Text recognition failed: {}", msg);
                Err(PassportError::RecognitionFailed(msg))
            }
        }
    }

    /// Run the full pipeline over regions that were already recognized.
    pub fn extract_from_regions(&self, regions: &[TextRegion]) -> ExtractionResult {
        let today = self.today();

        // Step 1: Drop low-confidence and empty regions
        let raw = OcrProcessor::filter_regions(regions, self.config.block_confidence_floor);

        // Step 2: Extract and classify fields
        let fields = self.extract_fields(&raw, today);

        // Step 3: Validate
        let validation = FieldValidator::validate(&fields, today, &self.config);

        // Step 4: Score
        let confidence = ConfidenceScorer::score(&fields, &raw, &self.config.confidence);
        let completeness = completeness(&fields);

        let success = validation.is_valid && confidence.overall > self.config.success_threshold;

        info!(
            "Extraction finished: success={} completeness={}% overall={:.3} ocr_quality={:.3} errors={} warnings={}",
            success,
            completeness,
            confidence.overall,
            confidence.ocr_quality,
            validation.errors.len(),
            validation.warnings.len()
        );

        ExtractionResult {
            success,
            fields,
            confidence,
            completeness,
            validation,
            method: ExtractionMethod::LocalOcr,
            privacy: PrivacyDeclaration::ON_DEVICE,
            raw_ocr: RawOcrEvidence {
                blocks: raw.blocks,
                raw_text: raw.raw_text,
            },
        }
    }

    /// Extractors are independent of each other; only the date pair is refined
    /// by the classifier.
    pub fn extract_fields(&self, raw: &RawOcrResult, today: NaiveDate) -> ExtractedPassportFields {
        let text = raw.raw_text.as_str();
        let lines = raw.lines();

        let dates = DateExtractor::extract_dates(text, &self.config.dates);
        let roles = DateExtractor::classify(&dates, today, &self.config.dates);

        let nationality = FieldExtractor::extract_nationality(text, &self.config);

        ExtractedPassportFields {
            passport_number: FieldExtractor::extract_passport_number(text),
            full_name: FieldExtractor::extract_full_name(&lines, &self.config.name),
            date_of_birth: roles.date_of_birth,
            expiration_date: roles.expiration_date,
            issuing_country: nationality.clone(),
            nationality,
            gender: FieldExtractor::extract_gender(text),
            personal_number: FieldExtractor::extract_personal_number(text, self.config.personal_number_length),
        }
    }

    /// Fixed stand-in used when no recognizer can run. Tagged `mock_data` so it is
    /// never mistaken for a real read.
    pub fn mock_result() -> ExtractionResult {
        const MOCK_CONFIDENCE: f32 = 0.95;

        let fields = ExtractedPassportFields {
            passport_number: Some("E12345678".to_string()),
            full_name: Some("ALEX CHEN".to_string()),
            date_of_birth: Some("1990-01-15".to_string()),
            expiration_date: Some("2034-01-14".to_string()),
            nationality: Some("USA".to_string()),
            issuing_country: Some("USA".to_string()),
            gender: Some("M".to_string()),
            personal_number: Some("E12345678USA90".to_string()),
        };

        let field_scores: BTreeMap<PassportField, f32> =
            PassportField::ALL.iter().map(|f| (*f, MOCK_CONFIDENCE)).collect();

        ExtractionResult {
            success: true,
            fields,
            confidence: ConfidenceScores {
                overall: MOCK_CONFIDENCE,
                ocr_quality: MOCK_CONFIDENCE,
                fields: field_scores,
            },
            completeness: 100,
            validation: ValidationResult::from_issues(Vec::new(), Vec::new()),
            method: ExtractionMethod::MockData,
            privacy: PrivacyDeclaration::ON_DEVICE,
            raw_ocr: RawOcrEvidence::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ocr::RecordedRecognizer;

    fn extractor() -> PassportExtractor {
        PassportExtractor::without_recognizer().with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    fn passport_regions() -> Vec<TextRegion> {
        vec![
            TextRegion::new("JOHN SMITH", 0.93),
            TextRegion::new("USA", 0.9),
            TextRegion::new("Passport No. E12345678", 0.92),
            TextRegion::new("SEX M", 0.88),
            TextRegion::new("DATE OF BIRTH 15/03/1986", 0.9),
            TextRegion::new("VALID UNTIL 20/05/2033", 0.9),
            TextRegion::new("blurred stamp", 0.4),
        ]
    }

    #[test]
    fn test_full_page_extraction() {
        let result = extractor().extract_from_regions(&passport_regions());
        assert_eq!(result.fields.passport_number.as_deref(), Some("E12345678"));
        assert_eq!(result.fields.full_name.as_deref(), Some("JOHN SMITH"));
        assert_eq!(result.fields.nationality.as_deref(), Some("USA"));
        assert_eq!(result.fields.issuing_country.as_deref(), Some("USA"));
        assert_eq!(result.fields.gender.as_deref(), Some("M"));
        assert_eq!(result.fields.date_of_birth.as_deref(), Some("1986-03-15"));
        assert_eq!(result.fields.expiration_date.as_deref(), Some("2033-05-20"));
        assert_eq!(result.completeness, 100);
        assert!(result.validation.is_valid);
        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::LocalOcr);
        assert_eq!(result.raw_ocr.blocks.len(), 6);
        assert!(!result.raw_ocr.raw_text.contains("blurred"));
    }

    #[test]
    fn test_success_threshold_is_configurable() {
        // complete fields give 0.56 from the field term; ocr quality 0.61 adds 0.183
        let regions: Vec<TextRegion> = passport_regions()
            .into_iter()
            .map(|mut r| {
                r.confidence = 0.61;
                r
            })
            .collect();
        let result = extractor().extract_from_regions(&regions);
        assert_eq!(result.completeness, 100);
        assert!(result.validation.is_valid);
        assert!(result.confidence.overall > 0.7);
        assert!(result.success);

        let strict = extractor().with_config(ExtractionConfig {
            success_threshold: 0.75,
            ..ExtractionConfig::default()
        });
        assert!(!strict.extract_from_regions(&regions).success);
    }

    #[test]
    fn test_mock_result_shape() {
        let mock = PassportExtractor::mock_result();
        assert!(mock.success);
        assert_eq!(mock.completeness, 100);
        assert_eq!(mock.method, ExtractionMethod::MockData);
        assert_eq!(mock.privacy, PrivacyDeclaration::ON_DEVICE);
        assert!(mock.improvement_suggestions(&ExtractionConfig::default()).is_empty());
    }

    #[test]
    fn test_suggestions_for_poor_read() {
        let regions = vec![TextRegion::new("12", 0.65)];
        let config = ExtractionConfig::default();
        let result = extractor().extract_from_regions(&regions);
        let suggestions = result.improvement_suggestions(&config);
        assert_eq!(suggestions.len(), 4);
    }

    #[test]
    fn test_overall_equal_to_threshold_is_not_success() {
        let regions = passport_regions();
        let overall = extractor().extract_from_regions(&regions).confidence.overall;
        let at_threshold = extractor().with_config(ExtractionConfig {
            success_threshold: overall,
            ..ExtractionConfig::default()
        });
        let result = at_threshold.extract_from_regions(&regions);
        assert!(result.validation.is_valid);
        assert_eq!(result.confidence.overall, overall);
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_entry_point_uses_recognizer() {
        let extractor = PassportExtractor::new(Arc::new(RecordedRecognizer::new(passport_regions())))
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let result = extractor
            .extract_passport_data(&ImageHandle::FilePath("page.jpg".into()))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::LocalOcr);
    }
}
