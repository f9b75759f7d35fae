use crate::models::PassportField;
use crate::utils::PassportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weights for ranking candidate name lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameScoring {
    pub min_length: usize,
    pub max_length: usize,
    pub base: f32,
    pub preferred_length: (usize, usize),
    pub length_bonus: f32,
    pub preferred_words: (usize, usize),
    pub word_count_bonus: f32,
    pub uppercase_bonus: f32,
    pub charset_bonus: f32,
    pub digit_penalty: f32,
    pub charset_penalty: f32,
    /// Candidates must score strictly above this.
    pub acceptance_threshold: f32,
}

impl Default for NameScoring {
    fn default() -> Self {
        NameScoring {
            min_length: 2,
            max_length: 50,
            base: 0.5,
            preferred_length: (5, 30),
            length_bonus: 0.2,
            preferred_words: (2, 3),
            word_count_bonus: 0.2,
            uppercase_bonus: 0.1,
            charset_bonus: 0.1,
            digit_penalty: 0.3,
            charset_penalty: 0.2,
            acceptance_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateScoring {
    pub min_year: i32,
    pub max_year: i32,
    /// Characters kept on each side of a date match.
    pub context_radius: usize,
    pub expiry_horizon_years: u32,
    pub birth_horizon_years: u32,
    pub plausibility_score: u32,
    pub keyword_score: u32,
    pub birth_keywords: Vec<String>,
    pub expiry_keywords: Vec<String>,
}

impl Default for DateScoring {
    fn default() -> Self {
        DateScoring {
            min_year: 1900,
            max_year: 2100,
            context_radius: 50,
            expiry_horizon_years: 20,
            birth_horizon_years: 100,
            plausibility_score: 1,
            keyword_score: 2,
            birth_keywords: vec!["birth".to_string(), "born".to_string()],
            expiry_keywords: vec!["expir".to_string(), "valid".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub present: f32,
    pub absent: f32,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    pub passport_number: FieldConfidence,
    pub full_name: FieldConfidence,
    pub date_of_birth: FieldConfidence,
    pub expiration_date: FieldConfidence,
    pub nationality: FieldConfidence,
    pub field_weight: f32,
    pub ocr_weight: f32,
}

impl ConfidenceModel {
    pub fn lookup(&self, field: PassportField) -> FieldConfidence {
        match field {
            PassportField::PassportNumber => self.passport_number,
            PassportField::FullName => self.full_name,
            PassportField::DateOfBirth => self.date_of_birth,
            PassportField::ExpirationDate => self.expiration_date,
            PassportField::Nationality => self.nationality,
        }
    }
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        ConfidenceModel {
            passport_number: FieldConfidence { present: 0.9, absent: 0.1, weight: 0.30 },
            full_name: FieldConfidence { present: 0.8, absent: 0.2, weight: 0.25 },
            date_of_birth: FieldConfidence { present: 0.7, absent: 0.3, weight: 0.15 },
            expiration_date: FieldConfidence { present: 0.7, absent: 0.3, weight: 0.15 },
            nationality: FieldConfidence { present: 0.8, absent: 0.4, weight: 0.15 },
            field_weight: 0.7,
            ocr_weight: 0.3,
        }
    }
}

/// Every tunable of the extraction engine in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Regions at or below this recognizer confidence are discarded.
    pub block_confidence_floor: f32,
    /// Overall confidence must exceed this for a successful extraction.
    pub success_threshold: f32,
    pub name: NameScoring,
    pub dates: DateScoring,
    pub confidence: ConfidenceModel,
    pub min_plausible_age: i64,
    pub max_plausible_age: i64,
    pub personal_number_length: usize,
    pub suggestion_ocr_quality_floor: f32,
    pub suggestion_completeness_floor: u8,
    /// ISO-3166 alpha-3 codes accepted as nationality.
    pub supported_nationalities: Vec<String>,
}

pub const SUPPORTED_NATIONALITIES: [&str; 30] = [
    "USA", "CHN", "GBR", "CAN", "AUS", "JPN", "KOR", "SGP", "MYS", "THA",
    "HKG", "TWN", "IND", "DEU", "FRA", "ITA", "ESP", "NLD", "NZL", "PHL",
    "IDN", "VNM", "MAC", "RUS", "BRA", "MEX", "ARE", "CHE", "SWE", "IRL",
];

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            block_confidence_floor: 0.6,
            success_threshold: 0.7,
            name: NameScoring::default(),
            dates: DateScoring::default(),
            confidence: ConfidenceModel::default(),
            min_plausible_age: 0,
            max_plausible_age: 150,
            personal_number_length: 14,
            suggestion_ocr_quality_floor: 0.7,
            suggestion_completeness_floor: 80,
            supported_nationalities: SUPPORTED_NATIONALITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a JSON file; keys not present keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PassportError> {
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            PassportError::IoError(format!("Failed to read config {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, PassportError> {
        serde_json::from_str(contents)
            .map_err(|e| PassportError::ConfigError(format!("Invalid extraction config: {}", e)))
    }

    pub fn is_supported_nationality(&self, code: &str) -> bool {
        self.supported_nationalities.iter().any(|c| c == code)
    }
}
