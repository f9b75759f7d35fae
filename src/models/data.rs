use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A region of text as reported by the recognizer. Lines share the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    pub text: String,
    pub confidence: f32,
    #[serde(default)]
    pub lines: Vec<TextRegion>,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

impl TextRegion {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        TextRegion {
            text: text.into(),
            confidence,
            lines: Vec::new(),
            bounds: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<TextRegion>) -> Self {
        self.lines = lines;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredLine {
    pub text: String,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<String>,
}

/// A region that survived the confidence floor. Text is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredBlock {
    pub text: String,
    pub confidence: f32,
    pub lines: Vec<FilteredLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOcrResult {
    pub blocks: Vec<FilteredBlock>,
    pub raw_text: String,
    pub block_count: usize,
    pub average_confidence: f32,
}

impl RawOcrResult {
    /// Working line list: each block's lines, or the block text split on newlines
    /// when the recognizer reported no line detail.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines = Vec::new();
        for block in &self.blocks {
            if block.lines.is_empty() {
                lines.extend(block.text.lines().map(str::trim).filter(|l| !l.is_empty()));
            } else {
                lines.extend(block.lines.iter().map(|l| l.text.as_str()));
            }
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// The five canonical fields that are scored and counted for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassportField {
    PassportNumber,
    FullName,
    DateOfBirth,
    ExpirationDate,
    Nationality,
}

impl PassportField {
    pub const ALL: [PassportField; 5] = [
        PassportField::PassportNumber,
        PassportField::FullName,
        PassportField::DateOfBirth,
        PassportField::ExpirationDate,
        PassportField::Nationality,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PassportField::PassportNumber => "passportNumber",
            PassportField::FullName => "fullName",
            PassportField::DateOfBirth => "dateOfBirth",
            PassportField::ExpirationDate => "expirationDate",
            PassportField::Nationality => "nationality",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPassportFields {
    pub passport_number: Option<String>,
    pub full_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    /// `YYYY-MM-DD`
    pub expiration_date: Option<String>,
    pub nationality: Option<String>,
    pub issuing_country: Option<String>,
    /// One of `M`, `F`, `X`
    pub gender: Option<String>,
    pub personal_number: Option<String>,
}

impl ExtractedPassportFields {
    pub fn get(&self, field: PassportField) -> Option<&str> {
        let value = match field {
            PassportField::PassportNumber => &self.passport_number,
            PassportField::FullName => &self.full_name,
            PassportField::DateOfBirth => &self.date_of_birth,
            PassportField::ExpirationDate => &self.expiration_date,
            PassportField::Nationality => &self.nationality,
        };
        value.as_deref()
    }

    /// Present means set and not blank.
    pub fn has(&self, field: PassportField) -> bool {
        self.get(field).map_or(false, |v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_issues(errors: Vec<String>, warnings: Vec<String>) -> Self {
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScores {
    pub overall: f32,
    pub ocr_quality: f32,
    pub fields: BTreeMap<PassportField, f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    LocalOcr,
    MockData,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::LocalOcr => "local_ocr",
            ExtractionMethod::MockData => "mock_data",
        }
    }
}

/// Constant product guarantee stamped on every result. Not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyDeclaration {
    pub processed_on_device: bool,
    pub data_left_device: bool,
    pub image_left_device: bool,
    pub server_contacted: bool,
}

impl PrivacyDeclaration {
    pub const ON_DEVICE: PrivacyDeclaration = PrivacyDeclaration {
        processed_on_device: true,
        data_left_device: false,
        image_left_device: false,
        server_contacted: false,
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOcrEvidence {
    pub blocks: Vec<FilteredBlock>,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    pub fields: ExtractedPassportFields,
    pub confidence: ConfidenceScores,
    /// 0..=100
    pub completeness: u8,
    pub validation: ValidationResult,
    pub method: ExtractionMethod,
    pub privacy: PrivacyDeclaration,
    pub raw_ocr: RawOcrEvidence,
}
