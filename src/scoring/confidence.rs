use std::collections::BTreeMap;

use crate::models::{ConfidenceModel, ConfidenceScores, ExtractedPassportFields, PassportField, RawOcrResult};

pub struct ConfidenceScorer;

impl ConfidenceScorer {
    /// Presence-based field confidence blended with recognizer quality.
    /// With no surviving evidence nothing was scored, so only the OCR term counts.
    pub fn score(fields: &ExtractedPassportFields, raw: &RawOcrResult, model: &ConfidenceModel) -> ConfidenceScores {
        let ocr_quality = raw.average_confidence;
        let mut per_field = BTreeMap::new();
        let mut weighted_sum = 0.0_f32;
        let mut total_weight = 0.0_f32;

        for field in PassportField::ALL {
            let entry = model.lookup(field);
            let confidence = if fields.has(field) { entry.present } else { entry.absent };
            per_field.insert(field, confidence);
            weighted_sum += confidence * entry.weight;
            total_weight += entry.weight;
        }

        let field_term = if raw.is_empty() || total_weight <= 0.0 {
            0.0
        } else {
            model.field_weight * weighted_sum / total_weight
        };
        let overall = (field_term + model.ocr_weight * ocr_quality).clamp(0.0, 1.0);

        ConfidenceScores {
            overall,
            ocr_quality,
            fields: per_field,
        }
    }
}
