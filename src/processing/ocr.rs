use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

use crate::models::{FilteredBlock, FilteredLine, RawOcrResult, TextRegion};
use crate::utils::{PassportError, RecognitionError};

/// Opaque handle to a passport photo.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    FilePath(PathBuf),
    Bytes(Vec<u8>),
}

/// The device text-recognition capability. One call per extraction.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageHandle) -> Result<Vec<TextRegion>, RecognitionError>;
}

/// Replays a fixed set of regions regardless of the image.
#[derive(Debug, Clone, Default)]
pub struct RecordedRecognizer {
    regions: Vec<TextRegion>,
}

impl RecordedRecognizer {
    pub fn new(regions: Vec<TextRegion>) -> Self {
        RecordedRecognizer { regions }
    }

    /// Load regions previously captured as a JSON array.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PassportError> {
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            PassportError::IoError(format!("Failed to read regions {}: {}", path.as_ref().display(), e))
        })?;
        let regions = serde_json::from_str(&contents)
            .map_err(|e| PassportError::InvalidRegions(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(Self::new(regions))
    }
}

#[async_trait]
impl TextRecognizer for RecordedRecognizer {
    async fn recognize(&self, _image: &ImageHandle) -> Result<Vec<TextRegion>, RecognitionError> {
        Ok(self.regions.clone())
    }
}

pub struct OcrProcessor;

impl OcrProcessor {
    /// Keep regions above the confidence floor with non-empty text, in order.
    /// Lines are trimmed and blank ones dropped; their confidence is carried
    /// through unfiltered.
    pub fn filter_regions(regions: &[TextRegion], confidence_floor: f32) -> RawOcrResult {
        let blocks: Vec<FilteredBlock> = regions
            .iter()
            .filter(|region| region.confidence > confidence_floor)
            .filter_map(|region| {
                let text = region.text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(FilteredBlock {
                    text: text.to_string(),
                    confidence: region.confidence,
                    lines: region.lines.iter().filter_map(Self::filter_line).collect(),
                    bounds: region.bounds.clone(),
                })
            })
            .collect();

        let raw_text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let average_confidence = if blocks.is_empty() {
            0.0
        } else {
            blocks.iter().map(|b| b.confidence).sum::<f32>() / blocks.len() as f32
        };

        debug!(
            "Kept {} of {} recognized regions (average confidence {:.3})",
            blocks.len(),
            regions.len(),
            average_confidence
        );

        RawOcrResult {
            block_count: blocks.len(),
            blocks,
            raw_text,
            average_confidence,
        }
    }

    fn filter_line(line: &TextRegion) -> Option<FilteredLine> {
        let text = line.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(FilteredLine {
            text: text.to_string(),
            confidence: line.confidence,
            elements: line
                .lines
                .iter()
                .map(|e| e.text.trim())
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}
