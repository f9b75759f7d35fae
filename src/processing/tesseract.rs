// Tesseract TSV output -> recognizer regions
use std::collections::BTreeMap;

use crate::models::{BoundingBox, TextRegion};

const WORD_LEVEL: u32 = 5;
const BLOCK_LEVEL: u32 = 2;

struct TsvRow<'a> {
    level: u32,
    block: u32,
    paragraph: u32,
    line: u32,
    bounds: BoundingBox,
    confidence: f32,
    text: &'a str,
}

fn parse_row(row: &str) -> Option<TsvRow<'_>> {
    let cols: Vec<&str> = row.splitn(12, '\t').collect();
    if cols.len() < 11 {
        return None;
    }
    let num = |i: usize| cols[i].trim().parse::<u32>().ok();
    let float = |i: usize| cols[i].trim().parse::<f32>().ok();
    Some(TsvRow {
        level: num(0)?,
        block: num(2)?,
        paragraph: num(3)?,
        line: num(4)?,
        bounds: BoundingBox {
            x: float(6)?,
            y: float(7)?,
            width: float(8)?,
            height: float(9)?,
        },
        confidence: float(10)?,
        text: cols.get(11).map(|t| t.trim()).unwrap_or(""),
    })
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Group word rows into one region per block and one line per text line.
/// Word confidence (0-100, -1 for structural rows) is rescaled to [0, 1].
pub fn regions_from_tsv(tsv: &str) -> Vec<TextRegion> {
    // block -> (bounds, (paragraph, line) -> words)
    let mut blocks: BTreeMap<u32, (Option<BoundingBox>, BTreeMap<(u32, u32), Vec<(String, f32)>>)> =
        BTreeMap::new();

    for row in tsv.lines().filter_map(parse_row) {
        let entry = blocks.entry(row.block).or_insert_with(|| (None, BTreeMap::new()));
        if row.level == BLOCK_LEVEL {
            entry.0 = Some(row.bounds);
        } else if row.level == WORD_LEVEL && row.confidence >= 0.0 && !row.text.is_empty() {
            entry
                .1
                .entry((row.paragraph, row.line))
                .or_default()
                .push((row.text.to_string(), (row.confidence / 100.0).clamp(0.0, 1.0)));
        }
    }

    blocks
        .into_values()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(bounds, lines)| {
            let lines: Vec<TextRegion> = lines
                .into_values()
                .map(|words| {
                    let confidences: Vec<f32> = words.iter().map(|(_, c)| *c).collect();
                    let text = words.iter().map(|(w, _)| w.as_str()).collect::<Vec<_>>().join(" ");
                    TextRegion::new(text, mean(&confidences)).with_lines(
                        words.into_iter().map(|(w, c)| TextRegion::new(w, c)).collect(),
                    )
                })
                .collect();
            let word_confidences: Vec<f32> = lines
                .iter()
                .flat_map(|l| l.lines.iter().map(|w| w.confidence))
                .collect();
            let text = lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n");
            TextRegion {
                text,
                confidence: mean(&word_confidences),
                lines,
                bounds,
            }
        })
        .collect()
}

#[cfg(feature = "tesseract")]
pub use engine::TesseractRecognizer;

#[cfg(feature = "tesseract")]
mod engine {
    use async_trait::async_trait;
    use log::debug;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use tesseract::Tesseract;

    use super::regions_from_tsv;
    use crate::models::TextRegion;
    use crate::processing::ocr::{ImageHandle, TextRecognizer};
    use crate::utils::RecognitionError;

    /// Local Tesseract install as the text-recognition capability.
    pub struct TesseractRecognizer {
        datapath: Option<String>,
        language: String,
    }

    impl TesseractRecognizer {
        pub fn new() -> Self {
            TesseractRecognizer {
                datapath: None,
                language: "eng".to_string(),
            }
        }

        pub fn with_language(mut self, language: impl Into<String>) -> Self {
            self.language = language.into();
            self
        }

        pub fn with_datapath(mut self, datapath: impl Into<String>) -> Self {
            self.datapath = Some(datapath.into());
            self
        }

        fn recognize_file(
            datapath: Option<&str>,
            language: &str,
            path: &Path,
        ) -> Result<Vec<TextRegion>, RecognitionError> {
            let path_str = path
                .to_str()
                .ok_or_else(|| RecognitionError::Failed("Image path is not valid UTF-8".to_string()))?;

            let tess = Tesseract::new(datapath, Some(language))
                .map_err(|e| RecognitionError::Unavailable(format!("Failed to initialize Tesseract: {}", e)))?;
            let mut tess = tess
                .set_image(path_str)
                .map_err(|e| RecognitionError::Failed(format!("Failed to set image: {}", e)))?
                .recognize()
                .map_err(|e| RecognitionError::Failed(format!("Recognition error: {}", e)))?;
            let tsv = tess
                .get_tsv_text(0)
                .map_err(|e| RecognitionError::Failed(format!("Failed to read TSV output: {}", e)))?;

            let regions = regions_from_tsv(&tsv);
            debug!("Tesseract produced {} regions", regions.len());
            Ok(regions)
        }
    }

    impl Default for TesseractRecognizer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TextRecognizer for TesseractRecognizer {
        async fn recognize(&self, image: &ImageHandle) -> Result<Vec<TextRegion>, RecognitionError> {
            let datapath = self.datapath.clone();
            let language = self.language.clone();
            let image = image.clone();
            tokio::task::spawn_blocking(move || match image {
                ImageHandle::FilePath(path) => Self::recognize_file(datapath.as_deref(), &language, &path),
                ImageHandle::Bytes(data) => {
                    let mut temp_file = NamedTempFile::new()
                        .map_err(|e| RecognitionError::Failed(format!("Failed to create temp file: {}", e)))?;
                    temp_file
                        .write_all(&data)
                        .map_err(|e| RecognitionError::Failed(format!("Failed to write temp file: {}", e)))?;
                    Self::recognize_file(datapath.as_deref(), &language, temp_file.path())
                }
            })
            .await
            .map_err(|e| RecognitionError::Failed(e.to_string()))?
        }
    }
}
