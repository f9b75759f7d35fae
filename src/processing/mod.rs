pub mod dates;
pub mod extractors;
pub mod ocr;
pub mod tesseract;

pub use dates::{DateExtractor, DateRoles, ExtractedDate};
pub use extractors::FieldExtractor;
pub use ocr::{ImageHandle, OcrProcessor, RecordedRecognizer, TextRecognizer};
pub use tesseract::regions_from_tsv;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;
