pub mod models;
pub mod processing;
pub mod scoring;
pub mod validation;
pub mod utils;
pub mod passport_extractor;

pub use models::{ExtractionConfig, ExtractionMethod, ExtractionResult, TextRegion};
pub use passport_extractor::PassportExtractor;
pub use processing::{ImageHandle, RecordedRecognizer, TextRecognizer};
pub use utils::{PassportError, RecognitionError};
