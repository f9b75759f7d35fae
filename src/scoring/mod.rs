pub mod completeness;
pub mod confidence;
pub mod suggestions;

pub use completeness::completeness;
pub use confidence::ConfidenceScorer;
