pub mod analyzer;
pub mod caption;

pub use analyzer::{placeholder_profile, LlmSourceAnalyzer, SourceAnalyzer};
pub use caption::{fallback_caption, CaptionGenerator, LlmCaptionGenerator};
