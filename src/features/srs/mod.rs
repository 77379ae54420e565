pub mod engine;
pub mod quality;

pub use engine::SpacedRepetitionEngine;
pub use quality::{DEFAULT_AVG_TIME_SECONDS, QualityMode, describe_quality, estimate_quality};
