pub mod goals;
pub mod quiz;
pub mod review;
pub mod statistics;
pub mod vocabulary;

use crate::data::models::ApiError;
use crate::features::progression::CefrLevel;

/// Level given by the client, or the fallback when absent
fn requested_level(level: Option<&str>, fallback: &str) -> Result<CefrLevel, ApiError> {
    let raw = level.unwrap_or(fallback);
    raw.parse::<CefrLevel>()
        .map_err(|e| ApiError::Validation(e.to_string()))
}
