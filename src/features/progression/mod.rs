pub mod levels;
pub mod policy;

pub use levels::CefrLevel;
pub use policy::{ProgressionPolicy, level_progress};
