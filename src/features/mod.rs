pub mod progression;
pub mod quiz;
pub mod srs;
