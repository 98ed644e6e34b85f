//! Domain services - Pure operations over statblocks

pub mod ingestion;
pub mod retier;

pub use ingestion::{normalize, statblock_from_record};
pub use retier::{retier, RetierOutcome};
