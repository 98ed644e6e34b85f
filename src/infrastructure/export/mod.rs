//! Statblock export functionality
//!
//! Two export formats are available:
//! - Markdown via [`render_markdown`] for reading and notes
//! - [`ExternalStatblock`]: the third-party JSON shape accepted back by ingestion

mod statblock_export;

pub use statblock_export::{
    render_markdown, ExportFormat, ExternalAdversary, ExternalAttack, ExternalEnvironment,
    ExternalExperience, ExternalFeature, ExternalStatblock,
};
