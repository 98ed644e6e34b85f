//! Statblock ingestion
//!
//! [`normalize`] accepts whatever a user pasted: a JSON export object is
//! remapped by the schema normalizer, anything else is read as freeform
//! text. Neither path reports errors; `None` means nothing was extracted.

mod feature_block;
mod freeform;
mod json_schema;
mod line_rules;
mod record;

use freeform::parse_text;
use json_schema::normalize_json;
pub use record::statblock_from_record;

use serde_json::Value;
use tracing::debug;

use crate::domain::entities::Statblock;

/// Dispatch raw input to the JSON or freeform path
pub fn normalize(raw: &str) -> Option<Statblock> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => statblock_from_record(&normalize_json(object)),
        Ok(_) => {
            debug!("Input is JSON but not an object, reading as text");
            parse_text(raw)
        }
        Err(e) => {
            debug!(error = %e, "Input is not JSON, reading as text");
            parse_text(raw)
        }
    }
}
