//! Data Transfer Objects - For API boundaries
//!
//! Request and response shapes for the HTTP adapter. Statblock records
//! themselves already carry their wire format, so only the envelopes and
//! lenient search filters live here.

pub mod statblock;

pub use statblock::*;
