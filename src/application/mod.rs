//! Application layer - Use cases over the statblock catalogue
//!
//! Services orchestrate domain operations and talk to storage only through
//! the outbound ports. DTOs define the shapes exchanged with adapters.

pub mod dto;
pub mod ports;
pub mod services;
