//! Application services - Use case implementations
//!
//! Each service accepts its repository dependencies as port trait objects
//! and returns domain entities; adapters convert them into DTOs.

pub mod statblock_service;

pub use statblock_service::{Retiered, StatblockService, StatblockServiceImpl};
