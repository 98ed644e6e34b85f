//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: JSON file adapter for the statblock catalogue
//! - HTTP: REST API routes
//! - Export: Markdown and external JSON renderings
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod export;
pub mod http;
pub mod persistence;
pub mod state;
