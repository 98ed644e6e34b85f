//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Statblock records (adversaries and environments) and features
//! - Value Objects: Tier, Category, dice expressions, search queries
//! - Domain Services: Ingestion (JSON and free text) and tier rescaling

pub mod entities;
pub mod services;
pub mod value_objects;

/// Errors raised when constructing validated domain values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Tier must be between 1 and 4, got {0}")]
    InvalidTier(i64),
    #[error("Tier must be a number, got {0:?}")]
    UnparseableTier(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
