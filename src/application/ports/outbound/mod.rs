//! Outbound ports - Interfaces that the application requires from external systems

mod statblock_repository_port;

pub use statblock_repository_port::{RepositoryError, StatblockRepositoryPort};
