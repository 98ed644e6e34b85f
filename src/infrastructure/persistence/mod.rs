//! Persistence adapters
//!
//! Implementations of the outbound repository ports.

mod json_file_repository;

pub use json_file_repository::JsonFileStatblockRepository;
