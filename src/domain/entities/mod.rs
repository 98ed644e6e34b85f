//! Domain entities - Core business objects with identity

mod statblock;

pub use statblock::{Adversary, Environment, Feature, Statblock, StatblockBase};
