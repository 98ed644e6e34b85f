//! Value objects - Immutable objects defined by their attributes

mod category;
mod dice;
mod search;
mod tier;

pub use category::{Category, FeatureType};
pub use dice::{rescale_dice, rescale_dice_in_text};
pub use search::StatblockQuery;
pub use tier::{tier_shift_adjective, Tier};
