//! Tier rescaling for adversaries
//!
//! Moving an adversary `delta` tiers shifts its flat stats additively,
//! rescales every dice expression proportionally (including dice named in
//! feature text) and prefixes the name with a size adjective.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::{Adversary, Statblock};
use crate::domain::value_objects::{
    rescale_dice, rescale_dice_in_text, tier_shift_adjective, Tier,
};

static THRESHOLDS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<low>-?\d+)\s*/\s*(?P<high>-?\d+)\s*$")
        .expect("Failed to compile thresholds regex")
});

const LOW_THRESHOLD_STEP: i64 = 6;
const HIGH_THRESHOLD_STEP: i64 = 11;
const ATK_STEP: i64 = 1;
const HP_STEP: i64 = 2;
const STRESS_STEP: i64 = 2;
const DIFFICULTY_STEP: i64 = 3;

/// Result of asking for a statblock at another tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetierOutcome {
    /// Not an adversary, or already at the requested tier
    Unchanged,
    Changed(Statblock),
}

impl RetierOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, RetierOutcome::Changed(_))
    }

    /// The rescaled record, or `original` when nothing changed
    pub fn or_original(self, original: Statblock) -> Statblock {
        match self {
            RetierOutcome::Changed(stat) => stat,
            RetierOutcome::Unchanged => original,
        }
    }
}

/// Rescale `stat` to `new_tier`. The input is never modified.
pub fn retier(stat: &Statblock, new_tier: Tier) -> RetierOutcome {
    let Statblock::Adversary(adversary) = stat else {
        return RetierOutcome::Unchanged;
    };

    let old_tier = adversary.base.tier;
    let delta = old_tier.delta_to(new_tier);
    if delta == 0 {
        return RetierOutcome::Unchanged;
    }

    RetierOutcome::Changed(Statblock::Adversary(rescale_adversary(
        adversary, old_tier, new_tier, delta,
    )))
}

fn rescale_adversary(
    adversary: &Adversary,
    old_tier: Tier,
    new_tier: Tier,
    delta: i32,
) -> Adversary {
    let steps = i64::from(delta);
    let mut scaled = adversary.clone();

    scaled.base.name = format!("{} {}", tier_shift_adjective(delta), adversary.base.name);
    scaled.base.tier = new_tier;

    scaled.damage_dice = rescale_dice(&adversary.damage_dice, old_tier, new_tier);
    scaled.thresholds = shift_thresholds(&adversary.thresholds, steps);
    scaled.atk = shift_value(&adversary.atk, ATK_STEP * steps, Adversary::format_attack_bonus);
    scaled.hp = shift_value(&adversary.hp, HP_STEP * steps, plain);
    scaled.stress = shift_value(&adversary.stress, STRESS_STEP * steps, plain);
    scaled.difficulty = shift_value(&adversary.difficulty, DIFFICULTY_STEP * steps, plain);

    for feature in &mut scaled.base.features {
        feature.description = rescale_dice_in_text(&feature.description, old_tier, new_tier);
    }

    scaled
}

/// "low/high" shifted by (6, 11) per tier; other shapes, and shifts that
/// would overflow, are left alone
fn shift_thresholds(thresholds: &str, steps: i64) -> String {
    let Some(caps) = THRESHOLDS_PATTERN.captures(thresholds) else {
        return thresholds.to_string();
    };
    let shifted = caps["low"]
        .parse::<i64>()
        .ok()
        .and_then(|low| low.checked_add(LOW_THRESHOLD_STEP * steps))
        .zip(
            caps["high"]
                .parse::<i64>()
                .ok()
                .and_then(|high| high.checked_add(HIGH_THRESHOLD_STEP * steps)),
        );
    match shifted {
        Some((low, high)) => format!("{}/{}", low, high),
        None => thresholds.to_string(),
    }
}

/// Add `by` to an integer-as-string; non-numeric values and sums that do
/// not fit are left alone
fn shift_value(value: &str, by: i64, render: fn(i64) -> String) -> String {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|number| number.checked_add(by))
        .map_or_else(|| value.to_string(), render)
}

fn plain(value: i64) -> String {
    value.to_string()
}
