//! Dice expressions and proportional tier rescaling
//!
//! A damage expression is either a flat number ("7") or dice notation
//! with an optional signed modifier ("3d8+2"). Rescaling multiplies the
//! die count and modifier magnitude by `new_tier / old_tier`, flooring
//! the result. Die size and modifier sign never change.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Tier;

/// A whole expression: "2d6", "1d12+2", "3d4-1"
static DICE_EXPR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<count>\d+)d(?P<sides>\d+)(?:(?P<sign>[+-])(?P<modifier>\d+))?$")
        .expect("Failed to compile dice expression regex")
});

/// Dice mentions embedded in prose
static EMBEDDED_DICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+d\d+(?:[+-]\d+)?").expect("Failed to compile embedded dice regex")
});

static FLAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Failed to compile flat number regex"));

/// Sign of a dice modifier, kept verbatim through rescaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierSign {
    Plus,
    Minus,
}

impl ModifierSign {
    fn as_char(self) -> char {
        match self {
            ModifierSign::Plus => '+',
            ModifierSign::Minus => '-',
        }
    }
}

/// A parsed damage expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiceExpression {
    Flat(u64),
    Dice {
        count: u64,
        sides: u64,
        sign: ModifierSign,
        /// Magnitude of the modifier; zero means no modifier
        modifier: u64,
    },
}

impl DiceExpression {
    /// Parse a whole expression, ignoring surrounding whitespace.
    ///
    /// Returns `None` for anything that is neither a flat number nor dice.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();

        if let Some(caps) = DICE_EXPR_PATTERN.captures(expr) {
            return Self::from_captures(&caps);
        }

        if FLAT_PATTERN.is_match(expr) {
            return expr.parse().ok().map(DiceExpression::Flat);
        }

        None
    }

    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let count = caps.name("count")?.as_str().parse().ok()?;
        let sides = caps.name("sides")?.as_str().parse().ok()?;
        let (sign, modifier) = match (caps.name("sign"), caps.name("modifier")) {
            (Some(sign), Some(value)) => {
                let sign = if sign.as_str() == "-" {
                    ModifierSign::Minus
                } else {
                    ModifierSign::Plus
                };
                (sign, value.as_str().parse().ok()?)
            }
            _ => (ModifierSign::Plus, 0),
        };

        Some(DiceExpression::Dice {
            count,
            sides,
            sign,
            modifier,
        })
    }

    /// Scale this expression from `old_tier` to `new_tier`
    pub fn rescaled(&self, old_tier: Tier, new_tier: Tier) -> Self {
        match *self {
            DiceExpression::Flat(value) => {
                DiceExpression::Flat(scale(value, old_tier, new_tier))
            }
            DiceExpression::Dice {
                count,
                sides,
                sign,
                modifier,
            } => DiceExpression::Dice {
                count: scale(count, old_tier, new_tier).max(1),
                sides,
                sign,
                modifier: if modifier == 0 {
                    0
                } else {
                    scale(modifier, old_tier, new_tier)
                },
            },
        }
    }
}

impl std::fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiceExpression::Flat(value) => write!(f, "{}", value),
            DiceExpression::Dice {
                count,
                sides,
                modifier: 0,
                ..
            } => write!(f, "{}d{}", count, sides),
            DiceExpression::Dice {
                count,
                sides,
                sign,
                modifier,
            } => write!(f, "{}d{}{}{}", count, sides, sign.as_char(), modifier),
        }
    }
}

/// floor(value / old * new), done in integers
fn scale(value: u64, old_tier: Tier, new_tier: Tier) -> u64 {
    value.saturating_mul(u64::from(new_tier.value())) / u64::from(old_tier.value())
}

/// Rescale a single expression; unrecognised shapes come back unchanged
pub fn rescale_dice(expr: &str, old_tier: Tier, new_tier: Tier) -> String {
    match DiceExpression::parse(expr) {
        Some(parsed) => parsed.rescaled(old_tier, new_tier).to_string(),
        None => expr.to_string(),
    }
}

/// Rescale every dice mention inside free text, leaving the prose intact
pub fn rescale_dice_in_text(text: &str, old_tier: Tier, new_tier: Tier) -> String {
    EMBEDDED_DICE_PATTERN
        .replace_all(text, |caps: &Captures<'_>| rescale_dice(&caps[0], old_tier, new_tier))
        .into_owned()
}
