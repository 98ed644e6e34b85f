//! Statblock entity - Adversaries and environments sharing a common base
//!
//! Records serialize to a flat JSON object tagged by `category`, e.g.
//! `{"category": "Adversaries", "name": "Bear", "tier": 1, "type": "Bruiser", ...}`.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Category, FeatureType, Tier};

/// A named ability on a statblock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(rename = "type", default)]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub description: String,
}

impl Feature {
    pub fn new(
        name: impl Into<String>,
        feature_type: FeatureType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            feature_type,
            description: description.into(),
        }
    }

    /// Continue the description with another source line
    pub fn append_line(&mut self, line: &str) {
        if !self.description.is_empty() {
            self.description.push('\n');
        }
        self.description.push_str(line);
    }
}

/// Fields shared by every category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatblockBase {
    /// Unique (case-insensitive) key of the record
    pub name: String,
    pub tier: Tier,
    /// Member of the category's type vocabulary
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl StatblockBase {
    pub fn new(name: impl Into<String>, tier: Tier, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier,
            kind: kind.into(),
            description: String::new(),
            features: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    #[serde(flatten)]
    pub base: StatblockBase,
    #[serde(default)]
    pub motives_tactics: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    /// "low/high" damage thresholds
    #[serde(default)]
    pub thresholds: String,
    #[serde(default)]
    pub hp: String,
    #[serde(default)]
    pub stress: String,
    /// Signed attack bonus, e.g. "+2"
    #[serde(default)]
    pub atk: String,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub damage_dice: String,
    #[serde(default)]
    pub damage_type: String,
    #[serde(default)]
    pub experience: Vec<String>,
}

impl Adversary {
    pub fn new(base: StatblockBase) -> Self {
        Self {
            base,
            motives_tactics: Vec::new(),
            difficulty: String::new(),
            thresholds: String::new(),
            hp: String::new(),
            stress: String::new(),
            atk: String::new(),
            weapon: String::new(),
            range: String::new(),
            damage_dice: String::new(),
            damage_type: String::new(),
            experience: Vec::new(),
        }
    }

    /// Attack bonuses carry an explicit "+" when positive
    pub fn format_attack_bonus(bonus: i64) -> String {
        if bonus > 0 {
            format!("+{}", bonus)
        } else {
            bonus.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(flatten)]
    pub base: StatblockBase,
    #[serde(default)]
    pub impulses: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub potential_adversaries: String,
}

impl Environment {
    pub fn new(base: StatblockBase) -> Self {
        Self {
            base,
            impulses: Vec::new(),
            difficulty: String::new(),
            potential_adversaries: String::new(),
        }
    }
}

/// A canonical statblock record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum Statblock {
    #[serde(rename = "Adversaries")]
    Adversary(Adversary),
    #[serde(rename = "Environments")]
    Environment(Environment),
}

impl Statblock {
    pub fn base(&self) -> &StatblockBase {
        match self {
            Statblock::Adversary(adversary) => &adversary.base,
            Statblock::Environment(environment) => &environment.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut StatblockBase {
        match self {
            Statblock::Adversary(adversary) => &mut adversary.base,
            Statblock::Environment(environment) => &mut environment.base,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Statblock::Adversary(_) => Category::Adversaries,
            Statblock::Environment(_) => Category::Environments,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn tier(&self) -> Tier {
        self.base().tier
    }

    pub fn kind(&self) -> &str {
        &self.base().kind
    }

    pub fn description(&self) -> &str {
        &self.base().description
    }

    pub fn features(&self) -> &[Feature] {
        &self.base().features
    }

    /// Whether this record is stored under `name` (trimmed, case-insensitive)
    pub fn is_named(&self, name: &str) -> bool {
        self.name().trim().to_lowercase() == name.trim().to_lowercase()
    }
}
