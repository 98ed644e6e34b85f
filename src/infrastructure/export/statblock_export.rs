//! Statblock export formats
//!
//! Markdown renders a statblock for reading or pasting into notes. The
//! external JSON form is the third-party shape the ingestion normalizer
//! understands, so an export can be pasted straight back in.

use serde::Serialize;

use crate::domain::entities::{Adversary, Environment, Feature, Statblock};
use crate::domain::value_objects::FeatureType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

/// External adversary or environment, untagged on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExternalStatblock {
    Adversary(ExternalAdversary),
    Environment(ExternalEnvironment),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalAdversary {
    pub name: String,
    pub category: &'static str,
    pub tier: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub motives_tactics: Vec<String>,
    pub difficulty: String,
    pub thresholds: String,
    pub hp: String,
    pub stress: String,
    pub attacks: Vec<ExternalAttack>,
    pub experiences: Vec<ExternalExperience>,
    pub features: Vec<ExternalFeature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalAttack {
    pub name: String,
    pub attack_bonus: i64,
    pub damage: String,
    pub damage_type: String,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalExperience {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalFeature {
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalEnvironment {
    pub name: String,
    pub category: &'static str,
    pub tier: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub impulses: Vec<String>,
    pub difficulty: String,
    pub adversaries: Vec<String>,
    pub features: Vec<ExternalFeature>,
}

impl From<&Statblock> for ExternalStatblock {
    fn from(stat: &Statblock) -> Self {
        match stat {
            Statblock::Adversary(adversary) => ExternalStatblock::Adversary(adversary.into()),
            Statblock::Environment(environment) => {
                ExternalStatblock::Environment(environment.into())
            }
        }
    }
}

impl From<&Adversary> for ExternalAdversary {
    fn from(adversary: &Adversary) -> Self {
        let base = &adversary.base;
        Self {
            name: base.name.clone(),
            category: "Adversaries",
            tier: base.tier.value(),
            kind: base.kind.clone(),
            description: base.description.clone(),
            motives_tactics: adversary.motives_tactics.clone(),
            difficulty: adversary.difficulty.clone(),
            thresholds: adversary.thresholds.clone(),
            hp: adversary.hp.clone(),
            stress: adversary.stress.clone(),
            attacks: external_attacks(adversary),
            experiences: adversary
                .experience
                .iter()
                .map(|entry| split_experience(entry))
                .collect(),
            features: external_features(&base.features),
        }
    }
}

impl From<&Environment> for ExternalEnvironment {
    fn from(environment: &Environment) -> Self {
        let base = &environment.base;
        Self {
            name: base.name.clone(),
            category: "Environments",
            tier: base.tier.value(),
            kind: base.kind.clone(),
            description: base.description.clone(),
            impulses: environment.impulses.clone(),
            difficulty: environment.difficulty.clone(),
            adversaries: split_adversaries(&environment.potential_adversaries),
            features: external_features(&base.features),
        }
    }
}

/// One attack for the weapon; none when the adversary has no weapon
fn external_attacks(adversary: &Adversary) -> Vec<ExternalAttack> {
    if adversary.weapon.is_empty() {
        return Vec::new();
    }
    vec![ExternalAttack {
        name: adversary.weapon.clone(),
        attack_bonus: attack_bonus(&adversary.atk),
        damage: adversary.damage_dice.clone(),
        damage_type: adversary.damage_type.clone(),
        range: adversary.range.clone(),
    }]
}

/// Leading integer of the bonus text ("+3", "-1 vs. Evasion"); 0 when there is none
fn attack_bonus(atk: &str) -> i64 {
    let text = atk.trim().replacen('+', "", 1);
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

fn external_features(features: &[Feature]) -> Vec<ExternalFeature> {
    features
        .iter()
        .map(|feature| ExternalFeature {
            name: feature.name.clone(),
            feature_type: feature.feature_type,
            effect: feature.description.clone(),
        })
        .collect()
}

/// "Keen Senses +2" -> ("Keen Senses", "+2"), split at the last space
fn split_experience(entry: &str) -> ExternalExperience {
    let entry = entry.trim();
    match entry.rsplit_once(' ') {
        Some((name, value)) => ExternalExperience {
            name: name.trim_end().to_string(),
            value: value.to_string(),
        },
        None => ExternalExperience {
            name: entry.to_string(),
            value: String::new(),
        },
    }
}

/// Comma split that keeps parenthesised groups together
fn split_adversaries(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn render_markdown(stat: &Statblock) -> String {
    let base = stat.base();
    let mut lines = vec![
        format!("**{}**", base.name),
        format!("*Tier {} {} {}*", base.tier, base.kind, stat.category()),
    ];
    if !base.description.is_empty() {
        lines.push(base.description.clone());
    }

    match stat {
        Statblock::Adversary(adversary) => {
            if !adversary.motives_tactics.is_empty() {
                lines.push(format!(
                    "**Motives & Tactics:** {}",
                    adversary.motives_tactics.join(", ")
                ));
            }
            lines.push(format!("**Difficulty:** {}", adversary.difficulty));
            lines.push(format!(
                "**Thresholds:** {} | **HP:** {} | **Stress:** {}",
                adversary.thresholds, adversary.hp, adversary.stress
            ));
            lines.push(format!(
                "**{}** ({}, {}) - {} {} damage",
                or_placeholder(&adversary.weapon, "Weapon"),
                adversary.atk,
                or_placeholder(&adversary.range, "Range"),
                adversary.damage_dice,
                adversary.damage_type
            ));
            lines.push(format!("**Experience:** {}", adversary.experience.join(", ")));
        }
        Statblock::Environment(environment) => {
            if !environment.impulses.is_empty() {
                lines.push(format!("**Impulses:** {}", environment.impulses.join(", ")));
            }
            lines.push(format!("**Difficulty:** {}", environment.difficulty));
            if !environment.potential_adversaries.is_empty() {
                lines.push(format!(
                    "**Potential Adversaries:** {}",
                    environment.potential_adversaries
                ));
            }
        }
    }

    lines.push("**Features**".to_string());
    for feature in &base.features {
        lines.push(format!(
            "* **{} ({}):** {}",
            feature.name, feature.feature_type, feature.description
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
