//! Remaps the third-party JSON export shape onto canonical field names
//!
//! Three independent migrations, each skipped when its trigger key is
//! missing or has the wrong shape:
//! - `attacks[0]` becomes the weapon fields
//! - feature `effect` becomes `description`
//! - `experiences` `{name, value}` pairs fold into `experience` strings
//!
//! Every other key passes through untouched.

use serde_json::Value;

use super::record::{scalar, Record};
use crate::domain::entities::Adversary;

/// (export key, canonical key) pairs copied from the first attack
const ATTACK_FIELDS: &[(&str, &str)] = &[
    ("name", "weapon"),
    ("damage", "damage_dice"),
    ("damage_type", "damage_type"),
    ("range", "range"),
];

pub fn normalize_json(mut record: Record) -> Record {
    migrate_attacks(&mut record);
    migrate_feature_effects(&mut record);
    migrate_experiences(&mut record);
    record
}

fn migrate_attacks(record: &mut Record) {
    let first = match record.get("attacks") {
        Some(Value::Array(attacks)) if !attacks.is_empty() => attacks[0].clone(),
        _ => return,
    };
    record.remove("attacks");

    let Value::Object(attack) = first else {
        return;
    };

    for (from, to) in ATTACK_FIELDS {
        if let Some(value) = attack.get(*from) {
            record.insert(to.to_string(), value.clone());
        }
    }

    if let Some(bonus) = attack.get("attack_bonus") {
        record.insert("atk".to_string(), Value::String(format_attack_bonus(bonus)));
    }
}

/// Positive bonuses gain an explicit "+", anything else keeps its text form
fn format_attack_bonus(bonus: &Value) -> String {
    let raw = scalar(Some(bonus)).unwrap_or_default();
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(value) if !trimmed.starts_with('+') => Adversary::format_attack_bonus(value),
        _ => raw,
    }
}

fn migrate_feature_effects(record: &mut Record) {
    let Some(Value::Array(features)) = record.get_mut("features") else {
        return;
    };

    for feature in features.iter_mut().filter_map(Value::as_object_mut) {
        if let Some(effect) = feature.remove("effect") {
            feature.insert("description".to_string(), effect);
        }
    }
}

fn migrate_experiences(record: &mut Record) {
    let experience: Vec<Value> = match record.get("experiences") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(entry) => {
                    let name = scalar(entry.get("name")).unwrap_or_default();
                    let value = scalar(entry.get("value")).unwrap_or_default();
                    Some(format!("{} {}", name, value).trim().to_string())
                }
                other => scalar(Some(other)),
            })
            .filter(|entry| !entry.is_empty())
            .map(Value::String)
            .collect(),
        _ => return,
    };

    record.remove("experiences");
    record.insert("experience".to_string(), Value::Array(experience));
}
