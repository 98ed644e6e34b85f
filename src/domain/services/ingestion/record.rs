//! Loose key/value records and their conversion into typed statblocks
//!
//! Both ingestion paths, and API payloads, first land in a [`Record`].
//! Conversion is lenient: numbers become strings, list fields accept
//! sequences or comma-joined strings, and unknown keys are dropped.

use serde_json::{Map, Value};

use crate::domain::entities::{Adversary, Environment, Feature, Statblock, StatblockBase};
use crate::domain::value_objects::{Category, FeatureType, Tier};

pub type Record = Map<String, Value>;

const ENVIRONMENT_ONLY_KEYS: &[&str] = &["impulses", "potential_adversaries", "adversaries"];

/// Build a typed statblock; `None` when the record has no usable name
pub fn statblock_from_record(record: &Record) -> Option<Statblock> {
    let name = scalar(record.get("name"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())?;

    let category = record_category(record);
    let kind = scalar(record.get("type"))
        .and_then(|kind| category.canonical_type(&kind))
        .unwrap_or_else(|| category.default_type());

    let base = StatblockBase {
        name,
        tier: tier_from(record.get("tier")),
        kind: kind.to_string(),
        description: scalar(record.get("description")).unwrap_or_default(),
        features: features_from(record.get("features")),
    };

    let text = |key: &str| scalar(record.get(key)).unwrap_or_default();

    let stat = match category {
        Category::Adversaries => Statblock::Adversary(Adversary {
            base,
            motives_tactics: list(record.get("motives_tactics")),
            difficulty: text("difficulty"),
            thresholds: text("thresholds"),
            hp: text("hp"),
            stress: text("stress"),
            atk: text("atk"),
            weapon: text("weapon"),
            range: text("range"),
            damage_dice: text("damage_dice"),
            damage_type: text("damage_type"),
            experience: list(record.get("experience")),
        }),
        Category::Environments => Statblock::Environment(Environment {
            base,
            impulses: list(record.get("impulses")),
            difficulty: text("difficulty"),
            potential_adversaries: record
                .get("potential_adversaries")
                .or_else(|| record.get("adversaries"))
                .map(joined)
                .unwrap_or_default(),
        }),
    };

    Some(stat)
}

/// Explicit `category` wins; otherwise environment-only keys decide
fn record_category(record: &Record) -> Category {
    let explicit = scalar(record.get("category")).and_then(|c| c.parse::<Category>().ok());
    if let Some(category) = explicit {
        return category;
    }
    if ENVIRONMENT_ONLY_KEYS.iter().any(|key| record.contains_key(*key)) {
        Category::Environments
    } else {
        Category::Adversaries
    }
}

/// Fill every absent canonical field from the category's sample values
pub fn apply_defaults(record: &mut Record, category: Category) {
    for (key, value) in category_defaults(category) {
        record.entry(key).or_insert(value);
    }
}

fn category_defaults(category: Category) -> Vec<(&'static str, Value)> {
    let mut defaults = vec![
        ("tier", Value::from("1")),
        ("type", Value::from(category.default_type())),
        ("description", Value::from("")),
        ("features", Value::Array(Vec::new())),
    ];

    match category {
        Category::Adversaries => defaults.extend([
            ("motives_tactics", Value::Array(Vec::new())),
            ("difficulty", Value::from("11")),
            ("thresholds", Value::from("7/12")),
            ("hp", Value::from("5")),
            ("stress", Value::from("3")),
            ("atk", Value::from("+1")),
            ("weapon", Value::from("Weapon")),
            ("range", Value::from("Melee")),
            ("damage_dice", Value::from("1d6+1")),
            ("damage_type", Value::from("phy")),
            ("experience", Value::Array(Vec::new())),
        ]),
        Category::Environments => defaults.extend([
            ("impulses", Value::Array(Vec::new())),
            ("difficulty", Value::from("11")),
            (
                "potential_adversaries",
                Value::from("Beasts (Bear, Dire Wolf), Bandits (Minion)"),
            ),
        ]),
    }

    defaults
}

/// Render a scalar JSON value as text; containers and null have no text form
pub fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Comma-split a string, dropping blank items
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| scalar(Some(item)))
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(other) => scalar(Some(other))
            .map(|text| split_list(&text))
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

fn joined(value: &Value) -> String {
    match value {
        Value::Array(_) => list(Some(value)).join(", "),
        other => scalar(Some(other)).unwrap_or_default(),
    }
}

fn tier_from(value: Option<&Value>) -> Tier {
    let raw = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    raw.map(Tier::clamped).unwrap_or_default()
}

fn features_from(value: Option<&Value>) -> Vec<Feature> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = scalar(item.get("name"))?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let feature_type = scalar(item.get("type"))
                .and_then(|t| FeatureType::parse(&t))
                .unwrap_or_default();
            let description = scalar(item.get("description"))
                .or_else(|| scalar(item.get("effect")))
                .unwrap_or_default();
            Some(Feature::new(name, feature_type, description))
        })
        .collect()
}
