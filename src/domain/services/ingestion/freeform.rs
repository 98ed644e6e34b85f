//! Freeform statblock text grammar
//!
//! Layout, over trimmed non-blank lines:
//!
//! ```text
//! Dire Wolf
//! Tier 1 Skulk
//! A wolf the size of a horse.
//! Motives & Tactics: Hunt, encircle, howl
//! Difficulty: 12 | Thresholds: 5/9 | HP: 4 | Stress: 3
//! ATK: +2 | Claws: Melee | 1d6+2 phy
//! Experience: Keen Senses +3
//! Features
//! Pack Tactics (Passive): Deals extra damage when an ally is Close.
//! ```
//!
//! Every construct degrades to "append to description" or "use default"
//! rather than failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::feature_block::FeatureBlock;
use super::line_rules::{
    classify_adversary_line, classify_environment_line, is_description_line, Line, Section,
};
use super::record::{apply_defaults, split_list, statblock_from_record, Record};
use crate::domain::entities::{Feature, Statblock};
use crate::domain::value_objects::Category;

static TIER_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Tier\s*(?P<tier>\d+)").expect("Failed to compile tier regex"));

/// One word-boundary pattern per (category, type), in declaration order
static TYPE_PATTERNS: Lazy<Vec<(Category, &'static str, Regex)>> = Lazy::new(|| {
    Category::ALL
        .iter()
        .flat_map(|&category| category.types().iter().map(move |&kind| (category, kind)))
        .map(|(category, kind)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(kind));
            let regex = Regex::new(&pattern).expect("Failed to compile type regex");
            (category, kind, regex)
        })
        .collect()
});

/// Keys whose values are comma-separated lists
const LIST_KEYS: &[&str] = &["motives_tactics", "impulses", "experience"];

/// Keys the header decides; body lines may not override them
const RESERVED_KEYS: &[&str] = &["name", "category"];

/// Parse hand-written statblock text; `None` when there is no name line
pub fn parse_text(text: &str) -> Option<Statblock> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let (&name, mut rest) = lines.split_first()?;

    let mut record = Record::new();
    record.insert("name".to_string(), Value::from(name));
    record.insert("tier".to_string(), Value::from("1"));

    let mut category = Category::Adversaries;
    record.insert("type".to_string(), Value::from(category.default_type()));

    if let Some((header, remaining)) = rest.split_first() {
        if header.starts_with("Tier ") {
            let tier = TIER_HEADER.captures(header).map(|caps| caps["tier"].to_string());
            if let Some(tier) = tier {
                record.insert("tier".to_string(), Value::from(tier));
            }
            if let Some((found, kind)) = scan_type(header) {
                category = found;
                record.insert("type".to_string(), Value::from(kind));
            }
            rest = remaining;
        }
    }

    let description_len = rest
        .iter()
        .take_while(|line| is_description_line(line))
        .count();
    let (description, body) = rest.split_at(description_len);
    record.insert("description".to_string(), Value::from(description.join(" ")));

    let features = match category {
        Category::Adversaries => parse_adversary_body(body, &mut record),
        Category::Environments => parse_environment_body(body, &mut record),
    };

    record.insert("category".to_string(), Value::from(category.as_str()));
    apply_defaults(&mut record, category);

    let mut stat = statblock_from_record(&record)?;
    stat.base_mut().features = features;
    Some(stat)
}

/// First (category, type) whose type word appears in the header line
fn scan_type(header: &str) -> Option<(Category, &'static str)> {
    TYPE_PATTERNS
        .iter()
        .find(|(_, _, pattern)| pattern.is_match(header))
        .map(|(category, kind, _)| (*category, *kind))
}

fn parse_adversary_body(body: &[&str], record: &mut Record) -> Vec<Feature> {
    let mut lines = body.iter().copied().peekable();

    // The line after the description carries motives & tactics unless a
    // stronger rule claims it
    if let Some(&first) = lines.peek() {
        if matches!(
            classify_adversary_line(first, Section::Stats),
            Line::Field { .. } | Line::Unrecognised
        ) {
            let motives = first.split_once(':').map_or(first, |(_, rest)| rest);
            record.insert("motives_tactics".to_string(), list_value(motives));
            lines.next();
        }
    }

    let mut section = Section::Stats;
    let mut block = FeatureBlock::new();

    for line in lines {
        match classify_adversary_line(line, section) {
            Line::Stats {
                difficulty,
                thresholds,
                hp,
                stress,
            } => {
                record.insert("difficulty".to_string(), Value::from(difficulty));
                record.insert("thresholds".to_string(), Value::from(thresholds));
                record.insert("hp".to_string(), Value::from(hp));
                record.insert("stress".to_string(), Value::from(stress));
            }
            Line::Attack {
                atk,
                weapon,
                range,
                damage_dice,
                damage_type,
            } => {
                record.insert("atk".to_string(), Value::from(atk));
                record.insert("weapon".to_string(), Value::from(weapon));
                record.insert("range".to_string(), Value::from(range));
                record.insert("damage_dice".to_string(), Value::from(damage_dice));
                if let Some(damage_type) = damage_type {
                    record.insert("damage_type".to_string(), Value::from(damage_type));
                }
            }
            other => apply_common(other, record, &mut section, &mut block),
        }
    }

    let is_physical = record
        .get("damage_type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("physical"));
    if is_physical {
        record.insert("damage_type".to_string(), Value::from("phy"));
    }

    block.finish()
}

fn parse_environment_body(body: &[&str], record: &mut Record) -> Vec<Feature> {
    let mut section = Section::Stats;
    let mut block = FeatureBlock::new();

    for line in body {
        apply_common(
            classify_environment_line(line, section),
            record,
            &mut section,
            &mut block,
        );
    }

    block.finish()
}

/// Lines whose handling is identical for both categories
fn apply_common(
    line: Line<'_>,
    record: &mut Record,
    section: &mut Section,
    block: &mut FeatureBlock,
) {
    match line {
        Line::FeaturesHeader => {
            *section = Section::Features;
            block.flush();
        }
        Line::FeatureStart(feature) => block.start(feature),
        Line::Continuation(text) => block.continue_with(text),
        Line::Field { key, value } => store_field(record, key, value),
        Line::Stats { .. } | Line::Attack { .. } => {}
        Line::Unrecognised => debug!("Skipping unrecognised statblock line"),
    }
}

fn store_field(record: &mut Record, key: String, value: &str) {
    if RESERVED_KEYS.contains(&key.as_str()) {
        debug!(key = %key, "Ignoring reserved key in statblock body");
        return;
    }
    let value = if LIST_KEYS.contains(&key.as_str()) {
        list_value(value)
    } else {
        Value::from(value.trim())
    };
    record.insert(key, value);
}

fn list_value(text: &str) -> Value {
    Value::Array(split_list(text).into_iter().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FeatureType, Tier};

    const WOLF: &str = "
        Dire Wolf
        Tier 1 Skulk
        A wolf the size of a horse.
        It hunts at night.
        Motives & Tactics: Hunt, encircle, howl
        Difficulty: 12 | Thresholds: 5/9 | HP: 4 | Stress: 3
        ATK: +2 | Claws: Melee | 1d6+2 physical
        Experience: Keen Senses +3, Tracking +2
        Features
        Pack Tactics (Passive): Deals 1d6 extra damage
        when an ally is Close.
        Howl – Action: Mark a Stress to summon 1d4 wolves.
    ";

    fn adversary(stat: Statblock) -> crate::domain::entities::Adversary {
        match stat {
            Statblock::Adversary(adversary) => adversary,
            Statblock::Environment(_) => panic!("expected adversary"),
        }
    }

    #[test]
    fn test_full_adversary() {
        let stat = parse_text(WOLF).unwrap();

        assert_eq!(stat.name(), "Dire Wolf");
        assert_eq!(stat.category(), Category::Adversaries);
        assert_eq!(stat.tier(), Tier::MIN);
        assert_eq!(stat.kind(), "Skulk");
        assert_eq!(stat.description(), "A wolf the size of a horse. It hunts at night.");

        let wolf = adversary(stat);
        assert_eq!(wolf.motives_tactics, vec!["Hunt", "encircle", "howl"]);
        assert_eq!(wolf.difficulty, "12");
        assert_eq!(wolf.thresholds, "5/9");
        assert_eq!(wolf.hp, "4");
        assert_eq!(wolf.stress, "3");
        assert_eq!(wolf.atk, "+2");
        assert_eq!(wolf.weapon, "Claws");
        assert_eq!(wolf.range, "Melee");
        assert_eq!(wolf.damage_dice, "1d6+2");
        assert_eq!(wolf.damage_type, "phy");
        assert_eq!(wolf.experience, vec!["Keen Senses +3", "Tracking +2"]);

        let features = &wolf.base.features;
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "Pack Tactics");
        assert_eq!(features[0].feature_type, FeatureType::Passive);
        assert_eq!(
            features[0].description,
            "Deals 1d6 extra damage\nwhen an ally is Close."
        );
        assert_eq!(features[1].name, "Howl");
        assert_eq!(features[1].feature_type, FeatureType::Action);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(parse_text("").is_none());
        assert!(parse_text("   \n\n  ").is_none());
    }

    #[test]
    fn test_name_only_is_filled_with_defaults() {
        let stat = parse_text("Lonely Goblin").unwrap();

        assert_eq!(stat.tier(), Tier::MIN);
        assert_eq!(stat.kind(), "Solo");
        let goblin = adversary(stat);
        assert_eq!(goblin.difficulty, "11");
        assert_eq!(goblin.thresholds, "7/12");
        assert_eq!(goblin.damage_dice, "1d6+1");
        assert!(goblin.motives_tactics.is_empty());
    }

    #[test]
    fn test_header_category_comes_from_type_word() {
        let stat = parse_text("Old Bridge\nTier 3 traversal environment\nCreaky planks.").unwrap();

        assert_eq!(stat.category(), Category::Environments);
        assert_eq!(stat.kind(), "Traversal");
        assert_eq!(stat.tier().value(), 3);
    }

    #[test]
    fn test_shared_type_resolves_to_first_category() {
        let stat = parse_text("Royal Ball\nTier 2 Social").unwrap();
        assert_eq!(stat.category(), Category::Environments);
        assert_eq!(stat.kind(), "Social");
    }

    #[test]
    fn test_type_requires_word_boundary() {
        let stat = parse_text("Bandit\nTier 1 Soloist").unwrap();
        assert_eq!(stat.kind(), "Solo");
        assert_eq!(stat.category(), Category::Adversaries);

        let stat = parse_text("Bandit\nTier 1 Hordes of Minion rats").unwrap();
        assert_eq!(stat.kind(), "Minion");
    }

    #[test]
    fn test_stats_line_directly_after_description_is_not_motives() {
        let stat = parse_text("Slime\nTier 1 Minion\nDifficulty: 9 | 3/6 | 1 | 1").unwrap();
        let slime = adversary(stat);
        assert_eq!(slime.difficulty, "9");
        assert!(slime.motives_tactics.is_empty());
    }

    #[test]
    fn test_feature_continuation_appends_line() {
        let text = "Troll\nTier 2 Bruiser\nFeatures\nRegenerate (Passive): Heals 1 HP.\nFire stops this.";
        let stat = parse_text(text).unwrap();
        let features = stat.features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].description, "Heals 1 HP.\nFire stops this.");
    }

    #[test]
    fn test_generic_key_values_outside_features() {
        let text = "Archer\nTier 1 Ranged\nMotives: Snipe\nDamage Type: Magic\nExperience: Archery +2";
        let archer = adversary(parse_text(text).unwrap());
        assert_eq!(archer.damage_type, "Magic");
        assert_eq!(archer.experience, vec!["Archery +2"]);
        assert_eq!(archer.motives_tactics, vec!["Snipe"]);
    }

    #[test]
    fn test_environment_body() {
        let text = "
            Misty Marsh
            Tier 2 Traversal
            Fog hangs over black water.
            Impulses: Drown the unwary, hide paths
            Difficulty: 13
            Potential Adversaries: Bog Hag, Swamp Lizards
            Features
            Sinking Mud – Reaction: Targets are Restrained.
            They sink 1d4 feet.
            Will-o'-Wisps: Lights lure travellers.
            Wandering (Passive): The path shifts.
        ";
        let stat = parse_text(text).unwrap();

        assert_eq!(stat.description(), "Fog hangs over black water.");
        let marsh = match stat {
            Statblock::Environment(environment) => environment,
            Statblock::Adversary(_) => panic!("expected environment"),
        };
        assert_eq!(marsh.impulses, vec!["Drown the unwary", "hide paths"]);
        assert_eq!(marsh.difficulty, "13");
        assert_eq!(marsh.potential_adversaries, "Bog Hag, Swamp Lizards");

        let features = &marsh.base.features;
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].feature_type, FeatureType::Reaction);
        assert_eq!(features[0].description, "Targets are Restrained.\nThey sink 1d4 feet.");
        assert_eq!(features[1].name, "Will-o'-Wisps");
        assert_eq!(features[1].feature_type, FeatureType::Action);
        assert_eq!(features[2].feature_type, FeatureType::Passive);
    }

    #[test]
    fn test_environment_defaults() {
        let stat = parse_text("Quiet Glade\nTier 1 Exploration").unwrap();
        match stat {
            Statblock::Environment(environment) => {
                assert!(!environment.potential_adversaries.is_empty());
                assert_eq!(environment.difficulty, "11");
            }
            Statblock::Adversary(_) => panic!("expected environment"),
        }
    }
}
