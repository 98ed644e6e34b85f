//! Ordered line matchers for the freeform statblock grammar
//!
//! Each category has a rule table evaluated top to bottom; the first rule
//! that applies to the current section and matches the line wins. Lines
//! can superficially match several rules (a stat line is also a
//! `key: value` line), so table order is the priority order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::Feature;
use crate::domain::value_objects::FeatureType;

static STATS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        difficulty \s*:\s* (?P<difficulty>\d+) \s*\|
        [^|\d]* (?P<low>\d+) \s*/\s* (?P<high>\d+) \s*\|
        [^|\d]* (?P<hp>\d+) \s*\|
        [^|\d]* (?P<stress>\d+)
        ",
    )
    .expect("Failed to compile stats line regex")
});

static ATTACK_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        atk \s*:\s* (?P<atk>[+-]?\d+) \s*\|
        \s* (?P<weapon>[^|]+?) \s*\|
        \s* (?P<dice>\d+d\d+(?:[+-]\d+)?|\d+)
        (?:\s+ (?P<kind>[a-z]+))?
        ",
    )
    .expect("Failed to compile attack line regex")
});

static PAREN_FEATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<name>.+?)\s*\((?P<kind>action|reaction|passive|evolution|transformation)\)\s*:\s*(?P<desc>.*)$",
    )
    .expect("Failed to compile feature regex")
});

static DASH_FEATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<name>.+?)\s+[-–—]\s+(?P<kind>action|reaction|passive|evolution|transformation)\s*:\s*(?P<desc>.*)$",
    )
    .expect("Failed to compile dash feature regex")
});

static UNTYPED_FEATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[^:]+?)\s*:\s*(?P<desc>.*)$")
        .expect("Failed to compile untyped feature regex")
});

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[^:]+?)\s*:\s*(?P<value>.*)$").expect("Failed to compile key regex")
});

static IMPULSES_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^impulses\s*:\s*(?P<value>.*)$").expect("Failed to compile impulses regex")
});

static DIFFICULTY_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^difficulty\s*:\s*(?P<value>.*)$")
        .expect("Failed to compile difficulty regex")
});

static POTENTIAL_ADVERSARIES_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^potential\s+adversaries\s*:\s*(?P<value>.*)$")
        .expect("Failed to compile potential adversaries regex")
});

/// Lines that end the free description block
static DESCRIPTION_STOP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z][\w \t&/'-]*:|motives|impulses)")
        .expect("Failed to compile description stop regex")
});

/// Which part of the body the scanner is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Stats,
    Features,
}

/// What a single body line means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Stats {
        difficulty: &'a str,
        thresholds: String,
        hp: &'a str,
        stress: &'a str,
    },
    Attack {
        atk: &'a str,
        weapon: String,
        range: String,
        damage_dice: &'a str,
        damage_type: Option<&'a str>,
    },
    FeaturesHeader,
    FeatureStart(Feature),
    Field {
        key: String,
        value: &'a str,
    },
    Continuation(&'a str),
    Unrecognised,
}

/// Where a rule is allowed to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Anywhere,
    Only(Section),
}

struct LineRule {
    scope: Scope,
    matcher: for<'a> fn(&'a str) -> Option<Line<'a>>,
}

const ADVERSARY_RULES: &[LineRule] = &[
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_stats,
    },
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_attack,
    },
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_features_header,
    },
    LineRule {
        scope: Scope::Only(Section::Features),
        matcher: match_typed_feature,
    },
    LineRule {
        scope: Scope::Only(Section::Stats),
        matcher: match_key_value,
    },
];

const ENVIRONMENT_RULES: &[LineRule] = &[
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_impulses,
    },
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_difficulty,
    },
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_potential_adversaries,
    },
    LineRule {
        scope: Scope::Anywhere,
        matcher: match_features_header,
    },
    LineRule {
        scope: Scope::Only(Section::Features),
        matcher: match_typed_feature,
    },
    LineRule {
        scope: Scope::Only(Section::Features),
        matcher: match_untyped_feature,
    },
];

fn classify<'a>(rules: &[LineRule], line: &'a str, section: Section) -> Line<'a> {
    rules
        .iter()
        .filter(|rule| match rule.scope {
            Scope::Anywhere => true,
            Scope::Only(only) => only == section,
        })
        .find_map(|rule| (rule.matcher)(line))
        .unwrap_or(match section {
            Section::Features => Line::Continuation(line),
            Section::Stats => Line::Unrecognised,
        })
}

pub fn classify_adversary_line(line: &str, section: Section) -> Line<'_> {
    classify(ADVERSARY_RULES, line, section)
}

pub fn classify_environment_line(line: &str, section: Section) -> Line<'_> {
    classify(ENVIRONMENT_RULES, line, section)
}

/// Whether a line still belongs to the free description after the header
pub fn is_description_line(line: &str) -> bool {
    !DESCRIPTION_STOP.is_match(line) && match_features_header(line).is_none()
}

/// "Motives & Tactics" -> "motives_tactics"
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn match_stats(line: &str) -> Option<Line<'_>> {
    let caps = STATS_LINE.captures(line)?;
    Some(Line::Stats {
        difficulty: caps.name("difficulty")?.as_str(),
        thresholds: format!("{}/{}", caps.name("low")?.as_str(), caps.name("high")?.as_str()),
        hp: caps.name("hp")?.as_str(),
        stress: caps.name("stress")?.as_str(),
    })
}

fn match_attack(line: &str) -> Option<Line<'_>> {
    let caps = ATTACK_LINE.captures(line)?;
    let (weapon, range) = split_weapon(caps.name("weapon")?.as_str());
    Some(Line::Attack {
        atk: caps.name("atk")?.as_str(),
        weapon,
        range,
        damage_dice: caps.name("dice")?.as_str(),
        damage_type: caps.name("kind").map(|m| m.as_str()),
    })
}

/// "Claws: Melee" or "Longbow Far"; a lone word is the weapon
fn split_weapon(text: &str) -> (String, String) {
    if let Some((weapon, range)) = text.split_once(':') {
        return (weapon.trim().to_string(), range.trim().to_string());
    }
    match text.trim().rsplit_once(char::is_whitespace) {
        Some((weapon, range)) => (weapon.trim().to_string(), range.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

fn match_features_header(line: &str) -> Option<Line<'_>> {
    line.trim()
        .eq_ignore_ascii_case("features")
        .then_some(Line::FeaturesHeader)
}

fn match_typed_feature(line: &str) -> Option<Line<'_>> {
    let caps = PAREN_FEATURE
        .captures(line)
        .or_else(|| DASH_FEATURE.captures(line))?;
    let feature_type = FeatureType::parse(caps.name("kind")?.as_str())?;
    Some(Line::FeatureStart(Feature::new(
        caps.name("name")?.as_str().trim(),
        feature_type,
        caps.name("desc")?.as_str().trim(),
    )))
}

fn match_untyped_feature(line: &str) -> Option<Line<'_>> {
    let caps = UNTYPED_FEATURE.captures(line)?;
    Some(Line::FeatureStart(Feature::new(
        caps.name("name")?.as_str().trim(),
        FeatureType::Action,
        caps.name("desc")?.as_str().trim(),
    )))
}

fn match_key_value(line: &str) -> Option<Line<'_>> {
    let caps = KEY_VALUE.captures(line)?;
    let key = normalize_key(caps.name("key")?.as_str());
    if key.is_empty() {
        return None;
    }
    Some(Line::Field {
        key,
        value: caps.name("value")?.as_str().trim(),
    })
}

fn field_match<'a>(pattern: &Regex, key: &str, line: &'a str) -> Option<Line<'a>> {
    let caps = pattern.captures(line)?;
    Some(Line::Field {
        key: key.to_string(),
        value: caps.name("value")?.as_str().trim(),
    })
}

fn match_impulses(line: &str) -> Option<Line<'_>> {
    field_match(&IMPULSES_FIELD, "impulses", line)
}

fn match_difficulty(line: &str) -> Option<Line<'_>> {
    field_match(&DIFFICULTY_FIELD, "difficulty", line)
}

fn match_potential_adversaries(line: &str) -> Option<Line<'_>> {
    field_match(&POTENTIAL_ADVERSARIES_FIELD, "potential_adversaries", line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_with_labels() {
        let line = "Difficulty: 14 | Thresholds: 8/15 | HP: 5 | Stress: 3";
        assert_eq!(
            classify_adversary_line(line, Section::Stats),
            Line::Stats {
                difficulty: "14",
                thresholds: "8/15".to_string(),
                hp: "5",
                stress: "3",
            }
        );
    }

    #[test]
    fn test_stats_line_bare() {
        let line = "Difficulty: 11 | 7/12 | 4 | 2";
        assert!(matches!(
            classify_adversary_line(line, Section::Stats),
            Line::Stats { hp: "4", stress: "2", .. }
        ));
    }

    #[test]
    fn test_stats_line_beats_feature_rules() {
        let line = "Difficulty: 11 | 7/12 | 4 | 2";
        assert!(matches!(
            classify_adversary_line(line, Section::Features),
            Line::Stats { .. }
        ));
    }

    #[test]
    fn test_attack_line_with_colon_range() {
        let line = "ATK: +3 | Claws: Melee | 1d12+2 phy";
        assert_eq!(
            classify_adversary_line(line, Section::Stats),
            Line::Attack {
                atk: "+3",
                weapon: "Claws".to_string(),
                range: "Melee".to_string(),
                damage_dice: "1d12+2",
                damage_type: Some("phy"),
            }
        );
    }

    #[test]
    fn test_attack_line_with_trailing_range() {
        let line = "ATK: -1 | Rusty Longbow Far | 2d6 physical";
        match classify_adversary_line(line, Section::Stats) {
            Line::Attack {
                atk,
                weapon,
                range,
                damage_type,
                ..
            } => {
                assert_eq!(atk, "-1");
                assert_eq!(weapon, "Rusty Longbow");
                assert_eq!(range, "Far");
                assert_eq!(damage_type, Some("physical"));
            }
            other => panic!("expected attack line, got {:?}", other),
        }
    }

    #[test]
    fn test_feature_markers() {
        let paren = classify_adversary_line("Bite (Action): Deal 1d8 damage.", Section::Features);
        assert_eq!(
            paren,
            Line::FeatureStart(Feature::new("Bite", FeatureType::Action, "Deal 1d8 damage."))
        );

        let dash = classify_adversary_line("Thick Hide – passive: Resists cold.", Section::Features);
        assert_eq!(
            dash,
            Line::FeatureStart(Feature::new("Thick Hide", FeatureType::Passive, "Resists cold."))
        );
    }

    #[test]
    fn test_feature_marker_ignored_outside_features() {
        let line = "Bite (Action): Deal 1d8 damage.";
        assert_eq!(
            classify_adversary_line(line, Section::Stats),
            Line::Field {
                key: "bite_action".to_string(),
                value: "Deal 1d8 damage."
            }
        );
    }

    #[test]
    fn test_continuation_and_unrecognised() {
        assert_eq!(
            classify_adversary_line("and then it flees", Section::Features),
            Line::Continuation("and then it flees")
        );
        assert_eq!(
            classify_adversary_line("just some words", Section::Stats),
            Line::Unrecognised
        );
    }

    #[test]
    fn test_environment_rules() {
        assert_eq!(
            classify_environment_line("Potential Adversaries: Bandits", Section::Stats),
            Line::Field {
                key: "potential_adversaries".to_string(),
                value: "Bandits"
            }
        );
        assert_eq!(
            classify_environment_line("Fog Bank: Visibility drops.", Section::Features),
            Line::FeatureStart(Feature::new("Fog Bank", FeatureType::Action, "Visibility drops."))
        );
        assert_eq!(
            classify_environment_line("Fog Bank: Visibility drops.", Section::Stats),
            Line::Unrecognised
        );
    }

    #[test]
    fn test_description_lines() {
        assert!(is_description_line("A towering beast of the northern woods."));
        assert!(!is_description_line("Motives & Tactics: Eat, sleep"));
        assert!(!is_description_line("impulses: lure travellers"));
        assert!(!is_description_line("Difficulty: 12 | 5/9 | 3 | 1"));
        assert!(!is_description_line("FEATURES"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Motives & Tactics"), "motives_tactics");
        assert_eq!(normalize_key("Damage Type"), "damage_type");
        assert_eq!(normalize_key("  "), "");
    }
}
