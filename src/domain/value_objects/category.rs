//! Statblock categories, their type vocabularies and feature kinds

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The two kinds of statblock a catalogue holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Environments,
    Adversaries,
}

const ENVIRONMENT_TYPES: &[&str] = &["Exploration", "Traversal", "Social", "Event"];

const ADVERSARY_TYPES: &[&str] = &[
    "Solo", "Bruiser", "Leader", "Horde", "Ranged", "Skulk", "Standard", "Support", "Minion",
    "Social",
];

impl Category {
    /// Declaration order; type scans walk categories in this order
    pub const ALL: [Category; 2] = [Category::Environments, Category::Adversaries];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Environments => "Environments",
            Category::Adversaries => "Adversaries",
        }
    }

    /// Allowed `type` values for this category
    pub fn types(self) -> &'static [&'static str] {
        match self {
            Category::Environments => ENVIRONMENT_TYPES,
            Category::Adversaries => ADVERSARY_TYPES,
        }
    }

    pub fn default_type(self) -> &'static str {
        self.types()[0]
    }

    /// Canonical spelling of `candidate` if it belongs to this category
    pub fn canonical_type(self, candidate: &str) -> Option<&'static str> {
        let candidate = candidate.trim();
        self.types()
            .iter()
            .copied()
            .find(|t| t.eq_ignore_ascii_case(candidate))
    }
}

impl std::str::FromStr for Category {
    type Err = DomainError;

    /// Accepts either plural or singular names, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adversaries" | "adversary" => Ok(Category::Adversaries),
            "environments" | "environment" => Ok(Category::Environments),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a statblock feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Action,
    Reaction,
    Passive,
    Evolution,
    Transformation,
}

impl FeatureType {
    pub const ALL: [FeatureType; 5] = [
        FeatureType::Action,
        FeatureType::Reaction,
        FeatureType::Passive,
        FeatureType::Evolution,
        FeatureType::Transformation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureType::Action => "Action",
            FeatureType::Reaction => "Reaction",
            FeatureType::Passive => "Passive",
            FeatureType::Evolution => "Evolution",
            FeatureType::Transformation => "Transformation",
        }
    }

    /// Case-insensitive lookup, e.g. "passive" -> Passive
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Adversaries".parse::<Category>().unwrap(), Category::Adversaries);
        assert_eq!("environment".parse::<Category>().unwrap(), Category::Environments);
        assert!("Monsters".parse::<Category>().is_err());
    }

    #[test]
    fn test_canonical_type() {
        assert_eq!(Category::Adversaries.canonical_type("bruiser"), Some("Bruiser"));
        assert_eq!(Category::Environments.canonical_type("Solo"), None);
        assert_eq!(Category::Environments.default_type(), "Exploration");
        assert_eq!(Category::Adversaries.default_type(), "Solo");
    }

    #[test]
    fn test_feature_type_parse() {
        assert_eq!(FeatureType::parse("reaction"), Some(FeatureType::Reaction));
        assert_eq!(FeatureType::parse("TRANSFORMATION"), Some(FeatureType::Transformation));
        assert_eq!(FeatureType::parse("Bonus"), None);
    }
}
