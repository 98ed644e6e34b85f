//! Catalogue search criteria

use crate::domain::entities::Statblock;

use super::{Category, Tier};

/// Filter over a statblock catalogue. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatblockQuery {
    pub category: Option<Category>,
    pub tier: Option<Tier>,
    pub kind: Option<String>,
    /// Case-insensitive substring searched across descriptive fields
    pub text: Option<String>,
}

impl StatblockQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, stat: &Statblock) -> bool {
        if self.category.is_some_and(|category| category != stat.category()) {
            return false;
        }
        if self.tier.is_some_and(|tier| tier != stat.tier()) {
            return false;
        }
        if let Some(kind) = self.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            if stat.kind() != kind {
                return false;
            }
        }
        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => haystack(stat).contains(&text.to_lowercase()),
            None => true,
        }
    }
}

fn haystack(stat: &Statblock) -> String {
    let mut parts: Vec<&str> = vec![stat.name(), stat.description(), stat.kind()];

    match stat {
        Statblock::Adversary(adversary) => {
            parts.extend(adversary.motives_tactics.iter().map(String::as_str));
            parts.push(&adversary.weapon);
            parts.push(&adversary.damage_type);
        }
        Statblock::Environment(environment) => {
            parts.extend(environment.impulses.iter().map(String::as_str));
            parts.push(&environment.potential_adversaries);
        }
    }

    for feature in stat.features() {
        parts.push(&feature.name);
        parts.push(&feature.description);
    }

    parts.join(" ").to_lowercase()
}
