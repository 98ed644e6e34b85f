use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::Statblock;
use crate::domain::value_objects::{Category, StatblockQuery, Tier};
use crate::domain::DomainError;

/// Catalogue search body. Blank strings and a zero tier mean "any".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequestDto {
    #[serde(default)]
    pub category: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub tier: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl TryFrom<SearchRequestDto> for StatblockQuery {
    type Error = DomainError;

    fn try_from(request: SearchRequestDto) -> Result<Self, Self::Error> {
        let mut query = StatblockQuery::new();

        if let Some(category) = non_blank(request.category) {
            query = query.with_category(category.parse::<Category>()?);
        }
        if let Some(tier) = request.tier.as_ref().and_then(tier_filter).transpose()? {
            query = query.with_tier(tier);
        }
        if let Some(kind) = non_blank(request.kind) {
            query = query.with_kind(kind);
        }
        if let Some(text) = non_blank(request.text) {
            query = query.with_text(text);
        }

        Ok(query)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `None` when the tier does not filter (null, blank, zero)
fn tier_filter(value: &Value) -> Option<Result<Tier, DomainError>> {
    let number = match value {
        Value::Null => return None,
        Value::Number(n) => match n.as_i64() {
            Some(number) => number,
            None => return Some(Err(DomainError::UnparseableTier(n.to_string()))),
        },
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(number) => number,
            Err(_) => return Some(Err(DomainError::UnparseableTier(s.clone()))),
        },
        other => return Some(Err(DomainError::UnparseableTier(other.to_string()))),
    };

    if number == 0 {
        None
    } else {
        Some(Tier::try_from(number))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatblockSummaryDto {
    pub name: String,
    pub tier: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub description: String,
}

impl From<&Statblock> for StatblockSummaryDto {
    fn from(stat: &Statblock) -> Self {
        Self {
            name: stat.name().to_string(),
            tier: stat.tier().value(),
            kind: stat.kind().to_string(),
            category: stat.category().as_str().to_string(),
            description: stat.description().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponseDto {
    pub results: Vec<StatblockSummaryDto>,
}

#[derive(Debug, Deserialize)]
pub struct TypesQueryDto {
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct TypesResponseDto {
    pub types: Vec<&'static str>,
}

/// Retier body. `stat` is read leniently, like a saved record.
#[derive(Debug, Deserialize)]
pub struct RetierRequestDto {
    pub stat: Value,
    /// Number or numeric string
    #[serde(default)]
    pub tier: Value,
}

impl RetierRequestDto {
    pub fn target_tier(&self) -> Result<Tier, DomainError> {
        tier_filter(&self.tier)
            .unwrap_or_else(|| Err(DomainError::UnparseableTier(self.tier.to_string())))
    }
}

#[derive(Debug, Serialize)]
pub struct RetierResponseDto {
    pub changed: bool,
    pub stat: Statblock,
}

#[derive(Debug, Serialize)]
pub struct SaveResponseDto {
    pub saved: bool,
}
