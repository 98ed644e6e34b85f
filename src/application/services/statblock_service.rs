//! Statblock Service - Application service for the statblock catalogue
//!
//! Searching, lookup and saving go through the repository port. Parsing
//! and tier previews are pure domain operations and never persist.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::StatblockRepositoryPort;
use crate::domain::entities::Statblock;
use crate::domain::services::{normalize, retier};
use crate::domain::value_objects::{Category, StatblockQuery, Tier};

/// A statblock after a tier change was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retiered {
    /// False when the input came back as-is (same tier or not an adversary)
    pub changed: bool,
    pub stat: Statblock,
}

/// Statblock service trait defining the catalogue use cases
#[async_trait]
pub trait StatblockService: Send + Sync {
    /// Type vocabulary of a category; unknown categories have none
    fn list_types(&self, category: &str) -> Vec<&'static str>;

    /// All stored statblocks matching the query, in storage order
    async fn search(&self, query: &StatblockQuery) -> Result<Vec<Statblock>>;

    /// Look up a statblock by name (trimmed, case-insensitive)
    async fn get(&self, name: &str) -> Result<Option<Statblock>>;

    /// Store a statblock, replacing any record with the same name
    async fn save(&self, stat: Statblock) -> Result<()>;

    /// Extract a statblock from pasted JSON or text
    fn parse(&self, raw: &str) -> Option<Statblock>;

    /// Rescale a stored statblock without saving the result
    async fn preview_retier(&self, name: &str, tier: Tier) -> Result<Option<Retiered>>;

    /// Rescale a caller-supplied statblock
    fn retier(&self, stat: Statblock, tier: Tier) -> Retiered;
}

/// Default implementation of StatblockService over a repository port
pub struct StatblockServiceImpl {
    repository: Arc<dyn StatblockRepositoryPort>,
    /// Serializes load-modify-store cycles
    write_lock: Mutex<()>,
}

impl StatblockServiceImpl {
    pub fn new(repository: Arc<dyn StatblockRepositoryPort>) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    fn validate_save(stat: &Statblock) -> Result<()> {
        if stat.name().trim().is_empty() {
            anyhow::bail!("Name is required");
        }
        Ok(())
    }
}

#[async_trait]
impl StatblockService for StatblockServiceImpl {
    fn list_types(&self, category: &str) -> Vec<&'static str> {
        category
            .parse::<Category>()
            .map(|category| category.types().to_vec())
            .unwrap_or_default()
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &StatblockQuery) -> Result<Vec<Statblock>> {
        let all = self
            .repository
            .load_all()
            .await
            .context("Failed to load statblocks for search")?;

        let results: Vec<Statblock> = all.into_iter().filter(|stat| query.matches(stat)).collect();
        debug!(count = results.len(), "Search complete");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> Result<Option<Statblock>> {
        debug!("Fetching statblock");
        self.repository
            .find_by_name(name)
            .await
            .context("Failed to look up statblock")
    }

    #[instrument(skip(self, stat), fields(name = %stat.name()))]
    async fn save(&self, mut stat: Statblock) -> Result<()> {
        Self::validate_save(&stat)?;
        let name = stat.name().trim().to_string();
        stat.base_mut().name = name.clone();

        let _guard = self.write_lock.lock().await;

        let mut all = self
            .repository
            .load_all()
            .await
            .context("Failed to load statblocks before saving")?;

        let before = all.len();
        all.retain(|existing| !existing.is_named(&name));
        if all.len() < before {
            debug!("Overwriting existing statblock");
        }
        all.push(stat);

        self.repository
            .save_all(&all)
            .await
            .context("Failed to store statblocks")?;

        info!(total = all.len(), "Saved statblock: {}", name);
        Ok(())
    }

    fn parse(&self, raw: &str) -> Option<Statblock> {
        let parsed = normalize(raw);
        match &parsed {
            Some(stat) => debug!(name = %stat.name(), category = %stat.category(), "Parsed statblock"),
            None => debug!("Nothing extracted from input"),
        }
        parsed
    }

    #[instrument(skip(self))]
    async fn preview_retier(&self, name: &str, tier: Tier) -> Result<Option<Retiered>> {
        let Some(stat) = self.get(name).await? else {
            return Ok(None);
        };
        Ok(Some(self.retier(stat, tier)))
    }

    fn retier(&self, stat: Statblock, tier: Tier) -> Retiered {
        let outcome = retier(&stat, tier);
        Retiered {
            changed: outcome.is_changed(),
            stat: outcome.or_original(stat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::RepositoryError;
    use crate::domain::entities::{Adversary, Environment, StatblockBase};

    #[derive(Default)]
    struct InMemoryStatblockRepository {
        statblocks: Mutex<Vec<Statblock>>,
    }

    #[async_trait]
    impl StatblockRepositoryPort for InMemoryStatblockRepository {
        async fn load_all(&self) -> Result<Vec<Statblock>, RepositoryError> {
            Ok(self.statblocks.lock().await.clone())
        }

        async fn save_all(&self, statblocks: &[Statblock]) -> Result<(), RepositoryError> {
            *self.statblocks.lock().await = statblocks.to_vec();
            Ok(())
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl StatblockRepositoryPort for FailingRepository {
        async fn load_all(&self) -> Result<Vec<Statblock>, RepositoryError> {
            Err(RepositoryError::Io("disk unavailable".to_string()))
        }

        async fn save_all(&self, _statblocks: &[Statblock]) -> Result<(), RepositoryError> {
            Err(RepositoryError::Io("disk unavailable".to_string()))
        }
    }

    fn tier(value: u8) -> Tier {
        Tier::new(value).unwrap()
    }

    fn adversary(name: &str, at: u8, kind: &str) -> Statblock {
        let mut adversary = Adversary::new(StatblockBase::new(name, tier(at), kind));
        adversary.hp = "6".to_string();
        adversary.thresholds = "7/12".to_string();
        adversary.weapon = "Claws".to_string();
        Statblock::Adversary(adversary)
    }

    fn environment(name: &str, at: u8) -> Statblock {
        let mut environment = Environment::new(StatblockBase::new(name, tier(at), "Exploration"));
        environment.impulses = vec!["Lure travellers off the path".to_string()];
        Statblock::Environment(environment)
    }

    fn service() -> (Arc<InMemoryStatblockRepository>, StatblockServiceImpl) {
        let repository = Arc::new(InMemoryStatblockRepository::default());
        let service = StatblockServiceImpl::new(repository.clone());
        (repository, service)
    }

    #[test]
    fn test_list_types() {
        let (_, service) = service();
        assert_eq!(service.list_types("Environments"), vec!["Exploration", "Traversal", "Social", "Event"]);
        assert_eq!(service.list_types("adversary").len(), 10);
        assert!(service.list_types("Spells").is_empty());
        assert!(service.list_types("").is_empty());
    }

    #[tokio::test]
    async fn test_save_appends_and_overwrites_by_name() {
        let (repository, service) = service();
        service.save(adversary("Wolf", 1, "Skulk")).await.unwrap();
        service.save(environment("Dark Forest", 1)).await.unwrap();
        service.save(adversary("  WOLF ", 2, "Horde")).await.unwrap();

        let stored = repository.statblocks.lock().await.clone();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name(), "Dark Forest");
        assert_eq!(stored[1].name(), "WOLF");
        assert_eq!(stored[1].kind(), "Horde");
    }

    #[tokio::test]
    async fn test_save_requires_name() {
        let (repository, service) = service();
        let err = service.save(adversary("   ", 1, "Solo")).await.unwrap_err();
        assert!(err.to_string().contains("Name is required"));
        assert!(repository.statblocks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_is_case_insensitive() {
        let (_, service) = service();
        service.save(adversary("Cave Bear", 2, "Bruiser")).await.unwrap();

        let found = service.get("cave bear").await.unwrap();
        assert_eq!(found.map(|s| s.name().to_string()), Some("Cave Bear".to_string()));
        assert!(service.get("Bear").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_filters() {
        let (_, service) = service();
        service.save(adversary("Wolf", 1, "Skulk")).await.unwrap();
        service.save(adversary("Dire Wolf", 2, "Bruiser")).await.unwrap();
        service.save(environment("Dark Forest", 1)).await.unwrap();

        let all = service.search(&StatblockQuery::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let wolves = service
            .search(&StatblockQuery::new().with_text("wolf"))
            .await
            .unwrap();
        assert_eq!(wolves.len(), 2);

        let tier_one = service
            .search(&StatblockQuery::new().with_category(Category::Adversaries).with_tier(tier(1)))
            .await
            .unwrap();
        assert_eq!(tier_one.len(), 1);
        assert_eq!(tier_one[0].name(), "Wolf");

        let by_impulse = service
            .search(&StatblockQuery::new().with_text("TRAVELLERS"))
            .await
            .unwrap();
        assert_eq!(by_impulse.len(), 1);
        assert_eq!(by_impulse[0].category(), Category::Environments);
    }

    #[tokio::test]
    async fn test_storage_failures_carry_context() {
        let service = StatblockServiceImpl::new(Arc::new(FailingRepository));
        let err = service.search(&StatblockQuery::new()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to load statblocks"));
        assert!(service.save(adversary("Wolf", 1, "Skulk")).await.is_err());
    }

    #[test]
    fn test_parse_delegates_to_ingestion() {
        let (_, service) = service();
        let stat = service.parse("Goblin\nTier 1 Minion").unwrap();
        assert_eq!(stat.kind(), "Minion");
        assert!(service.parse("   ").is_none());
    }

    #[tokio::test]
    async fn test_preview_retier_does_not_persist() {
        let (repository, service) = service();
        service.save(adversary("Wolf", 1, "Skulk")).await.unwrap();

        let preview = service.preview_retier("wolf", tier(2)).await.unwrap().unwrap();
        assert!(preview.changed);
        assert_eq!(preview.stat.name(), "Large Wolf");
        assert_eq!(repository.statblocks.lock().await[0].name(), "Wolf");

        assert!(service.preview_retier("Ghost", tier(2)).await.unwrap().is_none());
    }

    #[test]
    fn test_retier_unchanged_returns_input() {
        let (_, service) = service();
        let forest = environment("Dark Forest", 1);

        let same = service.retier(forest.clone(), tier(3));
        assert!(!same.changed);
        assert_eq!(same.stat, forest);

        let wolf = adversary("Wolf", 2, "Skulk");
        let unchanged = service.retier(wolf.clone(), tier(2));
        assert_eq!(unchanged, Retiered { changed: false, stat: wolf });
    }
}
