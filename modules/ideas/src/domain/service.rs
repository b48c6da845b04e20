use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::listing::{IdeaFilter, SortOrder};
use crate::contract::model::{Counter, Idea, IdeaPatch, NewIdea};
use crate::domain::error::DomainError;
use crate::domain::repo::IdeasRepository;

/// Domain service with the business rules for ideas.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn IdeasRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn IdeasRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// List one page of ideas. `sort` applies before paging; without it the
    /// repository order is kept.
    #[instrument(name = "ideas.service.list_ideas", skip(self, filter))]
    pub async fn list_ideas(
        &self,
        filter: IdeaFilter,
        sort: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Idea>, DomainError> {
        let limit = limit.unwrap_or(self.config.default_page_size);
        if limit == 0 || limit > self.config.max_page_size {
            return Err(DomainError::invalid_limit(limit, self.config.max_page_size));
        }
        let offset = offset.unwrap_or(0);

        let ideas = self
            .repo
            .list(&filter, sort, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Listed {} ideas", ideas.len());
        Ok(ideas)
    }

    /// Fetch an idea and count the view.
    #[instrument(name = "ideas.service.get_idea", skip(self), fields(idea_id = %id))]
    pub async fn get_idea(&self, id: Uuid) -> Result<Idea, DomainError> {
        let mut idea = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::idea_not_found(id))?;

        let counted = self
            .repo
            .increment_counter(id, Counter::Views)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if counted {
            idea.views += 1;
        }
        Ok(idea)
    }

    #[instrument(
        name = "ideas.service.create_idea",
        skip(self, new_idea),
        fields(title = %new_idea.title)
    )]
    pub async fn create_idea(&self, new_idea: NewIdea) -> Result<Idea, DomainError> {
        info!("Creating new idea");

        let missing = new_idea.missing_required();
        if !missing.is_empty() {
            return Err(DomainError::missing_fields(missing));
        }
        if new_idea.market_estimate < 0 {
            return Err(DomainError::validation(
                "market_estimate",
                "must not be negative",
            ));
        }

        let now = Utc::now();
        let idea = Idea {
            id: Uuid::new_v4(),
            content: new_idea,
            upvotes: 0,
            downvotes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let idea = self
            .repo
            .insert(idea)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Successfully created idea with id={}", idea.id);
        Ok(idea)
    }

    #[instrument(name = "ideas.service.update_idea", skip(self, patch), fields(idea_id = %id))]
    pub async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<Idea, DomainError> {
        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::idea_not_found(id))?;

        if patch.is_empty() {
            debug!("Empty patch, returning current idea");
            return Ok(current);
        }

        patch.apply(&mut current.content);
        current.updated_at = Utc::now();

        let updated = self
            .repo
            .update(current)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::idea_not_found(id))?;

        info!("Successfully updated idea");
        Ok(updated)
    }

    #[instrument(name = "ideas.service.delete_idea", skip(self), fields(idea_id = %id))]
    pub async fn delete_idea(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::idea_not_found(id));
        }
        info!("Successfully deleted idea");
        Ok(())
    }

    #[instrument(name = "ideas.service.upvote", skip(self), fields(idea_id = %id))]
    pub async fn upvote(&self, id: Uuid) -> Result<(), DomainError> {
        self.bump(id, Counter::Upvotes).await
    }

    #[instrument(name = "ideas.service.downvote", skip(self), fields(idea_id = %id))]
    pub async fn downvote(&self, id: Uuid) -> Result<(), DomainError> {
        self.bump(id, Counter::Downvotes).await
    }

    async fn bump(&self, id: Uuid, counter: Counter) -> Result<(), DomainError> {
        let found = self
            .repo
            .increment_counter(id, counter)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !found {
            return Err(DomainError::idea_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{IdeaContent, IdeaStatus};
    use crate::infra::storage::memory::InMemoryIdeasRepository;

    fn service() -> Service {
        Service::new(
            Arc::new(InMemoryIdeasRepository::new()),
            ServiceConfig::default(),
        )
    }

    fn complete(title: &str) -> NewIdea {
        IdeaContent {
            title: title.into(),
            humanity_challenge: "Climate Change".into(),
            category: "Energy".into(),
            sub_category: "Solar".into(),
            geographic_focus: "Global".into(),
            time_horizon: "5 years".into(),
            problem_statement: "Energy poverty".into(),
            solution: "Community solar".into(),
            why_now: "Panel prices fell".into(),
            market_estimate: 1_000_000,
            business_model: "Pay as you go".into(),
            competition: "Diesel generators".into(),
            type_of_author: "Individual".into(),
            author: "Ada".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_rejects_missing_required_fields() {
        let svc = service();
        let mut idea = complete("x");
        idea.author = " ".into();
        idea.why_now.clear();

        match svc.create_idea(idea).await {
            Err(DomainError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["why_now", "author"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_counts_views() {
        let svc = service();
        let created = svc.create_idea(complete("Solar")).await.unwrap();

        assert_eq!(svc.get_idea(created.id).await.unwrap().views, 1);
        assert_eq!(svc.get_idea(created.id).await.unwrap().views, 2);
    }

    #[tokio::test]
    async fn missing_idea_is_not_found_everywhere() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.get_idea(id).await, Err(DomainError::IdeaNotFound { .. })));
        assert!(matches!(
            svc.update_idea(id, IdeaPatch::default()).await,
            Err(DomainError::IdeaNotFound { .. })
        ));
        assert!(matches!(svc.delete_idea(id).await, Err(DomainError::IdeaNotFound { .. })));
        assert!(matches!(svc.upvote(id).await, Err(DomainError::IdeaNotFound { .. })));
        assert!(matches!(svc.downvote(id).await, Err(DomainError::IdeaNotFound { .. })));
    }

    #[tokio::test]
    async fn empty_patch_returns_current_unchanged() {
        let svc = service();
        let created = svc.create_idea(complete("Solar")).await.unwrap();

        let same = svc.update_idea(created.id, IdeaPatch::default()).await.unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn patch_changes_only_present_fields() {
        let svc = service();
        let created = svc.create_idea(complete("Solar")).await.unwrap();

        let updated = svc
            .update_idea(
                created.id,
                IdeaPatch {
                    status: Some(IdeaStatus::Pilot),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.content.status, IdeaStatus::Pilot);
        assert_eq!(updated.content.title, "Solar");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn votes_accumulate() {
        let svc = service();
        let created = svc.create_idea(complete("Solar")).await.unwrap();

        svc.upvote(created.id).await.unwrap();
        svc.upvote(created.id).await.unwrap();
        svc.downvote(created.id).await.unwrap();

        let idea = svc.get_idea(created.id).await.unwrap();
        assert_eq!((idea.upvotes, idea.downvotes), (2, 1));
    }

    #[tokio::test]
    async fn list_validates_limit_and_sorts_on_request() {
        let svc = service();
        for t in ["a", "b", "c"] {
            svc.create_idea(complete(t)).await.unwrap();
        }

        assert!(matches!(
            svc.list_ideas(IdeaFilter::default(), None, Some(0), None).await,
            Err(DomainError::InvalidLimit { .. })
        ));
        assert!(matches!(
            svc.list_ideas(IdeaFilter::default(), None, Some(101), None).await,
            Err(DomainError::InvalidLimit { .. })
        ));

        let page = svc
            .list_ideas(IdeaFilter::default(), None, Some(2), Some(1))
            .await
            .unwrap();
        let titles: Vec<_> = page.iter().map(|i| i.content.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);

        let newest = svc
            .list_ideas(IdeaFilter::default(), Some(SortOrder::Newest), None, None)
            .await
            .unwrap();
        assert!(newest
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn delete_removes_idea() {
        let svc = service();
        let created = svc.create_idea(complete("Solar")).await.unwrap();
        svc.delete_idea(created.id).await.unwrap();
        assert!(matches!(
            svc.get_idea(created.id).await,
            Err(DomainError::IdeaNotFound { .. })
        ));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn create_and_delete_are_logged() {
        let svc = service();
        let idea = svc.create_idea(complete("Logged")).await.unwrap();
        svc.delete_idea(idea.id).await.unwrap();

        assert!(logs_contain("Creating new idea"));
        assert!(logs_contain(&format!("Successfully created idea with id={}", idea.id)));
        assert!(logs_contain("Successfully deleted idea"));
    }
}
