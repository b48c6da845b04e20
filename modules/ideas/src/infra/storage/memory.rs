use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::listing::{sort_ideas, IdeaFilter, SortOrder};
use crate::contract::model::{Counter, Idea};
use crate::domain::repo::IdeasRepository;

/// Process-local store kept in insertion order.
#[derive(Default)]
pub struct InMemoryIdeasRepository {
    ideas: RwLock<Vec<Idea>>,
}

impl InMemoryIdeasRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ideas(ideas: Vec<Idea>) -> Self {
        Self {
            ideas: RwLock::new(ideas),
        }
    }

    pub fn len(&self) -> usize {
        self.ideas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.read().is_empty()
    }
}

#[async_trait]
impl IdeasRepository for InMemoryIdeasRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Idea>> {
        Ok(self.ideas.read().iter().find(|i| i.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &IdeaFilter,
        sort: Option<SortOrder>,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<Idea>> {
        let mut matching: Vec<Idea> = self
            .ideas
            .read()
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        if let Some(order) = sort {
            sort_ideas(&mut matching, order);
        }
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn insert(&self, idea: Idea) -> anyhow::Result<Idea> {
        let mut ideas = self.ideas.write();
        if ideas.iter().any(|i| i.id == idea.id) {
            anyhow::bail!("idea {} already exists", idea.id);
        }
        ideas.push(idea.clone());
        Ok(idea)
    }

    async fn update(&self, idea: Idea) -> anyhow::Result<Option<Idea>> {
        let mut ideas = self.ideas.write();
        Ok(ideas.iter_mut().find(|i| i.id == idea.id).map(|slot| {
            *slot = idea.clone();
            idea
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut ideas = self.ideas.write();
        let before = ideas.len();
        ideas.retain(|i| i.id != id);
        Ok(ideas.len() != before)
    }

    async fn increment_counter(&self, id: Uuid, counter: Counter) -> anyhow::Result<bool> {
        let mut ideas = self.ideas.write();
        let Some(idea) = ideas.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        match counter {
            Counter::Upvotes => idea.upvotes += 1,
            Counter::Downvotes => idea.downvotes += 1,
            Counter::Views => idea.views += 1,
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::IdeaContent;
    use chrono::Utc;

    fn idea(title: &str, category: &str) -> Idea {
        let now = Utc::now();
        Idea {
            id: Uuid::new_v4(),
            content: IdeaContent {
                title: title.into(),
                category: category.into(),
                ..Default::default()
            },
            upvotes: 0,
            downvotes: 0,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn list_filters_then_pages_in_insertion_order() {
        let repo = InMemoryIdeasRepository::with_ideas(vec![
            idea("a", "Energy"),
            idea("b", "Health"),
            idea("c", "Energy"),
            idea("d", "Energy"),
        ]);
        let filter = IdeaFilter {
            category: Some("Energy".into()),
            ..Default::default()
        };

        let page = repo.list(&filter, None, 2, 1).await.unwrap();
        let titles: Vec<_> = page.iter().map(|i| i.content.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn sort_applies_before_paging() {
        let base = Utc::now();
        let ideas = [("old", 1), ("mid", 2), ("newest", 3)]
            .into_iter()
            .map(|(title, minutes)| {
                let mut i = idea(title, "x");
                i.created_at = base + chrono::Duration::minutes(minutes);
                i
            })
            .collect();
        let repo = InMemoryIdeasRepository::with_ideas(ideas);
        let all = IdeaFilter::default();

        let first = repo.list(&all, Some(SortOrder::Newest), 1, 0).await.unwrap();
        assert_eq!(first[0].content.title, "newest");

        let page = repo.list(&all, Some(SortOrder::Oldest), 2, 1).await.unwrap();
        let titles: Vec<_> = page.iter().map(|i| i.content.title.as_str()).collect();
        assert_eq!(titles, vec!["mid", "newest"]);

        let unsorted = repo.list(&all, None, 1, 0).await.unwrap();
        assert_eq!(unsorted[0].content.title, "old");
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let repo = InMemoryIdeasRepository::new();
        let i = idea("a", "x");
        repo.insert(i.clone()).await.unwrap();
        assert!(repo.insert(i).await.is_err());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = InMemoryIdeasRepository::new();
        let i = idea("a", "x");
        assert!(repo.update(i.clone()).await.unwrap().is_none());
        assert!(!repo.delete(i.id).await.unwrap());
        assert!(!repo.increment_counter(i.id, Counter::Views).await.unwrap());
    }
}
