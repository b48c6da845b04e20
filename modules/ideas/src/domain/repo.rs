use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::listing::{IdeaFilter, SortOrder};
use crate::contract::model::{Counter, Idea};

/// Storage port for ideas. Adapters live in `infra::storage`.
#[async_trait]
pub trait IdeasRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Idea>>;

    /// One page of matching ideas. `sort` orders the whole result set before
    /// paging; without it storage order is kept.
    async fn list(
        &self,
        filter: &IdeaFilter,
        sort: Option<SortOrder>,
        limit: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<Idea>>;

    async fn insert(&self, idea: Idea) -> anyhow::Result<Idea>;

    /// Replace a stored idea. Returns `None` when it does not exist.
    async fn update(&self, idea: Idea) -> anyhow::Result<Option<Idea>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Add one to `counter`. Returns `false` when the idea does not exist.
    async fn increment_counter(&self, id: Uuid, counter: Counter) -> anyhow::Result<bool>;
}
