use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::IdeasError,
    listing::{IdeaFilter, SortOrder},
    model::{Idea, IdeaPatch, NewIdea},
};

/// Public API trait for the ideas module that other modules can use
#[async_trait]
pub trait IdeasApi: Send + Sync {
    async fn get_idea(&self, id: Uuid) -> Result<Idea, IdeasError>;

    /// List ideas matching `filter`; `limit` falls back to the configured page size.
    async fn list_ideas(
        &self,
        filter: IdeaFilter,
        sort: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Idea>, IdeasError>;

    async fn create_idea(&self, new_idea: NewIdea) -> Result<Idea, IdeasError>;

    async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<Idea, IdeasError>;

    async fn delete_idea(&self, id: Uuid) -> Result<(), IdeasError>;

    async fn upvote(&self, id: Uuid) -> Result<(), IdeasError>;

    async fn downvote(&self, id: Uuid) -> Result<(), IdeasError>;
}
