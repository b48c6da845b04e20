use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::IdeasApi,
    error::IdeasError,
    listing::{IdeaFilter, SortOrder},
    model::{Idea, IdeaPatch, NewIdea},
};
use crate::domain::service::Service;

/// Local implementation of the IdeasApi trait that delegates to the domain service
pub struct IdeasLocalClient {
    service: Arc<Service>,
}

impl IdeasLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl IdeasApi for IdeasLocalClient {
    async fn get_idea(&self, id: Uuid) -> Result<Idea, IdeasError> {
        self.service.get_idea(id).await.map_err(Into::into)
    }

    async fn list_ideas(
        &self,
        filter: IdeaFilter,
        sort: Option<SortOrder>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Idea>, IdeasError> {
        self.service
            .list_ideas(filter, sort, limit, offset)
            .await
            .map_err(Into::into)
    }

    async fn create_idea(&self, new_idea: NewIdea) -> Result<Idea, IdeasError> {
        self.service.create_idea(new_idea).await.map_err(Into::into)
    }

    async fn update_idea(&self, id: Uuid, patch: IdeaPatch) -> Result<Idea, IdeasError> {
        self.service
            .update_idea(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_idea(&self, id: Uuid) -> Result<(), IdeasError> {
        self.service.delete_idea(id).await.map_err(Into::into)
    }

    async fn upvote(&self, id: Uuid) -> Result<(), IdeasError> {
        self.service.upvote(id).await.map_err(Into::into)
    }

    async fn downvote(&self, id: Uuid) -> Result<(), IdeasError> {
        self.service.downvote(id).await.map_err(Into::into)
    }
}
