//! Idea browsing state: challenge filter, ordering and local comments.

use chrono::{DateTime, Utc};
use ideas::listing::{filter_by_challenge, sort_ideas, SortOrder};
use ideas::model::Idea;
use tracing::debug;

use crate::api::{ApiError, PlatformApi};

#[derive(Debug, Clone, Default)]
pub struct IdeaListing {
    ideas: Vec<Idea>,
    pub selected_challenge: Option<String>,
    pub sort: SortOrder,
}

impl IdeaListing {
    pub fn new(ideas: Vec<Idea>) -> Self {
        Self {
            ideas,
            ..Default::default()
        }
    }

    /// Replace the held ideas with a fresh fetch. Selection and order are kept.
    pub async fn load(&mut self, api: &dyn PlatformApi) -> Result<(), ApiError> {
        self.ideas = api.list_ideas().await?;
        debug!(count = self.ideas.len(), "ideas loaded");
        Ok(())
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn select_challenge(&mut self, challenge: Option<String>) {
        self.selected_challenge = challenge;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Distinct challenges in first-seen order, for the filter control.
    pub fn challenges(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for idea in &self.ideas {
            let c = &idea.content.humanity_challenge;
            if !c.is_empty() && !out.contains(c) {
                out.push(c.clone());
            }
        }
        out
    }

    /// Ideas to show: filtered by the selected challenge, then ordered.
    pub fn visible(&self) -> Vec<Idea> {
        let mut shown = match &self.selected_challenge {
            Some(challenge) => filter_by_challenge(&self.ideas, challenge),
            None => self.ideas.clone(),
        };
        sort_ideas(&mut shown, self.sort);
        shown
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub upvotes: u32,
    pub downvotes: u32,
}

/// One opened idea plus its comment thread. Comments live only here.
#[derive(Debug, Clone)]
pub struct IdeaDetailState {
    pub idea: Idea,
    pub comments: Vec<Comment>,
}

impl IdeaDetailState {
    pub fn new(idea: Idea) -> Self {
        Self {
            idea,
            comments: Vec::new(),
        }
    }

    /// Append a comment; blank content is ignored. Returns whether one was added.
    pub fn add_comment(&mut self, author: &str, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }
        self.comments.push(Comment {
            author: author.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            upvotes: 0,
            downvotes: 0,
        });
        true
    }

    pub fn upvote_comment(&mut self, index: usize) -> bool {
        self.comments
            .get_mut(index)
            .map(|c| c.upvotes += 1)
            .is_some()
    }

    pub fn downvote_comment(&mut self, index: usize) -> bool {
        self.comments
            .get_mut(index)
            .map(|c| c.downvotes += 1)
            .is_some()
    }

    /// Record an upvote on the server, then mirror it locally.
    pub async fn upvote(&mut self, api: &dyn PlatformApi) -> Result<(), ApiError> {
        api.upvote(self.idea.id).await?;
        self.idea.upvotes += 1;
        Ok(())
    }

    pub async fn downvote(&mut self, api: &dyn PlatformApi) -> Result<(), ApiError> {
        api.downvote(self.idea.id).await?;
        self.idea.downvotes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ideas::model::IdeaContent;
    use uuid::Uuid;

    fn idea(title: &str, challenge: &str, minute: u32) -> Idea {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap();
        Idea {
            id: Uuid::new_v4(),
            content: IdeaContent {
                title: title.into(),
                humanity_challenge: challenge.into(),
                ..Default::default()
            },
            upvotes: 0,
            downvotes: 0,
            views: 0,
            created_at: at,
            updated_at: at,
        }
    }

    fn titles(ideas: &[Idea]) -> Vec<&str> {
        ideas.iter().map(|i| i.content.title.as_str()).collect()
    }

    #[test]
    fn filters_then_sorts() {
        let mut listing = IdeaListing::new(vec![
            idea("a", "Climate", 1),
            idea("b", "Health", 2),
            idea("c", "Climate", 3),
            idea("d", "climate", 4),
        ]);
        assert_eq!(titles(&listing.visible()), ["d", "c", "b", "a"]);

        listing.select_challenge(Some("Climate".into()));
        assert_eq!(titles(&listing.visible()), ["c", "a"]);

        listing.set_sort(SortOrder::Oldest);
        assert_eq!(titles(&listing.visible()), ["a", "c"]);
        assert_eq!(listing.challenges(), ["Climate", "Health", "climate"]);
    }

    #[test]
    fn same_timestamp_keeps_fetch_order() {
        let listing = IdeaListing::new(vec![idea("x", "C", 5), idea("y", "C", 5), idea("z", "C", 5)]);
        assert_eq!(titles(&listing.visible()), ["x", "y", "z"]);
    }

    #[test]
    fn comments_are_local() {
        let mut detail = IdeaDetailState::new(idea("a", "C", 0));
        assert!(!detail.add_comment("ada", "   "));
        assert!(detail.add_comment("ada", " Love it "));
        assert!(detail.upvote_comment(0));
        assert!(detail.upvote_comment(0));
        assert!(detail.downvote_comment(0));
        assert!(!detail.upvote_comment(7));

        let c = &detail.comments[0];
        assert_eq!(c.content, "Love it");
        assert_eq!((c.upvotes, c.downvotes), (2, 1));
    }
}
