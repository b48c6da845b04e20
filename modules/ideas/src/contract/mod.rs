pub mod client;
pub mod error;
pub mod form;
pub mod listing;
pub mod model;

pub use client::IdeasApi;
pub use error::IdeasError;
pub use form::IdeaForm;
pub use listing::{filter_by_challenge, sort_ideas, IdeaFilter, SortOrder};
pub use model::{Counter, Idea, IdeaContent, IdeaPatch, IdeaStatus, NewIdea, REQUIRED_TEXT_FIELDS};
