//! Filtering and ordering of idea lists.
//!
//! Used by the server for the in-memory backend and by the portal for the
//! browse page, so both agree on what "newest first" means.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Idea, IdeaStatus};

/// List filters. Equality filters are case-sensitive; `title`,
/// `problem_statement` and `solution` match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaFilter {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub status: Option<IdeaStatus>,
    pub humanity_challenge: Option<String>,
    pub title: Option<String>,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
}

impl IdeaFilter {
    pub fn is_empty(&self) -> bool {
        *self == IdeaFilter::default()
    }

    /// True when every present filter accepts the idea.
    pub fn matches(&self, idea: &Idea) -> bool {
        let c = &idea.content;
        eq(&self.category, &c.category)
            && eq(&self.sub_category, &c.sub_category)
            && eq(&self.humanity_challenge, &c.humanity_challenge)
            && self.status.map_or(true, |s| s == c.status)
            && contains(&self.title, &c.title)
            && contains(&self.problem_statement, &c.problem_statement)
            && contains(&self.solution, &c.solution)
    }
}

fn eq(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().map_or(true, |f| f == value)
}

fn contains(filter: &Option<String>, value: &str) -> bool {
    filter
        .as_deref()
        .map_or(true, |f| value.to_lowercase().contains(&f.to_lowercase()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Ideas whose `humanity_challenge` equals `challenge` exactly, in input order.
pub fn filter_by_challenge(ideas: &[Idea], challenge: &str) -> Vec<Idea> {
    ideas
        .iter()
        .filter(|i| i.content.humanity_challenge == challenge)
        .cloned()
        .collect()
}

/// Stable sort by `created_at`; equal timestamps keep their input order.
pub fn sort_ideas(ideas: &mut [Idea], order: SortOrder) {
    match order {
        SortOrder::Newest => ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => ideas.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::IdeaContent;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn idea(title: &str, challenge: &str, minute: u32) -> Idea {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap();
        Idea {
            id: Uuid::new_v4(),
            content: IdeaContent {
                title: title.into(),
                humanity_challenge: challenge.into(),
                category: "Energy".into(),
                solution: "Solar micro-grids for villages".into(),
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
    fn challenge_filter_is_exact_and_case_sensitive() {
        let ideas = vec![
            idea("a", "Climate Change", 1),
            idea("b", "climate change", 2),
            idea("c", "Climate Change", 3),
            idea("d", "Poverty", 4),
        ];
        let out = filter_by_challenge(&ideas, "Climate Change");
        assert_eq!(titles(&out), vec!["a", "c"]);
        assert!(filter_by_challenge(&ideas, "Water").is_empty());
    }

    #[test]
    fn newest_and_oldest_are_strictly_ordered() {
        let mut ideas = vec![idea("mid", "x", 5), idea("old", "x", 1), idea("new", "x", 9)];
        sort_ideas(&mut ideas, SortOrder::Newest);
        assert_eq!(titles(&ideas), vec!["new", "mid", "old"]);
        sort_ideas(&mut ideas, SortOrder::Oldest);
        assert_eq!(titles(&ideas), vec!["old", "mid", "new"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut ideas = vec![idea("first", "x", 3), idea("second", "x", 3), idea("third", "x", 3)];
        sort_ideas(&mut ideas, SortOrder::Newest);
        assert_eq!(titles(&ideas), vec!["first", "second", "third"]);
        sort_ideas(&mut ideas, SortOrder::Oldest);
        assert_eq!(titles(&ideas), vec!["first", "second", "third"]);
    }

    #[test]
    fn filter_combines_equality_and_substring() {
        let i = idea("Community Solar", "Energy Access", 1);
        let f = IdeaFilter {
            category: Some("Energy".into()),
            solution: Some("MICRO-GRID".into()),
            ..Default::default()
        };
        assert!(f.matches(&i));

        let f = IdeaFilter {
            category: Some("energy".into()),
            ..Default::default()
        };
        assert!(!f.matches(&i));

        let f = IdeaFilter {
            status: Some(IdeaStatus::Scaling),
            ..Default::default()
        };
        assert!(!f.matches(&i));
        assert!(IdeaFilter::default().matches(&i));
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("Newest".parse(), Ok(SortOrder::Newest));
        assert_eq!("oldest".parse(), Ok(SortOrder::Oldest));
        assert!("popular".parse::<SortOrder>().is_err());
    }
}
