//! Row shape of the hosted `ideas` table.
//!
//! Every content column is nullable upstream, so reads go through `Option`
//! and collapse to the contract defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{Idea, IdeaContent};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdeaRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub humanity_challenge: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub geographic_focus: Option<String>,
    pub time_horizon: Option<String>,
    pub problem_statement: Option<String>,
    pub solution: Option<String>,
    pub why_now: Option<String>,
    pub market_estimate: Option<i64>,
    pub business_model: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub competition: Option<String>,
    pub status: Option<String>,
    pub type_of_author: Option<String>,
    pub author: Option<String>,
    pub sources: Option<Vec<String>>,
    pub ideal_customer_profile: Option<String>,
    pub skills_required: Option<Vec<String>>,
    pub potential_investors: Option<Vec<String>>,
    pub potential_customers: Option<Vec<String>>,
    pub contacts: Option<Vec<String>>,
    pub collaboration_groups: Option<Vec<String>>,
    pub similar_ideas: Option<Vec<String>>,
    pub other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<IdeaRow> for Idea {
    fn from(r: IdeaRow) -> Self {
        let created_at = r.created_at.unwrap_or_default();
        Self {
            id: r.id,
            content: IdeaContent {
                title: r.title.unwrap_or_default(),
                humanity_challenge: r.humanity_challenge.unwrap_or_default(),
                category: r.category.unwrap_or_default(),
                sub_category: r.sub_category.unwrap_or_default(),
                geographic_focus: r.geographic_focus.unwrap_or_default(),
                time_horizon: r.time_horizon.unwrap_or_default(),
                problem_statement: r.problem_statement.unwrap_or_default(),
                solution: r.solution.unwrap_or_default(),
                why_now: r.why_now.unwrap_or_default(),
                market_estimate: r.market_estimate.unwrap_or_default(),
                business_model: r.business_model.unwrap_or_default(),
                technologies: r.technologies.unwrap_or_default(),
                competition: r.competition.unwrap_or_default(),
                status: r
                    .status
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                type_of_author: r.type_of_author.unwrap_or_default(),
                author: r.author.unwrap_or_default(),
                sources: r.sources.unwrap_or_default(),
                ideal_customer_profile: r.ideal_customer_profile,
                skills_required: r.skills_required.unwrap_or_default(),
                potential_investors: r.potential_investors.unwrap_or_default(),
                potential_customers: r.potential_customers.unwrap_or_default(),
                contacts: r.contacts.unwrap_or_default(),
                collaboration_groups: r.collaboration_groups.unwrap_or_default(),
                similar_ideas: r.similar_ideas.unwrap_or_default(),
                other: r.other,
            },
            upvotes: r.upvotes.unwrap_or_default(),
            downvotes: r.downvotes.unwrap_or_default(),
            views: r.view_count.unwrap_or_default(),
            created_at,
            updated_at: r.updated_at.unwrap_or(created_at),
        }
    }
}

impl From<&Idea> for IdeaRow {
    fn from(i: &Idea) -> Self {
        let c = i.content.clone();
        Self {
            id: i.id,
            title: Some(c.title),
            humanity_challenge: Some(c.humanity_challenge),
            category: Some(c.category),
            sub_category: Some(c.sub_category),
            geographic_focus: Some(c.geographic_focus),
            time_horizon: Some(c.time_horizon),
            problem_statement: Some(c.problem_statement),
            solution: Some(c.solution),
            why_now: Some(c.why_now),
            market_estimate: Some(c.market_estimate),
            business_model: Some(c.business_model),
            technologies: Some(c.technologies),
            competition: Some(c.competition),
            status: Some(c.status.as_str().to_string()),
            type_of_author: Some(c.type_of_author),
            author: Some(c.author),
            sources: Some(c.sources),
            ideal_customer_profile: c.ideal_customer_profile,
            skills_required: Some(c.skills_required),
            potential_investors: Some(c.potential_investors),
            potential_customers: Some(c.potential_customers),
            contacts: Some(c.contacts),
            collaboration_groups: Some(c.collaboration_groups),
            similar_ideas: Some(c.similar_ideas),
            other: c.other,
            upvotes: Some(i.upvotes),
            downvotes: Some(i.downvotes),
            view_count: Some(i.views),
            created_at: Some(i.created_at),
            updated_at: Some(i.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::IdeaStatus;

    #[test]
    fn null_columns_collapse_to_defaults() {
        let row: IdeaRow = serde_json::from_value(serde_json::json!({
            "id": "6f1c1c52-3c1e-4a8a-9d43-1f8b0c2f8a10",
            "title": "Water ATMs",
            "technologies": null,
            "status": "Scaling",
            "view_count": 7,
            "created_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        let idea = Idea::from(row);
        assert_eq!(idea.content.title, "Water ATMs");
        assert!(idea.content.technologies.is_empty());
        assert_eq!(idea.content.status, IdeaStatus::Scaling);
        assert_eq!(idea.views, 7);
        assert_eq!(idea.updated_at, idea.created_at);
    }
}
