use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::listing::{IdeaFilter, SortOrder};
use crate::contract::model::{Idea, IdeaContent, IdeaPatch, IdeaStatus, NewIdea};

/// REST DTO for idea representation with serde/utoipa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdeaDto {
    pub id: Uuid,
    pub title: String,
    pub humanity_challenge: String,
    pub category: String,
    pub sub_category: String,
    pub geographic_focus: String,
    pub time_horizon: String,
    pub problem_statement: String,
    pub solution: String,
    pub why_now: String,
    /// Estimated market size in dollars.
    pub market_estimate: i64,
    pub business_model: String,
    pub technologies: Vec<String>,
    pub competition: String,
    pub status: IdeaStatus,
    pub type_of_author: String,
    pub author: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub ideal_customer_profile: Option<String>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub potential_investors: Vec<String>,
    #[serde(default)]
    pub potential_customers: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<String>,
    #[serde(default)]
    pub collaboration_groups: Vec<String>,
    #[serde(default)]
    pub similar_ideas: Vec<String>,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating an idea. Absent fields are treated as blank and
/// rejected by validation when required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateIdeaReq {
    pub title: String,
    pub humanity_challenge: String,
    pub category: String,
    pub sub_category: String,
    pub geographic_focus: String,
    pub time_horizon: String,
    pub problem_statement: String,
    pub solution: String,
    pub why_now: String,
    pub market_estimate: i64,
    pub business_model: String,
    pub technologies: Vec<String>,
    pub competition: String,
    pub status: IdeaStatus,
    pub type_of_author: String,
    pub author: String,
    pub sources: Vec<String>,
    pub ideal_customer_profile: Option<String>,
    pub skills_required: Vec<String>,
    pub potential_investors: Vec<String>,
    pub potential_customers: Vec<String>,
    pub contacts: Vec<String>,
    pub collaboration_groups: Vec<String>,
    pub similar_ideas: Vec<String>,
    pub other: Option<String>,
}

/// REST DTO for updating an idea (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateIdeaReq {
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
    pub status: Option<IdeaStatus>,
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
}

/// Query parameters of `GET /api/v1/ideas`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIdeasQuery {
    /// Page size, 1 to 100 (default 100).
    pub limit: Option<u32>,
    /// Number of matching ideas to skip.
    pub offset: Option<u32>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub status: Option<IdeaStatus>,
    pub humanity_challenge: Option<String>,
    /// Case-insensitive substring match.
    pub title: Option<String>,
    /// Case-insensitive substring match.
    pub problem_statement: Option<String>,
    /// Case-insensitive substring match.
    pub solution: Option<String>,
    /// `newest` or `oldest`; storage order when absent.
    pub sort: Option<SortOrder>,
}

impl ListIdeasQuery {
    pub fn filter(&self) -> IdeaFilter {
        IdeaFilter {
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            status: self.status,
            humanity_challenge: self.humanity_challenge.clone(),
            title: self.title.clone(),
            problem_statement: self.problem_statement.clone(),
            solution: self.solution.clone(),
        }
    }
}

// Conversion implementations between REST DTOs and contract models

impl From<Idea> for IdeaDto {
    fn from(idea: Idea) -> Self {
        let c = idea.content;
        Self {
            id: idea.id,
            title: c.title,
            humanity_challenge: c.humanity_challenge,
            category: c.category,
            sub_category: c.sub_category,
            geographic_focus: c.geographic_focus,
            time_horizon: c.time_horizon,
            problem_statement: c.problem_statement,
            solution: c.solution,
            why_now: c.why_now,
            market_estimate: c.market_estimate,
            business_model: c.business_model,
            technologies: c.technologies,
            competition: c.competition,
            status: c.status,
            type_of_author: c.type_of_author,
            author: c.author,
            sources: c.sources,
            ideal_customer_profile: c.ideal_customer_profile,
            skills_required: c.skills_required,
            potential_investors: c.potential_investors,
            potential_customers: c.potential_customers,
            contacts: c.contacts,
            collaboration_groups: c.collaboration_groups,
            similar_ideas: c.similar_ideas,
            other: c.other,
            upvotes: idea.upvotes,
            downvotes: idea.downvotes,
            views: idea.views,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

impl From<IdeaDto> for Idea {
    fn from(d: IdeaDto) -> Self {
        Self {
            id: d.id,
            content: IdeaContent {
                title: d.title,
                humanity_challenge: d.humanity_challenge,
                category: d.category,
                sub_category: d.sub_category,
                geographic_focus: d.geographic_focus,
                time_horizon: d.time_horizon,
                problem_statement: d.problem_statement,
                solution: d.solution,
                why_now: d.why_now,
                market_estimate: d.market_estimate,
                business_model: d.business_model,
                technologies: d.technologies,
                competition: d.competition,
                status: d.status,
                type_of_author: d.type_of_author,
                author: d.author,
                sources: d.sources,
                ideal_customer_profile: d.ideal_customer_profile,
                skills_required: d.skills_required,
                potential_investors: d.potential_investors,
                potential_customers: d.potential_customers,
                contacts: d.contacts,
                collaboration_groups: d.collaboration_groups,
                similar_ideas: d.similar_ideas,
                other: d.other,
            },
            upvotes: d.upvotes,
            downvotes: d.downvotes,
            views: d.views,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<CreateIdeaReq> for NewIdea {
    fn from(r: CreateIdeaReq) -> Self {
        Self {
            title: r.title,
            humanity_challenge: r.humanity_challenge,
            category: r.category,
            sub_category: r.sub_category,
            geographic_focus: r.geographic_focus,
            time_horizon: r.time_horizon,
            problem_statement: r.problem_statement,
            solution: r.solution,
            why_now: r.why_now,
            market_estimate: r.market_estimate,
            business_model: r.business_model,
            technologies: r.technologies,
            competition: r.competition,
            status: r.status,
            type_of_author: r.type_of_author,
            author: r.author,
            sources: r.sources,
            ideal_customer_profile: r.ideal_customer_profile,
            skills_required: r.skills_required,
            potential_investors: r.potential_investors,
            potential_customers: r.potential_customers,
            contacts: r.contacts,
            collaboration_groups: r.collaboration_groups,
            similar_ideas: r.similar_ideas,
            other: r.other,
        }
    }
}

impl From<NewIdea> for CreateIdeaReq {
    fn from(n: NewIdea) -> Self {
        Self {
            title: n.title,
            humanity_challenge: n.humanity_challenge,
            category: n.category,
            sub_category: n.sub_category,
            geographic_focus: n.geographic_focus,
            time_horizon: n.time_horizon,
            problem_statement: n.problem_statement,
            solution: n.solution,
            why_now: n.why_now,
            market_estimate: n.market_estimate,
            business_model: n.business_model,
            technologies: n.technologies,
            competition: n.competition,
            status: n.status,
            type_of_author: n.type_of_author,
            author: n.author,
            sources: n.sources,
            ideal_customer_profile: n.ideal_customer_profile,
            skills_required: n.skills_required,
            potential_investors: n.potential_investors,
            potential_customers: n.potential_customers,
            contacts: n.contacts,
            collaboration_groups: n.collaboration_groups,
            similar_ideas: n.similar_ideas,
            other: n.other,
        }
    }
}

impl From<UpdateIdeaReq> for IdeaPatch {
    fn from(r: UpdateIdeaReq) -> Self {
        Self {
            title: r.title,
            humanity_challenge: r.humanity_challenge,
            category: r.category,
            sub_category: r.sub_category,
            geographic_focus: r.geographic_focus,
            time_horizon: r.time_horizon,
            problem_statement: r.problem_statement,
            solution: r.solution,
            why_now: r.why_now,
            market_estimate: r.market_estimate,
            business_model: r.business_model,
            technologies: r.technologies,
            competition: r.competition,
            status: r.status,
            type_of_author: r.type_of_author,
            author: r.author,
            sources: r.sources,
            ideal_customer_profile: r.ideal_customer_profile,
            skills_required: r.skills_required,
            potential_investors: r.potential_investors,
            potential_customers: r.potential_customers,
            contacts: r.contacts,
            collaboration_groups: r.collaboration_groups,
            similar_ideas: r.similar_ideas,
            other: r.other,
        }
    }
}
