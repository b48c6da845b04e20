use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maturity of an idea. Kebab-case on the wire (`early-stage`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum IdeaStatus {
    #[default]
    EarlyStage,
    Pilot,
    Proven,
    Scaling,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 4] = [
        IdeaStatus::EarlyStage,
        IdeaStatus::Pilot,
        IdeaStatus::Proven,
        IdeaStatus::Scaling,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::EarlyStage => "early-stage",
            IdeaStatus::Pilot => "pilot",
            IdeaStatus::Proven => "proven",
            IdeaStatus::Scaling => "scaling",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown idea status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for IdeaStatus {
    type Err = UnknownStatus;

    /// Accepts the wire form plus loose spellings such as `Early Stage` or `early_stage`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        IdeaStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == key)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Idea as held by the domain and exchanged between modules.
#[derive(Debug, Clone, PartialEq)]
pub struct Idea {
    pub id: Uuid,
    pub content: IdeaContent,
    pub upvotes: u64,
    pub downvotes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied part of an idea.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdeaContent {
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

/// Text fields that must be non-blank for an idea to be accepted.
pub const REQUIRED_TEXT_FIELDS: [&str; 13] = [
    "title",
    "humanity_challenge",
    "category",
    "sub_category",
    "geographic_focus",
    "time_horizon",
    "problem_statement",
    "solution",
    "why_now",
    "business_model",
    "competition",
    "type_of_author",
    "author",
];

impl IdeaContent {
    /// Names of required text fields that are blank, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let values = [
            &self.title,
            &self.humanity_challenge,
            &self.category,
            &self.sub_category,
            &self.geographic_focus,
            &self.time_horizon,
            &self.problem_statement,
            &self.solution,
            &self.why_now,
            &self.business_model,
            &self.competition,
            &self.type_of_author,
            &self.author,
        ];
        REQUIRED_TEXT_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect()
    }
}

pub type NewIdea = IdeaContent;

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdeaPatch {
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

impl IdeaPatch {
    pub fn is_empty(&self) -> bool {
        *self == IdeaPatch::default()
    }

    /// Apply present fields onto `content`.
    pub fn apply(self, c: &mut IdeaContent) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = self.$field { c.$field = v; } )*
            };
        }
        set!(
            title,
            humanity_challenge,
            category,
            sub_category,
            geographic_focus,
            time_horizon,
            problem_statement,
            solution,
            why_now,
            market_estimate,
            business_model,
            technologies,
            competition,
            status,
            type_of_author,
            author,
            sources,
            skills_required,
            potential_investors,
            potential_customers,
            contacts,
            collaboration_groups,
            similar_ideas,
        );
        if let Some(v) = self.ideal_customer_profile {
            c.ideal_customer_profile = Some(v);
        }
        if let Some(v) = self.other {
            c.other = Some(v);
        }
    }
}

/// Engagement counters that can be bumped independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Upvotes,
    Downvotes,
    Views,
}

impl Counter {
    pub fn column(&self) -> &'static str {
        match self {
            Counter::Upvotes => "upvotes",
            Counter::Downvotes => "downvotes",
            Counter::Views => "view_count",
        }
    }
}
