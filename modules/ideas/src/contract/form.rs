//! Submission form and the one function that fills its defaults.
//!
//! Both the analysis endpoint and the portal go through [`IdeaForm::normalize`],
//! so an analysis result and a hand-edited form have the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::contract::model::{IdeaStatus, NewIdea};

/// Every idea input field as an editable value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct IdeaForm {
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
    pub ideal_customer_profile: String,
    pub skills_required: Vec<String>,
    pub potential_investors: Vec<String>,
    pub potential_customers: Vec<String>,
    pub contacts: Vec<String>,
    pub collaboration_groups: Vec<String>,
    pub similar_ideas: Vec<String>,
    pub other: String,
}

impl IdeaForm {
    /// Build a form from loosely typed JSON (LLM output, older payloads).
    ///
    /// Missing fields get `""`, `[]` or `0`; list fields given as a
    /// comma-separated string are split and trimmed; a string market estimate
    /// keeps only its ASCII digits; an unrecognised status falls back to the
    /// default.
    pub fn normalize(raw: &Value) -> IdeaForm {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);
        let text = |k: &str| text_field(obj.get(k));
        let list = |k: &str| list_field(obj.get(k));

        IdeaForm {
            title: text("title"),
            humanity_challenge: text("humanity_challenge"),
            category: text("category"),
            sub_category: text("sub_category"),
            geographic_focus: text("geographic_focus"),
            time_horizon: text("time_horizon"),
            problem_statement: text("problem_statement"),
            solution: text("solution"),
            why_now: text("why_now"),
            market_estimate: market_estimate_field(obj.get("market_estimate")),
            business_model: text("business_model"),
            technologies: list("technologies"),
            competition: text("competition"),
            status: obj
                .get("status")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            type_of_author: text("type_of_author"),
            author: text("author"),
            sources: list("sources"),
            ideal_customer_profile: text("ideal_customer_profile"),
            skills_required: list("skills_required"),
            potential_investors: list("potential_investors"),
            potential_customers: list("potential_customers"),
            contacts: list("contacts"),
            collaboration_groups: list("collaboration_groups"),
            similar_ideas: list("similar_ideas"),
            other: text("other"),
        }
    }

    /// Populate a form from the `form_data` object returned by analysis.
    pub fn from_analysis(form_data: &Value) -> IdeaForm {
        Self::normalize(form_data)
    }

    /// Fallback form used when analysis cannot produce anything useful.
    pub fn placeholder(title: &str, description: &str) -> IdeaForm {
        IdeaForm {
            title: title.to_string(),
            problem_statement: abbreviate(description, 100),
            ..Default::default()
        }
    }

    /// Names of required text fields that are blank, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.to_new_idea().missing_required()
    }

    /// Convert into creation input; blank optional text becomes `None`.
    pub fn to_new_idea(&self) -> NewIdea {
        let opt = |s: &str| {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        };
        NewIdea {
            title: self.title.trim().to_string(),
            humanity_challenge: self.humanity_challenge.trim().to_string(),
            category: self.category.trim().to_string(),
            sub_category: self.sub_category.trim().to_string(),
            geographic_focus: self.geographic_focus.trim().to_string(),
            time_horizon: self.time_horizon.trim().to_string(),
            problem_statement: self.problem_statement.trim().to_string(),
            solution: self.solution.trim().to_string(),
            why_now: self.why_now.trim().to_string(),
            market_estimate: self.market_estimate,
            business_model: self.business_model.trim().to_string(),
            technologies: self.technologies.clone(),
            competition: self.competition.trim().to_string(),
            status: self.status,
            type_of_author: self.type_of_author.trim().to_string(),
            author: self.author.trim().to_string(),
            sources: self.sources.clone(),
            ideal_customer_profile: opt(&self.ideal_customer_profile),
            skills_required: self.skills_required.clone(),
            potential_investors: self.potential_investors.clone(),
            potential_customers: self.potential_customers.clone(),
            contacts: self.contacts.clone(),
            collaboration_groups: self.collaboration_groups.clone(),
            similar_ideas: self.similar_ideas.clone(),
            other: opt(&self.other),
        }
    }
}

/// First `max` characters followed by `...`, or the text itself when short enough.
pub fn abbreviate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut s: String = text.chars().take(max).collect();
        s.push_str("...");
        s
    } else {
        text.to_string()
    }
}

fn text_field(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn list_field(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| text_field(Some(i)).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn market_estimate_field(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::REQUIRED_TEXT_FIELDS;
    use serde_json::json;

    #[test]
    fn normalize_fills_missing_fields() {
        let f = IdeaForm::normalize(&json!({ "title": "Solar kiosks" }));
        assert_eq!(f.title, "Solar kiosks");
        assert_eq!(f.category, "");
        assert!(f.technologies.is_empty());
        assert!(f.sources.is_empty());
        assert_eq!(f.market_estimate, 0);
        assert_eq!(f.status, IdeaStatus::EarlyStage);
    }

    #[test]
    fn normalize_splits_comma_separated_lists() {
        let f = IdeaForm::normalize(&json!({
            "technologies": "solar, batteries ,IoT",
            "contacts": ["a@x.org", " ", "b@x.org"],
            "similar_ideas": ""
        }));
        assert_eq!(f.technologies, vec!["solar", "batteries", "IoT"]);
        assert_eq!(f.contacts, vec!["a@x.org", "b@x.org"]);
        assert!(f.similar_ideas.is_empty());
    }

    #[test]
    fn normalize_keeps_only_digits_of_string_estimate() {
        assert_eq!(
            IdeaForm::normalize(&json!({"market_estimate": "$1,500,000"})).market_estimate,
            1_500_000
        );
        assert_eq!(
            IdeaForm::normalize(&json!({"market_estimate": "unknown"})).market_estimate,
            0
        );
        assert_eq!(
            IdeaForm::normalize(&json!({"market_estimate": 42})).market_estimate,
            42
        );
    }

    #[test]
    fn normalize_reads_loose_status() {
        let f = IdeaForm::normalize(&json!({"status": "Pilot"}));
        assert_eq!(f.status, IdeaStatus::Pilot);
        let f = IdeaForm::normalize(&json!({"status": "prototype"}));
        assert_eq!(f.status, IdeaStatus::EarlyStage);
    }

    #[test]
    fn normalize_of_non_object_is_default() {
        assert_eq!(IdeaForm::normalize(&json!("nope")), IdeaForm::default());
    }

    #[test]
    fn placeholder_abbreviates_long_descriptions() {
        let long = "x".repeat(150);
        let f = IdeaForm::placeholder("Error analyzing idea", &long);
        assert_eq!(f.problem_statement.len(), 103);
        assert!(f.problem_statement.ends_with("..."));

        let f = IdeaForm::placeholder("Generated from description", "short");
        assert_eq!(f.problem_statement, "short");
    }

    #[test]
    fn missing_required_lists_blank_fields() {
        let mut f = IdeaForm::default();
        assert_eq!(f.missing_required().len(), REQUIRED_TEXT_FIELDS.len());

        f.title = "T".into();
        f.author = "   ".into();
        let missing = f.missing_required();
        assert!(!missing.contains(&"title"));
        assert!(missing.contains(&"author"));
    }

    #[test]
    fn to_new_idea_drops_blank_optionals() {
        let f = IdeaForm {
            title: "  Title ".into(),
            other: "  ".into(),
            ideal_customer_profile: "Farmers".into(),
            ..Default::default()
        };
        let n = f.to_new_idea();
        assert_eq!(n.title, "Title");
        assert_eq!(n.other, None);
        assert_eq!(n.ideal_customer_profile.as_deref(), Some("Farmers"));
    }
}
