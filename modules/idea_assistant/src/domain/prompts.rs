//! Prompt templates and the parser for form-fill replies.

use serde_json::Value;

pub const IMPROVE_TEMPERATURE: f32 = 0.3;
pub const FORM_FILL_TEMPERATURE: f32 = 0.2;

pub fn improvement_prompt(text: &str) -> String {
    format!(
        "You are an expert at improving idea descriptions to make them clearer and more structured.

I'll provide you with a raw idea description that may contain typos, ambiguities, or unclear explanations.
Your task is to improve this description while:

1. Maintaining the original idea's core concepts and intent
2. Fixing typos and grammatical errors
3. Clarifying ambiguous statements
4. Structuring the content in a logical flow
5. Making the description more readable for an AI agent that will later analyze it
6. NOT adding new features or assumptions that weren't implied in the original text
7. NOT changing the fundamental nature of the idea

Here is the raw idea description:

```
{text}
```

Provide ONLY the improved version without any explanations, introductions, or additional commentary."
    )
}

const FORM_FIELDS: &str = "\
- title: A concise title for the idea
- humanity_challenge: The main challenge the idea addresses
- category: The category of the idea
- sub_category: A more specific category
- geographic_focus: The geographic scope (local, regional, global, etc.)
- time_horizon: The timeframe for implementation
- problem_statement: A clear statement of the problem being solved
- solution: A description of the proposed solution
- why_now: Why this idea is relevant and timely now
- market_estimate: Estimated market size in dollars (numeric value)
- business_model: How the idea will generate revenue or sustain itself
- technologies: List of technologies used
- competition: Description of competing solutions
- status: One of early-stage, pilot, proven, scaling
- type_of_author: Type of person or entity submitting the idea
- author: Name of the author
- sources: List of sources or references

Optional fields:
- ideal_customer_profile: Description of the ideal customer
- skills_required: List of skills needed to implement the idea
- potential_investors: List of potential investors
- potential_customers: List of potential customers
- contacts: List of relevant contacts
- collaboration_groups: List of groups to collaborate with
- similar_ideas: List of similar ideas
- other: Any other relevant information";

pub fn form_fill_prompt(description: &str) -> String {
    format!(
        "You are an expert AI assistant that helps users fill out idea submission forms.
Your goal is to analyze the user's idea description and extract relevant information to populate the form fields.

The form has the following fields:
{FORM_FIELDS}

Analyze the user's description thoroughly and extract as much information as possible.
Never make up information; leave a field empty when the description does not support it.
For list fields, provide items as a comma-separated list.
For the market_estimate field, provide a numeric value.
Reply with a single JSON object keyed by field name and nothing else.

Here is the idea description: {description}"
    )
}

/// Pull a JSON object out of a model reply, tolerating code fences and
/// surrounding prose.
pub fn extract_json_object(reply: &str) -> Option<Value> {
    let body = strip_code_fence(reply.trim());
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(body) {
        return Some(v);
    }
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(v @ Value::Object(_)) => Some(v),
        _ => None,
    }
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
