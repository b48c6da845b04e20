use std::sync::Arc;

use ideas::form::IdeaForm;
use tracing::{debug, instrument, warn};

use crate::domain::error::AssistantError;
use crate::domain::llm::LlmClient;
use crate::domain::prompts::{
    extract_json_object, form_fill_prompt, improvement_prompt, FORM_FILL_TEMPERATURE,
    IMPROVE_TEMPERATURE,
};

pub const EMPTY_DESCRIPTION_TITLE: &str = "Please provide a description";
pub const ANALYSIS_FAILED_TITLE: &str = "Error analyzing idea";
pub const UNPARSED_TITLE: &str = "Generated from description";

#[derive(Clone)]
pub struct Service {
    llm: Arc<dyn LlmClient>,
}

impl Service {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Turn a free-text description into a filled form. Never fails: model
    /// errors and unreadable replies yield a placeholder form.
    #[instrument(name = "idea_assistant.service.analyze", skip_all, fields(len = description.len()))]
    pub async fn analyze(&self, description: &str) -> IdeaForm {
        if description.trim().is_empty() {
            return IdeaForm {
                title: EMPTY_DESCRIPTION_TITLE.to_string(),
                ..Default::default()
            };
        }

        let reply = match self
            .llm
            .complete(&form_fill_prompt(description), FORM_FILL_TEMPERATURE)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "idea analysis failed");
                return IdeaForm::placeholder(ANALYSIS_FAILED_TITLE, description);
            }
        };

        match extract_json_object(&reply) {
            Some(value) => {
                debug!("analysis reply parsed");
                IdeaForm::from_analysis(&value)
            }
            None => {
                warn!("analysis reply was not a JSON object");
                IdeaForm::placeholder(UNPARSED_TITLE, description)
            }
        }
    }

    #[instrument(name = "idea_assistant.service.improve", skip_all, fields(len = text.len()))]
    pub async fn improve(&self, text: &str) -> Result<String, AssistantError> {
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyText);
        }
        let improved = self
            .llm
            .complete(&improvement_prompt(text), IMPROVE_TEMPERATURE)
            .await?;
        Ok(improved.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, String>,
        calls: Mutex<Vec<(String, f32)>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::default(),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: Mutex::default(),
            })
        }

        fn temperatures(&self) -> Vec<f32> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    #[async_trait]
    impl LlmClient for Scripted {
        async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            self.reply.clone().map_err(|message| LlmError::Transport { message })
        }
    }

    #[tokio::test]
    async fn blank_description_skips_the_model() {
        let llm = Scripted::ok("{}");
        let form = Service::new(llm.clone()).analyze("   ").await;
        assert_eq!(form.title, EMPTY_DESCRIPTION_TITLE);
        assert!(llm.temperatures().is_empty());
    }

    #[tokio::test]
    async fn reply_is_normalized_into_form() {
        let llm = Scripted::ok(
            "```json\n{\"title\": \"Fog nets\", \"technologies\": \"mesh, sensors\", \"market_estimate\": \"$2,000\"}\n```",
        );
        let form = Service::new(llm.clone()).analyze("catch water from fog").await;
        assert_eq!(form.title, "Fog nets");
        assert_eq!(form.technologies, vec!["mesh", "sensors"]);
        assert_eq!(form.market_estimate, 2000);
        assert_eq!(form.author, "");
        assert_eq!(llm.temperatures(), vec![FORM_FILL_TEMPERATURE]);
    }

    #[tokio::test]
    async fn model_failure_yields_error_form() {
        let long = "d".repeat(120);
        let form = Service::new(Scripted::failing("boom")).analyze(&long).await;
        assert_eq!(form.title, ANALYSIS_FAILED_TITLE);
        assert_eq!(form.problem_statement, format!("{}...", "d".repeat(100)));
    }

    #[tokio::test]
    async fn unparsable_reply_yields_generated_form() {
        let form = Service::new(Scripted::ok("no json here"))
            .analyze("short idea")
            .await;
        assert_eq!(form.title, UNPARSED_TITLE);
        assert_eq!(form.problem_statement, "short idea");
    }

    #[tokio::test]
    async fn improve_trims_and_uses_low_temperature() {
        let llm = Scripted::ok("\n  A clearer idea.  \n");
        let out = Service::new(llm.clone()).improve("a idea").await.unwrap();
        assert_eq!(out, "A clearer idea.");
        assert_eq!(llm.temperatures(), vec![IMPROVE_TEMPERATURE]);
    }

    #[tokio::test]
    async fn improve_rejects_blank_and_surfaces_failures() {
        let svc = Service::new(Scripted::failing("quota exceeded"));
        assert!(matches!(svc.improve(" ").await, Err(AssistantError::EmptyText)));

        let err = svc.improve("text").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
