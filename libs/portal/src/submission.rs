//! The submission flow: free text, optional AI help, manual edit, submit.

use std::sync::Arc;

use ideas::form::IdeaForm;
use ideas::model::Idea;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, PlatformApi};
use crate::notice::Notice;

pub const SUBMITTED_TITLE: &str = "Idea submitted successfully";
pub const SUBMIT_FAILED_TITLE: &str = "Submission failed";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Please describe your idea first")]
    EmptyDescription,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Destructive toast for this failure.
    pub fn notice(&self) -> Notice {
        let title = match self {
            SubmitError::MissingFields(_) => "Missing required fields",
            SubmitError::EmptyDescription => "Description required",
            SubmitError::Api(_) => SUBMIT_FAILED_TITLE,
        };
        Notice::failure(title, self.to_string())
    }
}

pub struct SubmissionFlow {
    api: Arc<dyn PlatformApi>,
    pub description: String,
    pub form: IdeaForm,
    pub is_analyzing: bool,
    pub is_improving: bool,
    pub is_submitting: bool,
    pub ai_assisted: bool,
    pub submitted: bool,
    pub error: Option<String>,
}

impl SubmissionFlow {
    pub fn new(api: Arc<dyn PlatformApi>) -> Self {
        Self {
            api,
            description: String::new(),
            form: IdeaForm::default(),
            is_analyzing: false,
            is_improving: false,
            is_submitting: false,
            ai_assisted: false,
            submitted: false,
            error: None,
        }
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    /// Replace the description with the server's rewrite.
    #[instrument(name = "portal.submission.improve", skip_all)]
    pub async fn improve_description(&mut self) -> Result<(), SubmitError> {
        if self.description.trim().is_empty() {
            return Err(SubmitError::EmptyDescription);
        }
        self.is_improving = true;
        self.error = None;
        let result = self.api.improve_text(&self.description).await;
        self.is_improving = false;

        match result {
            Ok(text) => {
                self.description = text;
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Pre-fill the form from the description.
    #[instrument(name = "portal.submission.analyze", skip_all)]
    pub async fn analyze(&mut self) -> Result<(), SubmitError> {
        if self.description.trim().is_empty() {
            return Err(SubmitError::EmptyDescription);
        }
        self.is_analyzing = true;
        self.error = None;
        let result = self.api.analyze_idea(&self.description).await;
        self.is_analyzing = false;

        match result {
            Ok(form_data) => {
                self.form = IdeaForm::from_analysis(&form_data);
                self.ai_assisted = true;
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut IdeaForm)) {
        f(&mut self.form);
        self.submitted = false;
    }

    /// Validate and send the form. Nothing is sent while a required field is
    /// blank. On success the flow resets and the created idea is returned with
    /// its toast.
    #[instrument(name = "portal.submission.submit", skip_all)]
    pub async fn submit(&mut self) -> Result<(Idea, Notice), SubmitError> {
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return Err(SubmitError::MissingFields(missing));
        }

        self.is_submitting = true;
        self.error = None;
        let result = self.api.create_idea(self.form.to_new_idea()).await;
        self.is_submitting = false;

        match result {
            Ok(idea) => {
                info!(id = %idea.id, ai_assisted = self.ai_assisted, "idea submitted");
                self.form = IdeaForm::default();
                self.description.clear();
                self.ai_assisted = false;
                self.submitted = true;
                let notice = Notice::success(
                    SUBMITTED_TITLE,
                    Some("Thank you for sharing your idea!".to_string()),
                );
                Ok((idea, notice))
            }
            Err(e) => Err(self.record(e)),
        }
    }

    fn record(&mut self, e: ApiError) -> SubmitError {
        warn!(error = %e, "platform call failed");
        self.error = Some(e.to_string());
        SubmitError::Api(e)
    }
}
