use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{Module, ModuleCtx, OpenApiRegistry, RestfulModule, TracedClient};
use tracing::{info, warn};

use crate::api::rest::routes;
use crate::config::IdeaAssistantConfig;
use crate::domain::llm::LlmClient;
use crate::domain::service::Service;
use crate::infra::OpenAiClient;

/// AI helpers for the submission flow: form analysis and text improvement.
#[derive(Default)]
pub struct IdeaAssistant {
    service: ArcSwapOption<Service>,
    llm_override: Option<Arc<dyn LlmClient>>,
}

impl IdeaAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `llm` instead of the configured OpenAI endpoint.
    pub fn with_llm(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            service: ArcSwapOption::empty(),
            llm_override: Some(llm),
        }
    }

    fn build_llm(cfg: &IdeaAssistantConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
        let api_key = cfg.api_key();
        if api_key.is_none() {
            warn!(env = %cfg.api_key_env, "no API key set; AI endpoints will return fallbacks or errors");
        }
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        let client = OpenAiClient::new(
            TracedClient::new(http),
            &cfg.base_url,
            cfg.model.clone(),
            api_key,
            cfg.api_key_env.clone(),
        )?;
        info!(model = %client.model(), base_url = %cfg.base_url, "LLM client configured");
        Ok(Arc::new(client))
    }
}

#[async_trait]
impl Module for IdeaAssistant {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing idea_assistant module");
        let cfg: IdeaAssistantConfig = ctx.module_config();

        let llm = match &self.llm_override {
            Some(llm) => llm.clone(),
            None => Self::build_llm(&cfg)?,
        };
        self.service.store(Some(Arc::new(Service::new(llm))));
        Ok(())
    }
}

impl RestfulModule for IdeaAssistant {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let router = routes::register_routes(router, openapi, service)?;
        info!("idea_assistant REST routes registered");
        Ok(router)
    }
}
