use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{Module, ModuleCtx, OpenApiRegistry, RestfulModule, TracedClient};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::{Backend, IdeasConfig};
use crate::contract::client::IdeasApi;
use crate::domain::repo::IdeasRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::IdeasLocalClient;
use crate::infra::storage::{InMemoryIdeasRepository, PostgrestIdeasRepository};

/// Ideas module: domain service wired to the configured storage backend.
#[derive(Default)]
pub struct Ideas {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
    backend_override: Option<Backend>,
}

impl Ideas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore the configured backend and use `backend` instead.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            service: ArcSwapOption::empty(),
            backend_override: Some(backend),
        }
    }

    /// In-process client, available after `init`.
    pub fn api(&self) -> Option<Arc<dyn IdeasApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(IdeasLocalClient::new(svc)) as Arc<dyn IdeasApi>)
    }

    fn build_repo(&self, cfg: &IdeasConfig) -> anyhow::Result<Arc<dyn IdeasRepository>> {
        let backend = self.backend_override.unwrap_or(cfg.backend);
        Ok(match backend {
            Backend::Memory => {
                info!("Using in-memory ideas storage");
                Arc::new(InMemoryIdeasRepository::new())
            }
            Backend::Postgrest => {
                let (url, key) = cfg.postgrest_credentials()?;
                info!(%url, "Using PostgREST ideas storage");
                Arc::new(PostgrestIdeasRepository::new(
                    TracedClient::default(),
                    &url,
                    key,
                )?)
            }
        })
    }
}

#[async_trait]
impl Module for Ideas {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing ideas module");

        let cfg: IdeasConfig = ctx.module_config();
        debug!(
            "Loaded ideas config: default_page_size={}, max_page_size={}, backend={:?}",
            cfg.default_page_size, cfg.max_page_size, cfg.backend
        );
        if cfg.default_page_size == 0 || cfg.default_page_size > cfg.max_page_size {
            anyhow::bail!(
                "ideas.default_page_size must be between 1 and max_page_size ({})",
                cfg.max_page_size
            );
        }

        let repo = self.build_repo(&cfg)?;
        let service = Service::new(
            repo,
            ServiceConfig {
                default_page_size: cfg.default_page_size,
                max_page_size: cfg.max_page_size,
            },
        );
        self.service.store(Some(Arc::new(service)));
        Ok(())
    }
}

impl RestfulModule for Ideas {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering ideas REST routes");

        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        let router = routes::register_routes(router, openapi, service)?;
        info!("Ideas REST routes registered successfully");
        Ok(router)
    }
}
