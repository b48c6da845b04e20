use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::context::ModuleCtx;

/// Collects OpenAPI fragments contributed by REST modules.
pub trait OpenApiRegistry: Send + Sync {
    fn register_openapi(&self, doc: utoipa::openapi::OpenApi);
}

/// Core module: DI/wiring.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs after init.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &ModuleCtx,
        router: Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<Router>;
}

/// REST host module: owns the HTTP server, prepares and finalizes the shared router.
pub trait RestHostModule: Send + Sync + 'static {
    /// Prepare a base Router (e.g. health endpoint). Do NOT start the server here.
    fn rest_prepare(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;

    /// Finalize before start: global middleware, `/openapi.json`, keep the router for serving.
    fn rest_finalize(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;

    fn as_registry(&self) -> &dyn OpenApiRegistry;
}

#[async_trait]
pub trait StatefulModule: Send + Sync {
    async fn start(&self, cancel: CancellationToken) -> anyhow::Result<()>;
    async fn stop(&self, cancel: CancellationToken) -> anyhow::Result<()>;
}
