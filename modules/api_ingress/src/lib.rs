//! HTTP host for the Way Forward API.
//!
//! Owns the axum server: prepares the shared router, applies the global
//! middleware stack, merges the OpenAPI fragments contributed by REST modules
//! and serves until the lifecycle token is cancelled.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{middleware::from_fn, routing::get, Router};
use dashmap::DashMap;
use modkit::{ModuleCtx, OpenApiRegistry};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod error;
pub mod request_id;
mod web;

pub use config::{ApiIngressConfig, DEFAULT_CORS_ORIGINS};

const STOP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    openapi: Mutex<OpenApi>,
    registered_paths: DashMap<String, ()>,
    // Router kept from the REST phase for `start()`.
    final_router: Mutex<Option<Router>>,
    server: Mutex<Option<RunningServer>>,
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<()>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            openapi: Mutex::new(base_openapi()),
            registered_paths: DashMap::new(),
            final_router: Mutex::new(None),
            server: Mutex::new(None),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Snapshot of the merged OpenAPI document.
    pub fn openapi_document(&self) -> OpenApi {
        self.openapi.lock().clone()
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().as_ref().map(|s| s.addr)
    }

    /// Wrap `router` in the global middleware stack.
    ///
    /// Outermost to innermost: CORS → SetRequestId → PropagateRequestId →
    /// Trace → push_req_id_to_extensions → Timeout → BodyLimit.
    pub fn apply_middleware(&self, router: Router) -> Result<Router> {
        let cfg = self.config.load();
        let x_request_id = request_id::header();

        let mut router = router
            .layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes))
            .layer(TimeoutLayer::new(cfg.request_timeout))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        if cfg.cors_enabled {
            router = router.layer(cors_layer(&cfg.cors_origins)?);
        }
        Ok(router)
    }

    async fn serve(
        router: Router,
        listener: tokio::net::TcpListener,
        cancel: CancellationToken,
    ) -> Result<()> {
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

fn base_openapi() -> OpenApi {
    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("The Way Forward API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Backend API for The Way Forward platform")),
        )
        .build()
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_RANGE, header::RANGE]))
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &ModuleCtx) -> Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>();
        tracing::debug!(bind_addr = %cfg.bind_addr, docs = cfg.enable_docs, "api_ingress configured");
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

// REST host role: prepare/finalize the router, but do not start the server here.
impl modkit::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &ModuleCtx, router: Router) -> Result<Router> {
        Ok(router.route("/health", get(web::health_check)))
    }

    fn rest_finalize(&self, _ctx: &ModuleCtx, mut router: Router) -> Result<Router> {
        if self.config.load().enable_docs {
            let doc = Arc::new(serde_json::to_value(self.openapi_document())?);
            tracing::info!(paths = self.registered_paths.len(), "emitting OpenAPI document");
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = doc.clone();
                        async move {
                            (
                                [(header::CACHE_CONTROL, "no-store")],
                                axum::Json((*doc).clone()),
                            )
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        let router = self.apply_middleware(router.fallback(error::route_not_found))?;
        *self.final_router.lock() = Some(router.clone());
        Ok(router)
    }

    fn as_registry(&self) -> &dyn OpenApiRegistry {
        self
    }
}

impl OpenApiRegistry for ApiIngress {
    fn register_openapi(&self, doc: OpenApi) {
        for path in doc.paths.paths.keys() {
            if self.registered_paths.insert(path.clone(), ()).is_some() {
                tracing::warn!(%path, "path documented twice; later operations override");
            }
        }
        self.openapi.lock().merge(doc);
    }
}

#[async_trait]
impl modkit::StatefulModule for ApiIngress {
    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let bind_addr = self.config.load().bind_addr.clone();
        let stored = { self.final_router.lock().take() };
        let router = match stored {
            Some(r) => r,
            None => {
                tracing::debug!("No router from REST phase, serving health only");
                self.apply_middleware(
                    Router::new()
                        .route("/health", get(web::health_check))
                        .fallback(error::route_not_found),
                )?
            }
        };

        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {bind_addr}"))?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "HTTP server bound");

        let shutdown = cancel.child_token();
        let handle = tokio::spawn(Self::serve(router, listener, shutdown.clone()));
        *self.server.lock() = Some(RunningServer {
            addr,
            shutdown,
            handle,
        });
        Ok(())
    }

    async fn stop(&self, _cancel: CancellationToken) -> Result<()> {
        let running = { self.server.lock().take() };
        let Some(server) = running else {
            return Ok(());
        };
        server.shutdown.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, server.handle).await {
            Ok(Ok(res)) => res,
            Ok(Err(join)) => Err(anyhow::anyhow!("server task failed: {join}")),
            Err(_) => {
                tracing::warn!(timeout = ?STOP_TIMEOUT, "HTTP server did not stop in time");
                Ok(())
            }
        }
    }
}
