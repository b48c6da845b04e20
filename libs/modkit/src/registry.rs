use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::context;
use crate::contracts;

pub struct ModuleEntry {
    pub name: &'static str,
    pub core: Arc<dyn contracts::Module>,
    pub rest: Option<Arc<dyn contracts::RestfulModule>>,
    pub rest_host: Option<Arc<dyn contracts::RestHostModule>>,
    pub stateful: Option<Arc<dyn contracts::StatefulModule>>,
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("has_rest", &self.rest.is_some())
            .field("is_rest_host", &self.rest_host.is_some())
            .field("has_stateful", &self.stateful.is_some())
            .finish()
    }
}

/// Runtime registry; modules run in registration order and stop in reverse.
pub struct ModuleRegistry {
    modules: Vec<ModuleEntry>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.modules.iter().map(|m| m.name).collect();
        f.debug_struct("ModuleRegistry")
            .field("modules", &names)
            .finish()
    }
}

impl ModuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    // ---- Ordered phases: init → REST (sync) → start → stop ----

    pub async fn run_init_phase(&self, base_ctx: &context::ModuleCtx) -> Result<(), RegistryError> {
        for e in &self.modules {
            let ctx = base_ctx.clone().for_module(e.name);
            e.core
                .init(&ctx)
                .await
                .map_err(|source| RegistryError::Init {
                    module: e.name,
                    source,
                })?;
            tracing::debug!(module = e.name, "module initialized");
        }
        Ok(())
    }

    pub fn run_rest_phase(
        &self,
        base_ctx: &context::ModuleCtx,
        mut router: Router,
    ) -> Result<Router, RegistryError> {
        let Some(host_entry) = self.modules.iter().find(|e| e.rest_host.is_some()) else {
            return if self.modules.iter().any(|e| e.rest.is_some()) {
                Err(RegistryError::RestRequiresHost)
            } else {
                Ok(router)
            };
        };
        let Some(host) = host_entry.rest_host.as_ref() else {
            return Err(RegistryError::RestRequiresHost);
        };
        let host_ctx = base_ctx.clone().for_module(host_entry.name);
        let openapi: &dyn contracts::OpenApiRegistry = host.as_registry();

        router =
            host.rest_prepare(&host_ctx, router)
                .map_err(|source| RegistryError::RestPrepare {
                    module: host_entry.name,
                    source,
                })?;

        for e in &self.modules {
            if let Some(rest) = &e.rest {
                let ctx = base_ctx.clone().for_module(e.name);
                router = rest
                    .register_rest(&ctx, router, openapi)
                    .map_err(|source| RegistryError::RestRegister {
                        module: e.name,
                        source,
                    })?;
            }
        }

        router = host.rest_finalize(&host_ctx, router).map_err(|source| {
            RegistryError::RestFinalize {
                module: host_entry.name,
                source,
            }
        })?;

        Ok(router)
    }

    pub async fn run_start_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for e in &self.modules {
            if let Some(s) = &e.stateful {
                s.start(cancel.clone())
                    .await
                    .map_err(|source| RegistryError::Start {
                        module: e.name,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Stop failures are logged, never propagated.
    pub async fn run_stop_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for e in self.modules.iter().rev() {
            if let Some(s) = &e.stateful {
                if let Err(err) = s.stop(cancel.clone()).await {
                    tracing::warn!(module = e.name, error = %err, "Failed to stop module");
                }
            }
        }
        Ok(())
    }
}

/// Explicit registration; the binary lists its modules in init order.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<ModuleEntry>,
    errors: Vec<String>,
}

impl RegistryBuilder {
    /// Register a module with only the core capability.
    pub fn core<M: contracts::Module>(mut self, name: &'static str, m: Arc<M>) -> Self {
        self.push(ModuleEntry {
            name,
            core: m,
            rest: None,
            rest_host: None,
            stateful: None,
        });
        self
    }

    /// Register a module that contributes routes to the REST host.
    pub fn rest<M>(mut self, name: &'static str, m: Arc<M>) -> Self
    where
        M: contracts::Module + contracts::RestfulModule,
    {
        self.push(ModuleEntry {
            name,
            core: m.clone(),
            rest: Some(m),
            rest_host: None,
            stateful: None,
        });
        self
    }

    /// Register the single REST host. It is stateful because it owns the server.
    pub fn rest_host<M>(mut self, name: &'static str, m: Arc<M>) -> Self
    where
        M: contracts::Module + contracts::RestHostModule + contracts::StatefulModule,
    {
        if let Some(existing) = self.entries.iter().find(|e| e.rest_host.is_some()) {
            self.errors.push(format!(
                "Multiple REST host modules detected: '{}' and '{}'. Only one REST host is allowed.",
                existing.name, name
            ));
            return self;
        }
        self.push(ModuleEntry {
            name,
            core: m.clone(),
            rest: None,
            rest_host: Some(m.clone()),
            stateful: Some(m),
        });
        self
    }

    /// Attach the stateful capability to an already registered module.
    pub fn stateful<M: contracts::StatefulModule + 'static>(
        mut self,
        name: &'static str,
        m: Arc<M>,
    ) -> Self {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => e.stateful = Some(m),
            None => self
                .errors
                .push(format!("Stateful capability for unknown module '{name}'")),
        }
        self
    }

    fn push(&mut self, entry: ModuleEntry) {
        if self.entries.iter().any(|e| e.name == entry.name) {
            self.errors
                .push(format!("Module '{}' is already registered", entry.name));
            return;
        }
        self.entries.push(entry);
    }

    pub fn build(self) -> Result<ModuleRegistry, RegistryError> {
        if !self.errors.is_empty() {
            return Err(RegistryError::InvalidRegistryConfiguration {
                errors: self.errors,
            });
        }
        tracing::info!(
            modules = ?self.entries.iter().map(|e| e.name).collect::<Vec<_>>(),
            "Module order resolved"
        );
        Ok(ModuleRegistry {
            modules: self.entries,
        })
    }
}

/// Structured errors for the module registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("initialization failed for module '{module}'")]
    Init {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("start failed for '{module}'")]
    Start {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST prepare failed for host module '{module}'")]
    RestPrepare {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST registration failed for module '{module}'")]
    RestRegister {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST finalize failed for host module '{module}'")]
    RestFinalize {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST phase requires an ingress host: modules with capability 'rest' found, but no module with capability 'rest_host'")]
    RestRequiresHost,
    #[error("invalid registry configuration:\n{errors:#?}")]
    InvalidRegistryConfiguration { errors: Vec<String> },
}
