//! # ModKit - module wiring for the Way Forward server
//!
//! Modules are plain structs implementing [`Module`] plus any of the optional
//! capabilities ([`RestfulModule`], [`RestHostModule`], [`StatefulModule`]).
//! The binary registers them explicitly with a [`ModuleRegistry`] and hands the
//! registry to [`run`], which drives the phases:
//!
//! init → REST (sync) → start → wait for shutdown → stop
//!
//! ```rust,ignore
//! let registry = ModuleRegistry::builder()
//!     .rest_host("api_ingress", ingress.clone())
//!     .rest("ideas", ideas.clone())
//!     .build()?;
//! modkit::run(RunOptions { registry, modules_cfg, shutdown: ShutdownOptions::Signals }).await
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod contracts;
pub use crate::contracts::*;

pub mod registry;
pub use registry::{ModuleRegistry, RegistryError};

pub mod api;
pub use api::extract::{ApiJson, ApiPath, ApiQuery};
pub use api::problem::{
    bad_request, internal_error, not_found, Problem, ProblemResponse, ValidationError,
};

pub mod http;
pub use http::client::TracedClient;

pub mod runtime;
pub use runtime::{run, RunOptions, ShutdownOptions};
