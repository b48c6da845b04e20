use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(AppConfigProvider);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

use api_ingress::ApiIngress;
use idea_assistant::IdeaAssistant;
use ideas::{Backend, Ideas, IdeasConfig};
use modkit::runtime::{run, RunOptions, ShutdownOptions};
use modkit::ModuleRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The Way Forward server: ideas API and AI-assisted submission
#[derive(Parser)]
#[command(name = "wayforward-server")]
#[command(about = "The Way Forward server - ideas API and AI-assisted submission")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep ideas in memory instead of the configured backend
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);
    sync_ingress_bind_addr(&mut config, args.port.is_some());

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("The Way Forward server starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, &args),
    }
}

/// The ingress listens on `server.host:server.port` unless its own section
/// names an address. An explicit `--port` always wins.
fn sync_ingress_bind_addr(config: &mut AppConfig, port_overridden: bool) {
    let addr = config.bind_addr();
    let section = config
        .modules
        .entry("api_ingress".to_string())
        .or_insert_with(|| serde_json::json!({}));
    if let Some(obj) = section.as_object_mut() {
        if port_overridden || !obj.contains_key("bind_addr") {
            obj.insert("bind_addr".to_string(), serde_json::Value::String(addr));
        }
    }
}

fn build_registry(args: &CliArgs) -> Result<ModuleRegistry> {
    let ideas = if args.mock {
        tracing::info!("--mock: ideas are kept in memory");
        Ideas::with_backend(Backend::Memory)
    } else {
        Ideas::new()
    };

    ModuleRegistry::builder()
        .rest_host("api_ingress", Arc::new(ApiIngress::default()))
        .rest("ideas", Arc::new(ideas))
        .rest("idea_assistant", Arc::new(IdeaAssistant::new()))
        .build()
        .context("invalid module registry")
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    // Provide module configs to modkit
    let config_provider = Arc::new(ModkitConfigAdapter(AppConfigProvider::new(config)));

    let run_options = RunOptions {
        registry: build_registry(&args)?,
        modules_cfg: config_provider,
        shutdown: ShutdownOptions::Signals,
    };

    run(run_options).await
}

fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let ideas_cfg: IdeasConfig = match config.modules.get("ideas") {
        Some(raw) => serde_json::from_value(raw.clone()).context("invalid 'ideas' module config")?,
        None => IdeasConfig::default(),
    };
    if ideas_cfg.backend == Backend::Postgrest && !args.mock {
        ideas_cfg
            .postgrest_credentials()
            .context("ideas backend 'postgrest' is not usable")?;
    }
    build_registry(args)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
