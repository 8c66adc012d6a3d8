//! Verba - Word-by-Word Translation Service
//!
//! This is the main entry point for the Verba application, which serves an
//! HTTP API (and a one-shot CLI) translating text word by word through a
//! remote translation resource.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use std::sync::Arc;

use verba::cache::TranslationCache;
use verba::cli::{Args, Commands};
use verba::config::Config;
use verba::language::LanguageRegistry;
use verba::persist::RecordSinkFactory;
use verba::remote::TranslateApiFactory;
use verba::service::{TranslationRequest, TranslationService};
use verba::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };
    config.apply_env_overrides();

    // Execute command
    match args.command {
        Commands::Serve { bind, port } => {
            let service = build_service(&config).await?;
            let state = Arc::new(AppState { service });

            let bind_addr = bind.unwrap_or(config.server.bind_addr);
            let port = port.unwrap_or(config.server.port);

            web::serve(state, &bind_addr, port).await?;
        }
        Commands::Translate {
            text,
            source,
            target,
        } => {
            let service = build_service(&config).await?;

            let request = TranslationRequest {
                client_id: "cli".to_string(),
                text,
                source_lang: source,
                target_lang: target,
            };

            let translated = service.translate(&request).await?;
            println!("{}", translated);
        }
        Commands::Languages => {
            let api = TranslateApiFactory::create_client(config.remote.clone())?;
            let registry = LanguageRegistry::bootstrap(&config.registry, api.as_ref()).await?;

            let mut languages: Vec<_> = registry.languages().iter().collect();
            languages.sort();

            println!("{} supported languages:", languages.len());
            for (code, name) in languages {
                println!("{:<8} {}", code, name);
            }
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Build the translation service from configuration: remote client,
/// language registry, shared cache, record sink.
async fn build_service(config: &Config) -> Result<TranslationService> {
    let api = TranslateApiFactory::create_client(config.remote.clone())?;
    let registry = LanguageRegistry::bootstrap(&config.registry, api.as_ref()).await?;
    let cache = Arc::new(TranslationCache::from_config(&config.cache));
    let sink = RecordSinkFactory::create_sink(&config.database)?;

    Ok(TranslationService::new(
        registry,
        cache,
        api,
        sink,
        config.worker.pool_size,
    ))
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let verba_dir = std::env::current_dir()?.join(".verba");
    let log_dir = verba_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "verba.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
