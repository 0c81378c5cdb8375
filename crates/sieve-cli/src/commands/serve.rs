//! Serve command - run the HTTP API.

use std::sync::Arc;

use colored::Colorize;
use sieve::provider::ProviderConfig;
use sieve::{
    AnthropicProvider, CacheStore, Environment, Inspector, InvalidationController,
    MemoryCacheStore, MockProvider, ReasoningProvider, SieveConfig,
};

use crate::cli::ProviderChoice;
use crate::server::app;
use crate::server::state::{AppState, DEFAULT_BODY_LIMIT};

/// Options for the serve command, gathered from flags and environment.
pub struct ServeOptions {
    pub bind: String,
    pub environment: Environment,
    pub provider: ProviderChoice,
    pub model: Option<String>,
    pub admin_secret: Option<String>,
    pub sample_size: usize,
    pub max_content_bytes: usize,
    pub cache_entries: usize,
}

pub fn run(options: ServeOptions, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = SieveConfig::default()
        .with_environment(options.environment)
        .with_sample_size(options.sample_size)
        .with_max_content_bytes(options.max_content_bytes);

    // The blocking HTTP client must be built outside the async runtime.
    let provider = build_provider(&options.provider, options.model)?;

    let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_capacity(options.cache_entries));
    let inspector = Inspector::with_config(provider, config).with_cache(store.clone());
    let invalidation = InvalidationController::new(store, options.admin_secret);

    if invalidation.is_open() {
        tracing::warn!("SIEVE_ADMIN_SECRET is not set; /api/admin/invalidate is open to any caller");
    }

    // Bodies above the content cap must still get through so they can be truncated.
    let state = AppState::new(inspector, invalidation)
        .with_body_limit(DEFAULT_BODY_LIMIT.max(options.max_content_bytes.saturating_mul(2)));

    println!();
    println!(
        "{} {}",
        "Starting Sieve API at".cyan().bold(),
        format!("http://{}", options.bind).white().bold()
    );
    println!();
    println!("  Environment: {}", options.environment);
    println!(
        "  Provider:    {} ({})",
        state.inspector.provider().name(),
        state.inspector.provider().config().model
    );
    if verbose {
        println!("  Sample size: {}", options.sample_size);
        println!("  Max content: {} bytes", options.max_content_bytes);
        println!("  Cache size:  {} entries", options.cache_entries);
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(app::run_server(state.clone(), &options.bind));
    drop(runtime);
    // Last provider handle is released here, outside the runtime.
    drop(state);

    result
}

fn build_provider(
    choice: &ProviderChoice,
    model: Option<String>,
) -> Result<Arc<dyn ReasoningProvider>, Box<dyn std::error::Error>> {
    let provider: Arc<dyn ReasoningProvider> = match choice {
        ProviderChoice::Mock => Arc::new(MockProvider::new()),
        ProviderChoice::Anthropic => {
            let mut config = ProviderConfig::default();
            if let Some(model) = model {
                config = config.with_model(model);
            }
            Arc::new(AnthropicProvider::from_env(config)?)
        }
    };
    Ok(provider)
}
