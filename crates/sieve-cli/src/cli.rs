//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sieve::{Environment, FileType};

/// Sieve: data-quality inspection for semi-structured files
#[derive(Parser)]
#[command(name = "sieve")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(long, env = "SIEVE_BIND_ADDR", default_value = "127.0.0.1:3141")]
        bind: String,

        /// Deployment environment (development, test, production)
        #[arg(long = "env", env = "SIEVE_ENV", default_value = "development")]
        environment: Environment,

        /// Reasoning provider
        #[arg(long, env = "SIEVE_PROVIDER", default_value = "mock")]
        provider: ProviderChoice,

        /// Model to use (provider-specific)
        #[arg(long, env = "SIEVE_MODEL")]
        model: Option<String>,

        /// Shared secret for /api/admin/invalidate (open when unset)
        #[arg(long, env = "SIEVE_ADMIN_SECRET", hide_env_values = true)]
        admin_secret: Option<String>,

        /// Records sampled per file for type inference
        #[arg(long, env = "SIEVE_SAMPLE_SIZE", default_value_t = 10)]
        sample_size: usize,

        /// Content beyond this many bytes is truncated
        #[arg(long, env = "SIEVE_MAX_CONTENT_BYTES", default_value_t = 200_000)]
        max_content_bytes: usize,

        /// Most analysis results held in the in-memory cache
        #[arg(long, env = "SIEVE_CACHE_MAX_ENTRIES", default_value_t = sieve::DEFAULT_MAX_ENTRIES)]
        cache_entries: usize,
    },

    /// Print the structural fingerprint of a local file
    Fingerprint {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// File type (default: from extension, then content)
        #[arg(short = 't', long)]
        file_type: Option<FileType>,

        /// Records sampled for type inference
        #[arg(long, default_value_t = 10)]
        sample_size: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a cache invalidation command to a running server
    Invalidate {
        /// Base URL of the server
        #[arg(long, default_value = "http://127.0.0.1:3141")]
        server: String,

        /// What to invalidate: all, file_type, version
        #[arg(long)]
        scope: String,

        /// File type to clear (scope file_type)
        #[arg(long)]
        file_type: Option<String>,

        /// Generation to bump: model or rag (scope version)
        #[arg(long = "type")]
        version_type: Option<String>,

        /// New generation label (scope version)
        #[arg(long = "label")]
        label: Option<String>,

        /// Shared admin secret
        #[arg(long, env = "SIEVE_ADMIN_SECRET", hide_env_values = true)]
        admin_secret: Option<String>,
    },
}

/// Reasoning provider choice
#[derive(Clone, Debug, Default)]
pub enum ProviderChoice {
    /// Deterministic offline provider
    #[default]
    Mock,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(ProviderChoice::Mock),
            "anthropic" | "claude" => Ok(ProviderChoice::Anthropic),
            _ => Err(format!("Unknown provider: {}. Use mock or anthropic.", s)),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderChoice::Mock => write!(f, "mock"),
            ProviderChoice::Anthropic => write!(f, "anthropic"),
        }
    }
}
