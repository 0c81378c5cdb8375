//! Sieve CLI - data-quality inspection for semi-structured files.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sieve=debug,sieve_cli=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve {
            bind,
            environment,
            provider,
            model,
            admin_secret,
            sample_size,
            max_content_bytes,
            cache_entries,
        } => commands::serve::run(
            commands::serve::ServeOptions {
                bind,
                environment,
                provider,
                model,
                admin_secret,
                sample_size,
                max_content_bytes,
                cache_entries,
            },
            cli.verbose,
        ),

        Commands::Fingerprint {
            file,
            file_type,
            sample_size,
            json,
        } => commands::fingerprint::run(file, file_type, sample_size, json, cli.verbose),

        Commands::Invalidate {
            server,
            scope,
            file_type,
            version_type,
            label,
            admin_secret,
        } => commands::invalidate::run(
            server,
            scope,
            file_type,
            version_type,
            label,
            admin_secret,
            cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
