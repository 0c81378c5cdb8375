//! Example: Inspect a data file with Sieve.
//!
//! Usage:
//!   cargo run --example inspect -- <file_path>
//!
//! Example:
//!   cargo run --example inspect -- orders.json

use std::env;
use std::path::Path;
use std::sync::Arc;

use sieve::{
    AnalyzeRequest, FileType, Inspector, MemoryCacheStore, MockProvider, NormalizedResponse,
    SieveError,
};

fn main() -> sieve::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example inspect -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let content = std::fs::read_to_string(path).map_err(|source| SieveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(FileType::from_extension)
        .unwrap_or_else(|| FileType::detect(&content));

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Sieve Inspection: {} ({})", path.display(), file_type);
    println!("{}", separator);
    println!();

    // Mock provider reports the fingerprint's structural issues
    let inspector = Inspector::new(Arc::new(MockProvider::new()))
        .with_cache(Arc::new(MemoryCacheStore::new()));

    let fp = inspector.fingerprint(file_type, &content);
    println!("## Fingerprint");
    println!("  Records: {}", fp.record_count);
    for (field, types) in &fp.data_types {
        let types: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        println!("  {:24} {}", field, types.join(" | "));
    }
    println!();

    match inspector.inspect(AnalyzeRequest::new(content, file_type)) {
        NormalizedResponse::Ok(ok) => {
            println!(
                "## Findings ({} errors, {} warnings)",
                ok.total_errors, ok.total_warnings
            );
            for error in &ok.errors {
                println!(
                    "  [{:?}] {:?}: {}",
                    error.severity, error.error_type, error.message
                );
            }
        }
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }

    Ok(())
}
