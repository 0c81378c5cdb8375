//! Fingerprint command - print the structural summary of a local file.

use std::path::PathBuf;

use colored::Colorize;
use sieve::{FileType, FingerprintConfig, SchemaFingerprint, SieveError};

pub fn run(
    file: PathBuf,
    file_type: Option<FileType>,
    sample_size: usize,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = FingerprintConfig::with_sample_size(sample_size);
    let fp = match file_type {
        Some(file_type) => {
            let content = std::fs::read_to_string(&file).map_err(|source| SieveError::Io {
                path: file.clone(),
                source,
            })?;
            sieve::fingerprint(file_type, &content, &config)
        }
        None => sieve::fingerprint_file(&file, &config)?,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&fp)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Fingerprint".cyan().bold(),
        file.display().to_string().white(),
        fp.file_type.to_string().white().bold()
    );
    println!();
    println!("Records: {}", fp.record_count.to_string().white().bold());
    print_fields(&fp);

    if fp.issues.is_empty() {
        println!("{}", "No structural issues found".green());
    } else {
        println!("{}", "Issues:".yellow().bold());
        for issue in &fp.issues {
            println!("  {} {}", "-".yellow(), issue);
        }
    }

    if verbose {
        println!();
        println!("Digest: {}", fp.digest());
    }

    Ok(())
}

fn print_fields(fp: &SchemaFingerprint) {
    let names: Vec<&str> = if !fp.column_headers.is_empty() {
        fp.column_headers.iter().map(String::as_str).collect()
    } else if !fp.top_level_keys.is_empty() {
        fp.top_level_keys.iter().map(String::as_str).collect()
    } else {
        fp.tag_names.iter().map(String::as_str).collect()
    };
    if names.is_empty() {
        println!();
        return;
    }

    println!();
    println!("{}", "Fields:".yellow().bold());
    for name in names {
        let types = fp
            .types_of(name)
            .map(|types| {
                types
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .unwrap_or_else(|| "-".to_string());
        let marker = if fp.is_heterogeneous(name) {
            " (mixed)".red().to_string()
        } else {
            String::new()
        };
        println!("  {:24} {}{}", name, types, marker);
    }
    println!();
}
