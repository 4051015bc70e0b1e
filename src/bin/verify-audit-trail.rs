use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};

use log_registry::audit::{
    find_tampered_entries, load_audit_trail_from_file, verify_audit_trail, AuditEntry,
};

fn main() -> Result<()> {
    let matches = Command::new("verify-audit-trail")
        .version("0.1.0")
        .about("Verify log registry audit trail integrity")
        .arg(
            Arg::new("trail-path")
                .short('t')
                .long("trail-path")
                .value_name("PATH")
                .help("Path to audit trail file")
                .required(true),
        )
        .arg(
            Arg::new("head-hash")
                .long("head-hash")
                .value_name("HASH")
                .help("Expected hash of the last entry"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress output except errors"),
        )
        .get_matches();

    let trail_path = matches
        .get_one::<String>("trail-path")
        .ok_or_else(|| anyhow!("--trail-path is required"))?;
    let expected_head = matches.get_one::<String>("head-hash");
    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = verify_trail_file(trail_path, expected_head, verbose) {
        error!("Audit trail verification failed: {}", e);
        std::process::exit(1);
    }

    if !quiet {
        println!("Audit trail verification completed successfully");
    }

    Ok(())
}

fn verify_trail_file(
    trail_path: &str,
    expected_head: Option<&String>,
    verbose: bool,
) -> Result<()> {
    info!("Verifying audit trail: {}", trail_path);

    if !Path::new(trail_path).exists() {
        return Err(anyhow!("Audit trail file not found: {}", trail_path));
    }

    let entries = load_audit_trail_from_file(trail_path)?;

    let tampered = find_tampered_entries(&entries);
    if !tampered.is_empty() {
        return Err(anyhow!("Tampered entries at positions {:?}", tampered));
    }

    let summary = verify_audit_trail(&entries)?;
    if verbose {
        println!("{}", summary.summary());
    }

    let head = entries
        .last()
        .ok_or_else(|| anyhow!("Audit trail is empty"))?;
    if let Some(expected) = expected_head {
        if &head.this_hash != expected {
            return Err(anyhow!(
                "Head hash mismatch. Expected: {}, Got: {}",
                expected,
                head.this_hash
            ));
        }
    }

    if verbose {
        print_distribution(&entries);
        println!("Head hash: {}", head.this_hash);
    }

    Ok(())
}

fn print_distribution(entries: &[AuditEntry]) {
    let mut by_operation: HashMap<(&str, &str), usize> = HashMap::new();
    for entry in entries.iter().skip(1) {
        *by_operation
            .entry((entry.operation.as_str(), entry.outcome.as_str()))
            .or_insert(0) += 1;
    }

    let mut rows: Vec<_> = by_operation.into_iter().collect();
    rows.sort();

    println!("\nOperation distribution:");
    for ((operation, outcome), count) in rows {
        println!("  {} {}: {}", operation, outcome, count);
    }
}
