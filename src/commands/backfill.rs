//! Backfill command - compute and store embeddings for every row

use anyhow::{Context, Result};
use colored::Colorize;

use hybrid_nl_search::core::config::Config;
use hybrid_nl_search::search::engine::QueryEngine;

use super::output::print_json;

/// Run backfill command
pub fn run(config: &Config, status_only: bool, json: bool) -> Result<()> {
    if !config.database.exists() {
        if json {
            print_json(&serde_json::json!({
                "exists": false,
                "error": "Database not found",
                "database": config.database.display().to_string(),
            }))?;
        } else {
            println!(
                "{} Database not found at {}. Run {} first.",
                "!".yellow().bold(),
                config.database.display(),
                "nlq init --seed".cyan()
            );
        }
        return Ok(());
    }

    let engine = QueryEngine::from_config(config)?;

    if status_only {
        return show_status(&engine, json);
    }

    if !json {
        println!("{} Computing embeddings...", "→".dimmed());
    }

    let stats = engine.backfill().context("Embedding backfill failed")?;

    if json {
        return print_json(&stats);
    }

    println!();
    println!(
        "{} Stored {} embeddings in {:.2}s",
        "✓".green().bold(),
        stats.embedded().to_string().cyan(),
        stats.duration_ms as f64 / 1000.0
    );
    for target in &stats.targets {
        println!(
            "  {} {}: {} embedded",
            "→".dimmed(),
            target.table,
            target.embedded
        );
        if target.skipped > 0 {
            println!(
                "    {} {} rows skipped (no text)",
                "!".yellow(),
                target.skipped
            );
        }
    }

    Ok(())
}

/// Show embedding coverage
fn show_status(engine: &QueryEngine, json: bool) -> Result<()> {
    let status = engine.embedding_status()?;

    if json {
        return print_json(&status);
    }

    println!("{}", "Embedding Status".bold());
    println!();
    for s in &status {
        let coverage = format!("{}/{}", s.embedded, s.rows);
        let coverage = if s.embedded == s.rows {
            coverage.green()
        } else {
            coverage.yellow()
        };
        println!("  {} {}: {} rows embedded", "→".dimmed(), s.table, coverage);
    }

    Ok(())
}
