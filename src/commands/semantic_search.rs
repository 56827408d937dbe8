//! Semantic Search command - nearest products by embedding distance

use anyhow::Result;
use colored::Colorize;

use hybrid_nl_search::core::config::Config;
use hybrid_nl_search::search::engine::QueryEngine;

use super::output::{print_json, print_result_set};

/// Run semantic search command
///
/// A `max_price` of zero means no ceiling, same as leaving it out.
pub fn run(
    config: &Config,
    query: &str,
    max_price: Option<f64>,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("{} Please type a question first", "!".yellow());
        return Ok(());
    }

    let price_ceiling = max_price.filter(|p| *p != 0.0);
    let limit = limit.unwrap_or(config.search.default_limit);

    let engine = QueryEngine::from_config(config)?;
    let results = engine.semantic_search(query, price_ceiling, limit)?;

    if json {
        return print_json(&results);
    }

    if let Some(ceiling) = price_ceiling {
        println!(
            "{} Nearest matches for {} priced at most {}",
            "→".dimmed(),
            query.cyan(),
            ceiling
        );
    } else {
        println!("{} Nearest matches for {}", "→".dimmed(), query.cyan());
    }
    println!();
    print_result_set("Results (Semantic Search)", &results);

    Ok(())
}
