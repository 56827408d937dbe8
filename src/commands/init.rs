//! Init command - create the demo tables

use anyhow::{Context, Result};
use colored::*;

use hybrid_nl_search::core::config::Config;
use hybrid_nl_search::search::store::SqlStore;

pub fn run(config: &Config, seed: bool) -> Result<()> {
    let store = SqlStore::new(&config.database);

    let seeded = store
        .init_schema(seed)
        .with_context(|| format!("Failed to initialize {}", store.path().display()))?;

    println!(
        "{} Tables ready in {}",
        "✓".green(),
        store.path().display().to_string().cyan()
    );
    println!("  {} employees, departments, orders, products", "→".dimmed());

    if seeded {
        println!("{} Inserted demo rows", "✓".green());
        println!(
            "  {} Run {} to embed them",
            "→".dimmed(),
            "nlq backfill".cyan()
        );
    } else if seed {
        println!(
            "{} products already has rows, seed skipped",
            "!".yellow()
        );
    }

    Ok(())
}
