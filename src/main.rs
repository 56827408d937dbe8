mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use hybrid_nl_search::core::config::Config;
use hybrid_nl_search::core::logging::init_tracing;

#[derive(Parser)]
#[command(name = "nlq")]
#[command(about = "Ask a product database questions in plain language", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, env = "NLQ_CONFIG", help = "Config file (default: ./nlq.yaml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, env = "NLQ_DATABASE", help = "SQLite database file")]
    db: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output (-v, -vv)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the demo tables
    Init {
        #[arg(long, help = "Insert demo rows when products is empty")]
        seed: bool,
    },

    /// Answer a question with generated SQL
    Ask {
        #[arg(required = true, num_args = 1.., help = "Question, e.g. show me products cheaper than 100")]
        question: Vec<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    /// Semantic product search using embeddings
    #[command(alias = "ss")]
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, help = "Max price (0 = no limit)")]
        max_price: Option<f64>,
        #[arg(long, short, allow_negative_numbers = true, help = "Limit results")]
        limit: Option<i64>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    /// Compute embeddings for products and order customers
    Backfill {
        #[arg(long, help = "Show embedding coverage only")]
        status: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} Query failed", "✗".red().bold());
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(db) = cli.db {
        config.database = db;
    }

    match cli.command {
        Commands::Init { seed } => commands::init::run(&config, seed),
        Commands::Ask { question, json } => commands::ask::run(&config, &question.join(" "), json),
        Commands::Search {
            query,
            max_price,
            limit,
            json,
        } => commands::semantic_search::run(&config, &query.join(" "), max_price, limit, json),
        Commands::Backfill { status, json } => commands::backfill::run(&config, status, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_args() {
        let cli = Cli::try_parse_from([
            "nlq", "--db", "shop.db", "search", "quiet", "headphones", "--max-price", "300", "-l", "3",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("shop.db")));
        match cli.command {
            Commands::Search {
                query,
                max_price,
                limit,
                json,
            } => {
                assert_eq!(query.join(" "), "quiet headphones");
                assert_eq!(max_price, Some(300.0));
                assert_eq!(limit, Some(3));
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["nlq", "-v", "ask", "cheapest", "product", "--json"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ask { question, json } => {
                assert_eq!(question.join(" "), "cheapest product");
                assert!(json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["nlq", "ask"]).is_err());
    }
}
