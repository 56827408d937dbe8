//! Ask command - natural language question answered through generated SQL

use anyhow::Result;
use colored::Colorize;

use hybrid_nl_search::core::config::Config;
use hybrid_nl_search::core::error::QueryError;
use hybrid_nl_search::search::engine::QueryEngine;

use super::output::{print_heading, print_json, print_result_set};

pub fn run(config: &Config, question: &str, json: bool) -> Result<()> {
    if question.trim().is_empty() {
        println!("{} Please type a question first", "!".yellow());
        return Ok(());
    }

    let engine = QueryEngine::from_config(config)?;

    match engine.ask(question) {
        Ok(answer) => {
            if json {
                return print_json(&answer);
            }
            print_heading("Generated SQL");
            println!("{}", answer.sql.cyan());
            println!();
            print_result_set("Results (NL → SQL)", &answer.results);
            Ok(())
        }
        Err(QueryError::UnsafeStatement(sql)) => {
            if json {
                print_json(&serde_json::json!({
                    "sql": sql,
                    "error": "Only SELECT queries are allowed",
                }))?;
            } else {
                print_heading("Generated SQL");
                println!("{}", sql.cyan());
                println!();
                eprintln!("{} Only SELECT queries are allowed", "✗".red().bold());
            }
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
