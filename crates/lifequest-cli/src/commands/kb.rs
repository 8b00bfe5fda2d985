//! Knowledge base inspection commands.

use clap::Subcommand;
use lifequest_core::{Config, KnowledgeBase};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum KbAction {
    /// Show rule and variable counts of the active knowledge base
    Info {
        /// Inspect this file instead of the configured knowledge base
        #[arg(long)]
        kb: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a knowledge base file (.toml or .json) without using it
    Validate {
        /// File to validate
        path: PathBuf,
    },
    /// Print the built-in knowledge base
    Dump,
}

pub fn run(action: KbAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        KbAction::Info { kb, json } => info(kb, json),
        KbAction::Validate { path } => {
            let kb = KnowledgeBase::load(&path)?;
            let summary = kb.summary();
            println!(
                "ok: {} rules, {} fuzzy rules, {} fuzzy variables",
                summary.rules, summary.fuzzy_rules, summary.fuzzy_variables
            );
            Ok(())
        }
        KbAction::Dump => {
            print!("{}", KnowledgeBase::builtin_source());
            Ok(())
        }
    }
}

fn info(path: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let kb = super::load_knowledge_base(path.as_deref(), &config)?;
    let summary = kb.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Rules:           {}", summary.rules);
    println!("Fuzzy rules:     {}", summary.fuzzy_rules);
    println!("Fuzzy variables: {}", summary.fuzzy_variables);
    println!(
        "Output variable: {}",
        summary.output_variable.as_deref().unwrap_or("-")
    );
    println!("List facts:      {}", summary.list_facts);
    Ok(())
}
