//! Fuzzy advice priority for ad-hoc inputs.

use clap::Args;
use lifequest_core::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct FuzzyArgs {
    /// Crisp input as name=value (repeatable), e.g. --input stress=9
    #[arg(long = "input", value_name = "NAME=VALUE")]
    pub inputs: Vec<String>,
    /// Knowledge base to use instead of the configured one
    #[arg(long)]
    pub kb: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FuzzyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = args
        .inputs
        .iter()
        .map(|raw| parse_input(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let config = Config::load()?;
    let kb = super::load_knowledge_base(args.kb.as_deref(), &config)?;
    let outcome = kb.fuzzy().evaluate(inputs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let Some(outcome) = outcome else {
        println!("No fuzzy rule triggered.");
        return Ok(());
    };

    println!("Crisp score:    {:.2}", outcome.crisp_score);
    println!("Strongest set:  {}", outcome.strongest_set);
    for (set, activation) in &outcome.aggregated {
        println!("  {set}: {activation:.4}");
    }
    println!();
    println!("Advice:");
    for advice in &outcome.advice {
        println!("  {:.2}  {}", advice.confidence, advice.text);
    }
    Ok(())
}

fn parse_input(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = super::split_assignment(raw)?;
    let value = value
        .parse::<f64>()
        .map_err(|_| format!("input '{name}' needs a number, got '{value}'"))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("stress = 9").unwrap(), ("stress".to_string(), 9.0));
        assert!(parse_input("stress=high").is_err());
    }
}
