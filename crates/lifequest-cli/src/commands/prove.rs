//! Goal proving through backward chaining.

use clap::Args;
use lifequest_core::{BackwardChainer, Config, Fact, FactValue, InferenceSession};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProveArgs {
    /// Fact name to prove
    pub goal: String,
    /// Seed fact as name=value or name=value@confidence (repeatable)
    #[arg(long = "fact", value_name = "NAME=VALUE[@CF]")]
    pub facts: Vec<String>,
    /// Knowledge base to use instead of the configured one
    #[arg(long)]
    pub kb: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ProveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let kb = super::load_knowledge_base(args.kb.as_deref(), &config)?;

    let mut session = InferenceSession::new(&kb);
    for raw in &args.facts {
        session.observe(parse_fact(raw)?);
    }

    let result = BackwardChainer::new(&kb)
        .with_max_depth(config.engine.max_depth)
        .prove(&mut session, &args.goal);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for step in &result.trail {
        println!("{step}");
    }
    println!();
    if result.proved {
        let value = session
            .facts()
            .get(&args.goal)
            .map(|f| format!("{} (CF {:.2})", f.value, f.confidence))
            .unwrap_or_default();
        println!("proved: {} = {value}", result.goal);
    } else {
        println!("not proved: {}", result.goal);
    }
    Ok(())
}

/// `name=value[@cf]`; a suffix that is not a number stays part of the value.
fn parse_fact(raw: &str) -> Result<Fact, String> {
    let (name, rest) = super::split_assignment(raw)?;
    let (value, confidence) = match rest.rsplit_once('@') {
        Some((value, cf)) => match cf.trim().parse::<f64>() {
            Ok(cf) if (0.0..=1.0).contains(&cf) => (value.trim(), cf),
            Ok(cf) => return Err(format!("confidence {cf} in '{raw}' is outside 0..=1")),
            Err(_) => (rest, 1.0),
        },
        None => (rest, 1.0),
    };
    Ok(Fact::new(name, FactValue::parse_literal(value), confidence))
}
