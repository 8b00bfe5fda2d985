//! Full user analysis.

use clap::Args;
use lifequest_core::analysis::AnalysisReport;
use lifequest_core::{AnalysisService, Config, UserSnapshot};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Snapshot JSON file (reads stdin when omitted)
    ///
    /// ```text
    /// { "level": 3, "tasks_completed_today": 0, "stress_level": 8, "sitting_hours": 7 }
    /// ```
    pub snapshot: Option<PathBuf>,
    /// Knowledge base to use instead of the configured one
    #[arg(long)]
    pub kb: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &args.snapshot {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let snapshot: UserSnapshot = serde_json::from_str(&source)?;

    let config = Config::load()?;
    let service = match args.kb.as_deref() {
        Some(path) => {
            let kb = super::load_knowledge_base(Some(path), &config)?;
            AnalysisService::with_config(Arc::new(kb), &config)
        }
        None => AnalysisService::from_config(&config)?,
    };
    let report = service.analyze(&snapshot);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    match &report.status {
        Some(status) => println!("Status: {status}"),
        None => println!("Status: unknown"),
    }

    if let Some(fuzzy) = &report.fuzzy {
        println!(
            "Advice priority: {:.1} ({}, {:?})",
            fuzzy.crisp_score, fuzzy.strongest_set, report.recommendations.priority
        );
    }

    let recommendations: Vec<_> = report.recommendations.iter().collect();
    if !recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in recommendations {
            println!(
                "  [{}] {} ({:.0}%)",
                rec.category,
                rec.message,
                rec.confidence * 100.0
            );
        }
    }

    if !report.quests.is_empty() {
        println!();
        println!("Quests:");
        for quest in &report.quests {
            let marker = if quest.suggested { " *" } else { "" };
            println!(
                "  {}{} ({:?}, {} XP)",
                quest.name, marker, quest.difficulty, quest.xp_reward
            );
        }
    }

    if !report.notifications.is_empty() {
        println!();
        println!("Notifications:");
        for note in &report.notifications {
            println!("  {}", note.message);
        }
    }

    println!();
    println!(
        "Rules fired: {} in {} rounds, {} new facts",
        report.analytics.rules_fired.len(),
        report.analytics.rounds,
        report.analytics.new_facts
    );
}
