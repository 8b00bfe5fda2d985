use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lifequest-cli", version, about = "LifeQuest reasoner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a user snapshot and print recommendations
    Analyze(commands::analyze::AnalyzeArgs),
    /// Try to prove a goal fact by backward chaining
    Prove(commands::prove::ProveArgs),
    /// Evaluate the fuzzy advice priority for crisp inputs
    Fuzzy(commands::fuzzy::FuzzyArgs),
    /// Knowledge base inspection
    Kb {
        #[command(subcommand)]
        action: commands::kb::KbAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Prove(args) => commands::prove::run(args),
        Commands::Fuzzy(args) => commands::fuzzy::run(args),
        Commands::Kb { action } => commands::kb::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
