//! Dialectic CLI - run and inspect evidence-blind LLM debates
//!
//! # Usage
//!
//! ```bash
//! # Run baseline, three structured rounds and a judgment
//! dialectic run --scenario scenario.json --debater-a gpt-4o --debater-b deepseek-chat --judge gpt-4o-mini
//!
//! # Show the exact prompt a role would receive
//! dialectic prompt --scenario scenario.json --role debater-b --round 2
//!
//! # Check the quotes in a model response
//! dialectic validate --scenario scenario.json --response reply.txt
//!
//! # Browse a scenario directory
//! dialectic scenarios data/ --level hard --random
//!
//! # Show the model catalog and configured providers
//! dialectic info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{info, prompt, run, scenarios, validate};

/// Dialectic - structured debates between language models
///
/// Two debaters argue opposite answers with access to a private situation;
/// a judge who never sees the situation picks the winner.
#[derive(Parser)]
#[command(
    name = "dialectic",
    version,
    about = "Dialectic CLI - evidence-blind LLM debates",
    long_about = "Dialectic runs structured debates between language models.\n\n\
                  Debaters cite the situation with <quote> tags; every quote is\n\
                  checked before the judge, who never sees the situation, decides."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate end to end
    #[command(name = "run")]
    Run(run::RunArgs),

    /// Render the prompt a role would receive
    #[command(name = "prompt")]
    Prompt(prompt::PromptArgs),

    /// Validate the quotes in a response against a scenario
    #[command(name = "validate")]
    Validate(validate::ValidateArgs),

    /// List, filter or pick scenarios from a directory
    #[command(name = "scenarios")]
    Scenarios(scenarios::ScenariosArgs),

    /// Show the model catalog and configuration
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Prompt(args) => prompt::run(args),
        Commands::Validate(args) => validate::run(args),
        Commands::Scenarios(args) => scenarios::run(args),
        Commands::Info(args) => info::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
