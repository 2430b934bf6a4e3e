//! Scenarios command - browse a scenario directory
//!
//! Usage:
//! ```bash
//! dialectic scenarios data/
//! dialectic scenarios data/ --level hard --label A --random --json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use dialectic_core::{ScenarioBank, ScenarioFilter};

use super::print_scenario;
use crate::print_warning;

/// Arguments for the scenarios command
#[derive(Args)]
pub struct ScenariosArgs {
    /// Directory of scenario JSON files
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Only list scenarios of this level
    #[arg(long)]
    level: Option<String>,

    /// Only list scenarios with this label
    #[arg(long)]
    label: Option<String>,

    /// Pick one matching scenario at random
    #[arg(long)]
    random: bool,

    /// Print scenarios as JSON
    #[arg(long)]
    json: bool,
}

/// Run the scenarios command
pub fn run(args: ScenariosArgs) -> Result<()> {
    let bank = ScenarioBank::load_dir(&args.dir)
        .with_context(|| format!("Failed to load scenarios from {}", args.dir.display()))?;
    let filter = ScenarioFilter::new(args.level.as_deref(), args.label.as_deref());

    if args.random {
        let Some(scenario) = bank.random(&filter) else {
            print_warning("No scenarios match the given filters");
            return Ok(());
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(scenario)?);
        } else {
            print_scenario(scenario);
        }
        return Ok(());
    }

    let filtered = bank.filter(&filter);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&filtered.scenarios)?);
        return Ok(());
    }

    println!("{}", "Scenarios".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!(
        "  {} {} of {}",
        "Matching:".dimmed(),
        filtered.filtered_count.to_string().green(),
        filtered.total_count
    );
    println!("  {} {}", "Levels:".dimmed(), bank.levels().join(", "));
    println!();

    for scenario in &filtered.scenarios {
        let level = if scenario.level.is_empty() {
            "-"
        } else {
            scenario.level.as_str()
        };
        println!(
            "  {} {} [{}] {}",
            "•".cyan(),
            scenario.id.green(),
            level,
            scenario.question
        );
    }
    Ok(())
}
