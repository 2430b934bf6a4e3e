//! Info command - model catalog and configuration
//!
//! Usage:
//! ```bash
//! dialectic info
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use dialectic_llm::{ApiSetup, ProviderKind};

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs;

/// Run the info command
pub fn run(_args: InfoArgs) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let setup = ApiSetup::from_env();

    println!("{}", "Dialectic - evidence-blind LLM debates".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!();

    println!("{}", "Version Information:".bold());
    println!("  {} {}", "CLI Version:".dimmed(), version.green());
    println!();

    println!("{}", "Providers:".bold());
    for kind in ProviderKind::ALL {
        let status = if setup.is_configured(kind) {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {} {}",
            status,
            kind.to_string().bold(),
            format!("({})", kind.env_var()).dimmed()
        );
        for model in kind.models() {
            println!("      {} {}", "•".cyan(), model);
        }
    }
    println!();

    println!("{}", "Assigned Models:".bold());
    let models = &setup.models;
    for (role, model) in [
        ("Debater A:", &models.debater_a),
        ("Debater B:", &models.debater_b),
        ("Judge:", &models.judge),
    ] {
        let shown = if model.is_empty() {
            "(unset)".yellow()
        } else {
            model.green()
        };
        println!("  {} {}", role.dimmed(), shown);
    }
    println!();

    println!("{}", "Configuration:".bold());
    println!(
        "  {} Set DIALECTIC_DEBATER_A, DIALECTIC_DEBATER_B and DIALECTIC_JUDGE, or pass --setup",
        "ℹ".blue()
    );
    println!();

    Ok(())
}
