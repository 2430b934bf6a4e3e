//! Validate command - check the quotes in a model response
//!
//! Usage:
//! ```bash
//! dialectic validate --scenario s.json --response reply.txt
//! cat reply.txt | dialectic validate --scenario s.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;

use dialectic_core::{check_quotes, extract_arguments, segments, validate_citations, SegmentKind};

use super::ScenarioArgs;
use crate::{print_success, print_warning};

/// Arguments for the validate command
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Response text file; reads stdin when omitted
    #[arg(long, short = 'f', value_name = "FILE")]
    response: Option<PathBuf>,

    /// Print only the checked argument
    #[arg(long)]
    argument_only: bool,
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> Result<()> {
    let scenario = args.scenario.resolve()?;
    let response = match &args.response {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read response: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read response from stdin")?;
            buf
        }
    };

    let checked = validate_citations(&response, &scenario.situation);
    if args.argument_only {
        println!("{}", extract_arguments(&checked));
        return Ok(());
    }

    for segment in segments(&checked) {
        let label = match segment.kind {
            SegmentKind::Thinking => "thinking".dimmed(),
            SegmentKind::Argument => "argument".green(),
            SegmentKind::Text => "text".normal(),
        };
        println!("{} {}", format!("[{}]", label).bold(), segment.content);
    }
    println!();

    let quotes = check_quotes(&response, &scenario.situation);
    if quotes.is_empty() {
        print_warning("No <quote> tags found");
        return Ok(());
    }
    let verified = quotes.iter().filter(|q| q.verified).count();
    for quote in &quotes {
        if quote.verified {
            println!("  {} {}", "✓".green(), quote.quote);
        } else {
            println!("  {} {}", "✗".red(), quote.quote);
        }
    }
    println!();
    if verified == quotes.len() {
        print_success(&format!("All {} quotes verified", verified));
    } else {
        print_warning(&format!("{} of {} quotes verified", verified, quotes.len()));
    }
    Ok(())
}
