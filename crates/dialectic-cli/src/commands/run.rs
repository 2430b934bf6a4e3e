//! Run command - baseline, structured rounds, optional free-form exchange, judgment
//!
//! Usage:
//! ```bash
//! dialectic run --scenario s.json --debater-a gpt-4o --debater-b gpt-4o-mini --judge o1
//! dialectic run --scenario-dir data/ --level hard --rounds 5 --export debate.json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use dialectic_core::Side;
use dialectic_debate::{round_label, DebateConfig, DebateOrchestrator};
use dialectic_llm::ModelGateway;

use super::{
    load_prompts, print_message, print_scenario, JudgeStyleArg, ScenarioArgs, SetupArgs,
};
use crate::{print_error, print_info, print_success, print_warning};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[command(flatten)]
    setup: SetupArgs,

    /// Structured rounds to run (clamped to 1..=8)
    #[arg(long, short = 'r', default_value_t = 3)]
    rounds: u32,

    /// Word limit quoted to debaters
    #[arg(long, default_value_t = 150)]
    word_limit: u32,

    /// Prompt overrides (JSON, partial allowed)
    #[arg(long, value_name = "FILE")]
    prompts: Option<PathBuf>,

    /// Judge instructions
    #[arg(long, value_enum, default_value_t = JudgeStyleArg::Standard)]
    judge_style: JudgeStyleArg,

    /// Skip the no-debate baseline answers
    #[arg(long)]
    no_baseline: bool,

    /// Also run this many free-form exchanges
    #[arg(long, default_value_t = 0)]
    unstructured: u32,

    /// Show debaters' private thinking
    #[arg(long)]
    show_thinking: bool,

    /// Write the full debate record to this file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let scenario = args.scenario.resolve()?;
    let setup = args.setup.resolve()?;
    setup.verify().context("Model setup is incomplete")?;

    let config = DebateConfig {
        word_limit: args.word_limit,
        unstructured_exchanges: args.unstructured,
        ..DebateConfig::default()
    };
    let prompts = load_prompts(args.prompts.as_ref())?;
    let gateway = Arc::new(ModelGateway::from_setup(&setup));
    let debate = DebateOrchestrator::with_config(
        gateway,
        scenario.clone(),
        setup.models.clone(),
        config,
        prompts,
    )?;
    let rounds = debate.set_max_rounds(args.rounds).await;
    if rounds != args.rounds {
        print_warning(&format!("Round count clamped to {}", rounds));
    }

    tracing::info!(scenario = %scenario.id, rounds, "Starting debate");
    print_scenario(&scenario);
    println!();

    if !args.no_baseline {
        println!("{}", "Baseline".bold().cyan());
        println!("{}", "═".repeat(40).cyan());
        for (model, result) in debate.fetch_all_baselines().await {
            match result {
                Ok(message) => {
                    print_message(&message, args.show_thinking);
                    match message.answer_label() {
                        Some(label) => print_info(&format!(
                            "{} answered {} ({})",
                            model,
                            label,
                            scenario.answer_for_label(&label).unwrap_or("not an option")
                        )),
                        None => print_warning(&format!("{}: no 'Answer:' line", model)),
                    }
                    println!();
                }
                Err(e) => print_error(&format!("{}: {}", model, e)),
            }
        }
    }

    println!("{}", "Structured debate".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    let mut round = 1;
    loop {
        println!("{}", round_label(round).bold());
        let produced = debate
            .run_round(round)
            .await
            .with_context(|| format!("{} failed; rerun to retry", round_label(round)))?;
        for message in &produced {
            print_message(message, args.show_thinking);
        }
        if !debate.next_round().await {
            break;
        }
        round += 1;
    }
    print_success(&format!("Completed {} rounds", rounds));
    println!();

    if args.unstructured > 0 {
        println!("{}", "Unstructured debate".bold().cyan());
        println!("{}", "═".repeat(40).cyan());
        for _ in 0..args.unstructured {
            for message in debate.run_exchange().await? {
                print_message(&message, args.show_thinking);
            }
        }
    }

    println!("{}", "Judgment".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    let judgement = debate.judge(args.judge_style.into()).await?;
    println!("{}", judgement.content);
    println!();
    match judgement.verdict {
        Some(side) => {
            let correct = side == Side::A;
            let line = format!(
                "Judge chose {} ({})",
                side,
                scenario.positions().answer_for(side)
            );
            if correct {
                print_success(&format!("{}: correct", line));
            } else {
                print_warning(&format!("{}: incorrect", line));
            }
        }
        None => print_warning("No 'Answer:' line in the judgment"),
    }

    if let Some(path) = args.export {
        let record = debate.export().await;
        let json = record.to_json_pretty()?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        print_info(&format!("Debate record written to {}", path.display()));
    }

    Ok(())
}
