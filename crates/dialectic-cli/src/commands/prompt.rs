//! Prompt command - render the messages a role would be sent
//!
//! Usage:
//! ```bash
//! dialectic prompt --scenario s.json --role debater-a
//! dialectic prompt --scenario s.json --role judge --record debate.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use dialectic_core::{DebateRecord, JudgeScenario, Side, Transcript};
use dialectic_debate::{DebateConfig, PromptGenerator};

use super::{load_prompts, print_chat, JudgeStyleArg, ScenarioArgs};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PromptRole {
    Baseline,
    DebaterA,
    DebaterB,
    Judge,
    UnstructuredA,
    UnstructuredB,
}

/// Arguments for the prompt command
#[derive(Args)]
pub struct PromptArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Role whose prompt to render
    #[arg(long, value_enum)]
    role: PromptRole,

    /// Debate round for debater prompts
    #[arg(long, default_value_t = 1)]
    round: u32,

    /// Exported debate record supplying the transcript so far
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Judge instructions
    #[arg(long, value_enum, default_value_t = JudgeStyleArg::Standard)]
    judge_style: JudgeStyleArg,

    /// Word limit quoted to debaters
    #[arg(long, default_value_t = 150)]
    word_limit: u32,

    /// Prompt overrides (JSON, partial allowed)
    #[arg(long, value_name = "FILE")]
    prompts: Option<PathBuf>,
}

/// Run the prompt command
pub fn run(args: PromptArgs) -> Result<()> {
    let record = args
        .record
        .as_ref()
        .map(|path| -> Result<DebateRecord> {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read record: {}", path.display()))?;
            DebateRecord::from_json(&raw).with_context(|| "Failed to parse debate record")
        })
        .transpose()?;

    // A record carries its scenario unless one is named explicitly
    let scenario = match &record {
        Some(record) if !args.scenario.is_given() => record.scenario.clone(),
        _ => args.scenario.resolve()?,
    };

    let config = DebateConfig {
        word_limit: args.word_limit,
        ..DebateConfig::default()
    };
    let generator = PromptGenerator::new(load_prompts(args.prompts.as_ref())?, &config);

    let empty = Transcript::new();
    let structured = record.as_ref().map_or(&empty, |r| &r.structured);
    let unstructured = record.as_ref().map_or(&empty, |r| &r.unstructured);

    let messages = match args.role {
        PromptRole::Baseline => generator.baseline(&scenario),
        PromptRole::DebaterA => generator.debater(&scenario, structured, Side::A, args.round),
        PromptRole::DebaterB => generator.debater(&scenario, structured, Side::B, args.round),
        PromptRole::Judge => generator.judge(
            &JudgeScenario::from_scenario(&scenario),
            structured,
            args.judge_style.into(),
        ),
        PromptRole::UnstructuredA => generator.unstructured(&scenario, unstructured, Side::A),
        PromptRole::UnstructuredB => generator.unstructured(&scenario, unstructured, Side::B),
    };

    print_chat(&messages);
    Ok(())
}
