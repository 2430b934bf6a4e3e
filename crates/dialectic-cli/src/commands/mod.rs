//! Subcommands and the arguments they share

pub mod info;
pub mod prompt;
pub mod run;
pub mod scenarios;
pub mod validate;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use dialectic_core::{Message, Scenario, ScenarioBank, ScenarioFilter};
use dialectic_debate::{JudgeStyle, PromptSet};
use dialectic_llm::{ApiSetup, ChatMessage, DebaterModels, Role};

/// Where the scenario comes from
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Scenario JSON file (one object, or an array when combined with --id)
    #[arg(long, short = 's', value_name = "FILE", conflicts_with = "scenario_dir")]
    pub scenario: Option<PathBuf>,

    /// Directory of scenario JSON files; picks --id or a random match
    #[arg(long, value_name = "DIR")]
    pub scenario_dir: Option<PathBuf>,

    /// Scenario id to pick
    #[arg(long)]
    pub id: Option<String>,

    /// Only pick scenarios of this level
    #[arg(long)]
    pub level: Option<String>,

    /// Only pick scenarios with this label
    #[arg(long)]
    pub label: Option<String>,
}

impl ScenarioArgs {
    pub fn is_given(&self) -> bool {
        self.scenario.is_some() || self.scenario_dir.is_some()
    }

    pub fn resolve(&self) -> Result<Scenario> {
        let bank = match (&self.scenario, &self.scenario_dir) {
            (Some(path), _) => ScenarioBank::new(
                ScenarioBank::load_file(path)
                    .with_context(|| format!("Failed to load scenario: {}", path.display()))?,
            ),
            (None, Some(dir)) => ScenarioBank::load_dir(dir)
                .with_context(|| format!("Failed to load scenarios from {}", dir.display()))?,
            (None, None) => bail!("Pass --scenario <FILE> or --scenario-dir <DIR>"),
        };

        let scenario = match &self.id {
            Some(id) => bank
                .get(id)
                .with_context(|| format!("No scenario with id {}", id))?,
            None if bank.len() == 1 => &bank.all()[0],
            None => {
                let filter = ScenarioFilter::new(self.level.as_deref(), self.label.as_deref());
                bank.random(&filter)
                    .context("No scenarios match the given filters")?
            }
        };
        scenario.validate()?;
        Ok(scenario.clone())
    }
}

/// Credentials and role models
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// JSON file with {"apiKeys": {...}, "models": {...}}; the environment fills gaps
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Model for debater A
    #[arg(long, env = "DIALECTIC_DEBATER_A")]
    pub debater_a: Option<String>,

    /// Model for debater B
    #[arg(long, env = "DIALECTIC_DEBATER_B")]
    pub debater_b: Option<String>,

    /// Model for the judge
    #[arg(long, env = "DIALECTIC_JUDGE")]
    pub judge: Option<String>,
}

impl SetupArgs {
    pub fn resolve(&self) -> Result<ApiSetup> {
        let env = ApiSetup::from_env();
        let mut setup = match &self.setup {
            Some(path) => ApiSetup::from_file(path)
                .with_context(|| format!("Failed to load setup: {}", path.display()))?
                .merge_missing(&env),
            None => env,
        };

        let DebaterModels {
            debater_a,
            debater_b,
            judge,
        } = &mut setup.models;
        for (slot, flag) in [
            (debater_a, &self.debater_a),
            (debater_b, &self.debater_b),
            (judge, &self.judge),
        ] {
            if let Some(model) = flag {
                *slot = model.clone();
            }
        }
        Ok(setup)
    }
}

/// Load prompt overrides, or the built-in set
pub fn load_prompts(path: Option<&PathBuf>) -> Result<PromptSet> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompts: {}", path.display()))?;
            PromptSet::from_json(&raw).with_context(|| "Failed to parse prompts JSON")
        }
        None => Ok(PromptSet::default()),
    }
}

/// Judge instructions
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum JudgeStyleArg {
    Standard,
    Evidence,
}

impl From<JudgeStyleArg> for JudgeStyle {
    fn from(arg: JudgeStyleArg) -> Self {
        match arg {
            JudgeStyleArg::Standard => JudgeStyle::Standard,
            JudgeStyleArg::Evidence => JudgeStyle::EvidenceWeighing,
        }
    }
}

pub fn print_scenario(scenario: &Scenario) {
    let positions = scenario.positions();
    println!("{} {}", "Scenario:".bold(), scenario.id.cyan());
    if !scenario.level.is_empty() {
        println!("  {} {}", "Level:".dimmed(), scenario.level);
    }
    println!("  {} {}", "Question:".dimmed(), scenario.question);
    println!(
        "  {} {}  {} {}",
        "A defends:".dimmed(),
        positions.defending.green(),
        "B defends:".dimmed(),
        positions.opposing.yellow()
    );
}

/// One transcript message: header line then the public argument
pub fn print_message(message: &Message, show_thinking: bool) {
    let header = format!("[{}] {} ({})", message.round, message.name, message.model);
    println!("{}", header.bold());
    if show_thinking && message.content_thinking != message.content_argument {
        println!("  {} {}", "thinking:".dimmed(), message.content_thinking.dimmed());
    }
    println!("{}", message.content_argument);
    println!();
}

pub fn print_chat(messages: &[ChatMessage]) {
    for message in messages {
        let role = match message.role {
            Role::System => "SYSTEM".magenta(),
            Role::User => "USER".cyan(),
            Role::Assistant => "ASSISTANT".green(),
        };
        println!("{}", format!("── {} ──", role).bold());
        println!("{}", message.content);
        println!();
    }
}
