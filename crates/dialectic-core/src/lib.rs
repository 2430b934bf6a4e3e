//! # dialectic core
//!
//! Core types for running structured debates between LLM debaters:
//! - [`Scenario`] - The immutable debate subject (evidence, question, answers)
//! - [`Message`] / [`Transcript`] - Append-only utterances, grouped per phase
//! - [`JudgeScenario`] - The evidence-free projection shown to the judge
//! - [`validate_citations`] - Verifies `<quote>` spans against the evidence
//! - [`extract_arguments`] / [`extract_thinking`] - Tag-scoped output parsing
//! - [`ScenarioBank`] - Filterable scenario source
//! - [`DebateRecord`] - Self-describing export of a finished debate
//!
//! ## Quick Start
//!
//! ```rust
//! use dialectic_core::{extract_arguments, validate_citations};
//!
//! let situation = "The cat sat on the mat.";
//! let raw = "<argument>As stated, <quote>cat sat</quote>.</argument>";
//!
//! let checked = validate_citations(raw, situation);
//! assert_eq!(extract_arguments(&checked), "As stated, <v_quote>cat sat</v_quote>.");
//! ```

pub mod bank;
pub mod citation;
pub mod extract;
pub mod message;
pub mod record;
pub mod scenario;

pub use bank::{BankError, FilteredScenarios, ScenarioBank, ScenarioFilter};
pub use citation::{check_quotes, normalize, validate_citations, QuoteCheck};
pub use extract::{
    extract_arguments, extract_quotes, extract_tag_content, extract_thinking, parse_answer_label,
    segments, Segment, SegmentKind,
};
pub use message::{
    format_debate_history, Alignment, Message, Side, Transcript, BASELINE_ROUND, JUDGE_ROUND,
};
pub use record::{DebateRecord, Judgement, RecordedModels};
pub use scenario::{JudgeScenario, Positions, Scenario, ScenarioError};
