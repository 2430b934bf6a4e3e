//! Judgments and the exportable debate record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::{extract_thinking, parse_answer_label};
use crate::message::{Message, Side, Transcript};
use crate::scenario::{Positions, Scenario};

/// Final decision on a debate, from a judge model or a human
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    /// Judge model id; `None` for a human judgment
    pub model: Option<String>,
    /// Full judgment text
    pub content: String,
    /// Reasoning extracted from `<thinking>` tags
    pub thinking: String,
    /// Winning side parsed from the `Answer:` line
    pub verdict: Option<Side>,
    /// The judge's round -1 message; `None` for a human judgment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    pub created_at: DateTime<Utc>,
}

impl Judgement {
    /// Parse a judge model's raw output
    pub fn from_model(model: &str, raw: &str) -> Self {
        Self {
            model: Some(model.to_string()),
            content: raw.to_string(),
            thinking: extract_thinking(raw),
            verdict: parse_answer_label(raw).and_then(|l| Side::from_letter(&l)),
            message: Some(Message::judge(model, raw)),
            created_at: Utc::now(),
        }
    }

    /// Record a human judgment verbatim
    pub fn human(text: &str) -> Self {
        Self {
            model: None,
            content: text.to_string(),
            thinking: String::new(),
            verdict: parse_answer_label(text).and_then(|l| Side::from_letter(&l)),
            message: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.model.is_none()
    }
}

/// Models assigned to each role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedModels {
    pub debater_a: String,
    pub debater_b: String,
    pub judge: String,
}

/// Self-describing dump of one debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub scenario: Scenario,
    pub positions: Positions,
    pub models: RecordedModels,
    pub baseline: Transcript,
    pub structured: Transcript,
    pub unstructured: Transcript,
    pub judgement: Option<Judgement>,
}

impl DebateRecord {
    /// Start a record for a scenario; transcripts are filled in by the caller
    pub fn new(scenario: Scenario, models: RecordedModels) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            positions: scenario.positions(),
            scenario,
            models,
            baseline: Transcript::new(),
            structured: Transcript::new(),
            unstructured: Transcript::new(),
            judgement: None,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether the judge picked the side defending the ground truth
    pub fn judge_was_correct(&self) -> Option<bool> {
        self.judgement
            .as_ref()
            .and_then(|j| j.verdict)
            .map(|side| side == Side::A)
    }
}
