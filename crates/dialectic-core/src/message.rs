//! Messages and per-phase transcripts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::citation::validate_citations;
use crate::extract::{extract_arguments, extract_thinking, parse_answer_label};

/// Round number carried by baseline (non-debate) responses
pub const BASELINE_ROUND: i32 = 0;

/// Round number carried by judge output
pub const JUDGE_ROUND: i32 = -1;

/// Logical debater identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Both sides in speaking order
    pub const ORDER: [Side; 2] = [Side::A, Side::B];

    /// Name used in prompts and transcripts
    pub fn name(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }

    /// The other debater
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Rendering side: A on the left, B on the right
    pub fn alignment(self) -> Alignment {
        match self {
            Side::A => Alignment::Left,
            Side::B => Alignment::Right,
        }
    }

    /// Parse a judge verdict letter
    pub fn from_letter(letter: &str) -> Option<Side> {
        match letter.trim() {
            "A" | "a" => Some(Side::A),
            "B" | "b" => Some(Side::B),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a message is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// One utterance. Never mutated once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 0 = baseline, >0 = debate round, -1 = judge
    pub round: i32,
    /// "A"/"B" for debaters, the model id for baseline responses
    pub name: String,
    /// Rendering side
    pub side: Alignment,
    /// Model that produced the text
    pub model: String,
    /// Raw model output including structural tags
    pub content: String,
    /// Text inside `<thinking>` tags (whole output when untagged)
    pub content_thinking: String,
    /// Text inside `<argument>` tags after citation checks (whole output when untagged)
    pub content_argument: String,
}

impl Message {
    /// Build a debater message: quotes are checked against the evidence
    /// before the public argument is extracted.
    pub fn debater(side: Side, round: i32, model: &str, raw: &str, situation: &str) -> Self {
        let checked = validate_citations(raw, situation);
        Self {
            round,
            name: side.name().to_string(),
            side: side.alignment(),
            model: model.to_string(),
            content: raw.to_string(),
            content_thinking: extract_thinking(raw),
            content_argument: extract_arguments(&checked),
        }
    }

    /// Build a baseline response, keyed by model
    pub fn baseline(model: &str, raw: &str) -> Self {
        Self {
            round: BASELINE_ROUND,
            name: model.to_string(),
            side: Alignment::Left,
            model: model.to_string(),
            content: raw.to_string(),
            content_thinking: extract_thinking(raw),
            content_argument: raw.trim().to_string(),
        }
    }

    /// Build the judge's message
    pub fn judge(model: &str, raw: &str) -> Self {
        Self {
            round: JUDGE_ROUND,
            name: "Judge".to_string(),
            side: Alignment::Left,
            model: model.to_string(),
            content: raw.to_string(),
            content_thinking: extract_thinking(raw),
            content_argument: raw.trim().to_string(),
        }
    }

    /// Letter from the final `Answer:` line, for baseline and judge output
    pub fn answer_label(&self) -> Option<String> {
        parse_answer_label(&self.content)
    }

    /// Whether this message belongs to a debate round
    pub fn is_debate_turn(&self) -> bool {
        self.round > 0
    }

    /// The debater that wrote this message, if any
    pub fn speaker(&self) -> Option<Side> {
        if !self.is_debate_turn() {
            return None;
        }
        Side::from_letter(&self.name)
    }
}

/// Ordered, append-only message list for one debate phase.
///
/// Insertion order is turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// All messages carrying a round number
    pub fn messages_for_round(&self, round: i32) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.round == round).collect()
    }

    /// The message a debater wrote in a round
    pub fn message_for(&self, round: i32, side: Side) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.round == round && m.speaker() == Some(side))
    }

    /// A round is complete once exactly two messages, one per side, carry its number
    pub fn is_round_complete(&self, round: i32) -> bool {
        let in_round = self.messages_for_round(round);
        in_round.len() == 2
            && Side::ORDER
                .iter()
                .all(|side| in_round.iter().any(|m| m.speaker() == Some(*side)))
    }

    /// Highest debate round with any message (at least 1)
    pub fn highest_round(&self) -> i32 {
        self.messages
            .iter()
            .filter(|m| m.is_debate_turn())
            .map(|m| m.round)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// The baseline response a model already gave
    pub fn baseline_from(&self, model: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.round == BASELINE_ROUND && m.model == model)
    }

    /// Render the debate history injected into later prompts
    pub fn format_history(&self) -> String {
        format_debate_history(&self.messages)
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Debate turns as `"{name}: {content_argument}"`, blank-line separated.
///
/// Baseline and judge messages are skipped, and only the extracted public
/// argument is shown, never the private thinking.
pub fn format_debate_history(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| m.is_debate_turn())
        .map(|m| format!("{}: {}", m.name, m.content_argument))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITUATION: &str = "The cat sat on the mat.";

    fn turn(side: Side, round: i32, raw: &str) -> Message {
        Message::debater(side, round, "mock", raw, SITUATION)
    }

    #[test]
    fn test_side_alignment() {
        assert_eq!(Side::A.alignment(), Alignment::Left);
        assert_eq!(Side::B.alignment(), Alignment::Right);
        assert_eq!(Side::A.opponent(), Side::B);
    }

    #[test]
    fn test_debater_message_postprocessing() {
        let raw = "<thinking>plan</thinking><argument>See <quote>cat sat</quote> and <quote>dog sat</quote></argument>";
        let msg = turn(Side::B, 2, raw);

        assert_eq!(msg.content, raw);
        assert_eq!(msg.content_thinking, "plan");
        assert_eq!(
            msg.content_argument,
            "See <v_quote>cat sat</v_quote> and <u_quote>dog sat</u_quote>"
        );
        assert_eq!(msg.side, Alignment::Right);
        assert_eq!(msg.speaker(), Some(Side::B));
    }

    #[test]
    fn test_round_completion_needs_both_sides() {
        let mut transcript = Transcript::new();
        transcript.push(turn(Side::A, 1, "a1"));
        assert!(!transcript.is_round_complete(1));

        transcript.push(turn(Side::A, 1, "a1 again"));
        assert!(!transcript.is_round_complete(1));

        let mut transcript = Transcript::new();
        transcript.push(turn(Side::A, 1, "a1"));
        transcript.push(turn(Side::B, 1, "b1"));
        assert!(transcript.is_round_complete(1));
        assert_eq!(transcript.messages_for_round(1).len(), 2);
        assert_eq!(transcript.highest_round(), 1);
    }

    #[test]
    fn test_history_excludes_baseline_and_judge() {
        let mut transcript = Transcript::new();
        transcript.push(Message::baseline("gpt-4o", "Answer: A"));
        transcript.push(turn(Side::A, 1, "<thinking>secret</thinking><argument>first</argument>"));
        transcript.push(turn(Side::B, 1, "untagged reply"));
        transcript.push(Message::judge("judge-model", "Answer: B"));

        assert_eq!(transcript.format_history(), "A: first\n\nB: untagged reply");
        assert!(!transcript.format_history().contains("secret"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(Transcript::new().format_history(), "");
        assert_eq!(Transcript::new().highest_round(), 1);
    }
}
