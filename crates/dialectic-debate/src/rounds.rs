//! Round/stage state machine
//!
//! Pure bookkeeping: which round may run, which sides still owe a message,
//! when the debate is over. The orchestrator drives it and owns the I/O.

use std::fmt;

use dialectic_core::{Message, Side, Transcript};

use crate::config::DebateConfig;
use crate::error::DebateError;

/// Why a round cannot run right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundBlock {
    /// Rounds start at 1
    NoSuchRound,
    PreviousIncomplete,
    AlreadyComplete,
    Generating,
    ModelsUnassigned,
    BeyondMax { max_rounds: u32 },
}

impl fmt::Display for RoundBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundBlock::NoSuchRound => write!(f, "rounds are numbered from 1"),
            RoundBlock::PreviousIncomplete => write!(f, "the previous round is not complete"),
            RoundBlock::AlreadyComplete => write!(f, "the round is already complete"),
            RoundBlock::Generating => write!(f, "a generation is in progress"),
            RoundBlock::ModelsUnassigned => write!(f, "both debater models must be assigned"),
            RoundBlock::BeyondMax { max_rounds } => {
                write!(f, "the debate is limited to {} rounds", max_rounds)
            }
        }
    }
}

impl RoundBlock {
    pub fn into_error(self, round: u32) -> DebateError {
        match self {
            RoundBlock::Generating => DebateError::Busy,
            other => DebateError::RoundNotRunnable {
                round,
                reason: other.to_string(),
            },
        }
    }
}

/// `Round r` label for UIs
pub fn round_label(round: u32) -> String {
    format!("Round {}", round)
}

fn as_message_round(round: u32) -> i32 {
    i32::try_from(round).unwrap_or(i32::MAX)
}

/// Sides that have not spoken in a round, in speaking order
fn missing_sides(transcript: &Transcript, round: u32) -> Vec<Side> {
    let round = as_message_round(round);
    Side::ORDER
        .into_iter()
        .filter(|side| transcript.message_for(round, *side).is_none())
        .collect()
}

/// Structured debate: numbered rounds, one message per side each.
#[derive(Debug, Clone)]
pub struct StructuredDebate {
    transcript: Transcript,
    current_round: u32,
    max_rounds: u32,
    generating: bool,
    models_assigned: bool,
    config: DebateConfig,
}

impl StructuredDebate {
    pub fn new(config: DebateConfig) -> Self {
        Self {
            transcript: Transcript::new(),
            current_round: 1,
            max_rounds: config.clamp_rounds(config.default_rounds),
            generating: false,
            models_assigned: false,
            config,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn set_models_assigned(&mut self, assigned: bool) {
        self.models_assigned = assigned;
    }

    /// Change the round limit, clamped to the configured bounds.
    ///
    /// Lowering it below the current round ends the debate.
    pub fn set_max_rounds(&mut self, rounds: u32) -> u32 {
        self.max_rounds = self.config.clamp_rounds(rounds);
        self.max_rounds
    }

    pub fn is_round_complete(&self, round: u32) -> bool {
        self.transcript.is_round_complete(as_message_round(round))
    }

    /// Messages for one round
    pub fn messages_for_round(&self, round: u32) -> Vec<&Message> {
        self.transcript.messages_for_round(as_message_round(round))
    }

    /// Highest round with any message (at least 1)
    pub fn highest_round(&self) -> u32 {
        u32::try_from(self.transcript.highest_round()).unwrap_or(1)
    }

    /// Every gate `round` must pass before generation starts
    pub fn check_round(&self, round: u32) -> Result<(), RoundBlock> {
        if round == 0 {
            return Err(RoundBlock::NoSuchRound);
        }
        if round > 1 && !self.is_round_complete(round - 1) {
            return Err(RoundBlock::PreviousIncomplete);
        }
        if self.is_round_complete(round) {
            return Err(RoundBlock::AlreadyComplete);
        }
        if self.generating {
            return Err(RoundBlock::Generating);
        }
        if !self.models_assigned {
            return Err(RoundBlock::ModelsUnassigned);
        }
        if round > self.max_rounds {
            return Err(RoundBlock::BeyondMax {
                max_rounds: self.max_rounds,
            });
        }
        Ok(())
    }

    pub fn can_run_round(&self, round: u32) -> bool {
        self.check_round(round).is_ok()
    }

    /// Mark `round` as generating
    pub fn begin_round(&mut self, round: u32) -> Result<(), DebateError> {
        self.check_round(round).map_err(|b| b.into_error(round))?;
        self.generating = true;
        Ok(())
    }

    /// Sides still owed a message in `round`, A before B
    pub fn pending_sides(&self, round: u32) -> Vec<Side> {
        missing_sides(&self.transcript, round)
    }

    /// Append a debater message; the caller checked freshness
    pub fn record(&mut self, message: Message) {
        self.transcript.push(message);
    }

    /// Clear the in-flight flag, success or not
    pub fn finish(&mut self) {
        self.generating = false;
    }

    /// Advance to the next round. Only when the current one is complete and
    /// the limit allows; never starts generation.
    pub fn next_round(&mut self) -> bool {
        if self.is_round_complete(self.current_round) && self.current_round < self.max_rounds {
            self.current_round += 1;
            true
        } else {
            false
        }
    }

    /// Terminal: past the limit, or the last allowed round is done
    pub fn is_completed(&self) -> bool {
        self.current_round > self.max_rounds
            || (self.current_round == self.max_rounds && self.is_round_complete(self.max_rounds))
    }
}

/// Free-form debate: a bounded number of A-then-B exchanges
#[derive(Debug, Clone)]
pub struct UnstructuredDebate {
    transcript: Transcript,
    max_exchanges: u32,
    generating: bool,
}

impl UnstructuredDebate {
    pub fn new(max_exchanges: u32) -> Self {
        Self {
            transcript: Transcript::new(),
            max_exchanges,
            generating: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn max_exchanges(&self) -> u32 {
        self.max_exchanges
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Exchanges with both sides present
    pub fn completed_exchanges(&self) -> u32 {
        (1..=self.max_exchanges)
            .take_while(|n| self.transcript.is_round_complete(as_message_round(*n)))
            .count() as u32
    }

    /// The exchange to run next, resuming a half-finished one
    pub fn next_exchange(&self) -> Option<u32> {
        let next = self.completed_exchanges() + 1;
        (next <= self.max_exchanges).then_some(next)
    }

    pub fn begin_exchange(&mut self) -> Result<u32, DebateError> {
        if self.generating {
            return Err(DebateError::Busy);
        }
        let exchange = self.next_exchange().ok_or(DebateError::RoundNotRunnable {
            round: self.max_exchanges + 1,
            reason: format!("the debate is limited to {} exchanges", self.max_exchanges),
        })?;
        self.generating = true;
        Ok(exchange)
    }

    pub fn pending_sides(&self, exchange: u32) -> Vec<Side> {
        missing_sides(&self.transcript, exchange)
    }

    pub fn record(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn finish(&mut self) {
        self.generating = false;
    }

    pub fn is_completed(&self) -> bool {
        self.next_exchange().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(side: Side, round: i32) -> Message {
        Message::debater(side, round, "m", "<argument>x</argument>", "")
    }

    fn ready() -> StructuredDebate {
        let mut debate = StructuredDebate::new(DebateConfig::default());
        debate.set_models_assigned(true);
        debate
    }

    #[test]
    fn test_round_gating() {
        let mut debate = ready();
        assert!(debate.can_run_round(1));
        assert_eq!(debate.check_round(2), Err(RoundBlock::PreviousIncomplete));
        assert_eq!(debate.check_round(0), Err(RoundBlock::NoSuchRound));

        debate.record(message(Side::A, 1));
        assert!(debate.can_run_round(1));
        assert!(!debate.can_run_round(2));

        debate.record(message(Side::B, 1));
        assert_eq!(debate.messages_for_round(1).len(), 2);
        assert_eq!(debate.check_round(1), Err(RoundBlock::AlreadyComplete));
        assert!(debate.can_run_round(2));
    }

    #[test]
    fn test_models_and_generating_block() {
        let mut debate = StructuredDebate::new(DebateConfig::default());
        assert_eq!(debate.check_round(1), Err(RoundBlock::ModelsUnassigned));

        debate.set_models_assigned(true);
        debate.begin_round(1).unwrap();
        assert!(matches!(debate.begin_round(1), Err(DebateError::Busy)));
        debate.finish();
        assert!(debate.can_run_round(1));
    }

    #[test]
    fn test_pending_sides_resume() {
        let mut debate = ready();
        assert_eq!(debate.pending_sides(1), vec![Side::A, Side::B]);
        debate.record(message(Side::A, 1));
        assert_eq!(debate.pending_sides(1), vec![Side::B]);
    }

    #[test]
    fn test_next_round_and_terminal_state() {
        let mut debate = ready();
        debate.set_max_rounds(2);
        assert!(!debate.next_round());

        for round in 1..=2 {
            debate.record(message(Side::A, round));
            debate.record(message(Side::B, round));
            debate.next_round();
        }
        assert_eq!(debate.current_round(), 2);
        assert!(debate.is_completed());
        assert!(!debate.next_round());
        assert_eq!(debate.check_round(3), Err(RoundBlock::BeyondMax { max_rounds: 2 }));
    }

    #[test]
    fn test_lowering_max_rounds_ends_debate() {
        let mut debate = ready();
        debate.set_max_rounds(5);
        for round in 1..=3 {
            debate.record(message(Side::A, round));
            debate.record(message(Side::B, round));
            debate.next_round();
        }
        assert_eq!(debate.current_round(), 4);
        assert!(!debate.is_completed());

        assert_eq!(debate.set_max_rounds(2), 2);
        assert!(debate.is_completed());
        assert_eq!(debate.set_max_rounds(0), 1);
        assert_eq!(debate.set_max_rounds(99), 8);
    }

    #[test]
    fn test_highest_round_and_label() {
        let mut debate = ready();
        assert_eq!(debate.highest_round(), 1);
        debate.record(message(Side::A, 1));
        debate.record(message(Side::B, 1));
        debate.record(message(Side::A, 2));
        assert_eq!(debate.highest_round(), 2);
        assert_eq!(round_label(2), "Round 2");
    }

    #[test]
    fn test_unstructured_exchanges() {
        let mut debate = UnstructuredDebate::new(2);
        assert_eq!(debate.begin_exchange().unwrap(), 1);
        assert!(matches!(debate.begin_exchange(), Err(DebateError::Busy)));
        debate.record(message(Side::A, 1));
        debate.finish();

        assert_eq!(debate.begin_exchange().unwrap(), 1);
        assert_eq!(debate.pending_sides(1), vec![Side::B]);
        debate.record(message(Side::B, 1));
        debate.finish();

        assert_eq!(debate.next_exchange(), Some(2));
        debate.record(message(Side::A, 2));
        debate.record(message(Side::B, 2));
        assert!(debate.is_completed());
        assert!(matches!(
            debate.begin_exchange(),
            Err(DebateError::RoundNotRunnable { round: 3, .. })
        ));
    }
}
