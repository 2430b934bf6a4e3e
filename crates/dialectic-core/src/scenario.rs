//! Debate scenarios and the positions assigned to each debater

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::message::Side;

/// Errors raised when a scenario cannot host a debate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario {id} needs at least two answer options, found {found}")]
    TooFewAnswers { id: String, found: usize },
    #[error("scenario {id} label {label:?} is not one of its answer options")]
    UnknownLabel { id: String, label: String },
    #[error("scenario {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
}

/// The immutable subject of one debate.
///
/// `situation` is the private evidence: debaters see it, the judge never does.
/// `label` is the ground-truth answer and is always defended by debater A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Identifier from the scenario source (numeric ids are kept as text)
    #[serde(default, deserialize_with = "id_from_text_or_number")]
    pub id: String,
    /// Difficulty / classification bucket
    #[serde(default)]
    pub level: String,
    /// Evidence text
    pub situation: String,
    /// Question being debated
    pub question: String,
    /// Candidate answers, in order
    pub answer_options: Vec<String>,
    /// Ground-truth answer
    pub label: String,
    /// Custom stance for debater A
    #[serde(
        default,
        rename = "debaterA_position",
        alias = "debater_a_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub debater_a_position: Option<String>,
    /// Custom stance for debater B
    #[serde(
        default,
        rename = "debaterB_position",
        alias = "debater_b_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub debater_b_position: Option<String>,
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Scenario {
    /// Create a scenario with no position overrides
    pub fn new(
        id: &str,
        situation: &str,
        question: &str,
        answer_options: &[&str],
        label: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            level: String::new(),
            situation: situation.to_string(),
            question: question.to_string(),
            answer_options: answer_options.iter().map(|s| s.to_string()).collect(),
            label: label.to_string(),
            debater_a_position: None,
            debater_b_position: None,
        }
    }

    /// Set the classification level
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    /// Override the stance a debater argues from
    pub fn with_position(mut self, side: Side, position: &str) -> Self {
        match side {
            Side::A => self.debater_a_position = Some(position.to_string()),
            Side::B => self.debater_b_position = Some(position.to_string()),
        }
        self
    }

    /// Check that the scenario can host a two-sided debate
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.situation.trim().is_empty() {
            return Err(ScenarioError::EmptyField {
                id: self.id.clone(),
                field: "situation",
            });
        }
        if self.question.trim().is_empty() {
            return Err(ScenarioError::EmptyField {
                id: self.id.clone(),
                field: "question",
            });
        }
        if self.answer_options.len() < 2 {
            return Err(ScenarioError::TooFewAnswers {
                id: self.id.clone(),
                found: self.answer_options.len(),
            });
        }
        if !self.answer_options.contains(&self.label) {
            return Err(ScenarioError::UnknownLabel {
                id: self.id.clone(),
                label: self.label.clone(),
            });
        }
        Ok(())
    }

    /// The answer after `label` in `answer_options`, wrapping around.
    ///
    /// A label missing from the options behaves as index -1, so the first
    /// option is returned.
    pub fn opposing_answer(&self) -> &str {
        if self.answer_options.is_empty() {
            return &self.label;
        }
        let next = self
            .answer_options
            .iter()
            .position(|option| option == &self.label)
            .map_or(0, |idx| (idx + 1) % self.answer_options.len());
        &self.answer_options[next]
    }

    /// Option text for an answer letter (`A` is the first option)
    pub fn answer_for_label(&self, label: &str) -> Option<&str> {
        let mut chars = label.trim().chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() || !letter.is_ascii_uppercase() {
            return None;
        }
        let idx = (letter as u8 - b'A') as usize;
        self.answer_options.get(idx).map(String::as_str)
    }

    /// Fixed answer assignment: A defends the label, B the cyclic next option
    pub fn positions(&self) -> Positions {
        Positions {
            defending: self.label.clone(),
            opposing: self.opposing_answer().to_string(),
        }
    }

    /// Custom stance override for a side, if one was given
    pub fn position_override(&self, side: Side) -> Option<&str> {
        match side {
            Side::A => self.debater_a_position.as_deref(),
            Side::B => self.debater_b_position.as_deref(),
        }
        .filter(|p| !p.trim().is_empty())
    }
}

/// Answers assigned to the two debaters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positions {
    /// Defended by debater A (the scenario label)
    pub defending: String,
    /// Defended by debater B
    pub opposing: String,
}

impl Positions {
    /// The answer a side argues for
    pub fn answer_for(&self, side: Side) -> &str {
        match side {
            Side::A => &self.defending,
            Side::B => &self.opposing,
        }
    }

    /// The answer a side argues against
    pub fn answer_against(&self, side: Side) -> &str {
        self.answer_for(side.opponent())
    }
}

/// What the judge is allowed to see.
///
/// There is deliberately no `situation` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeScenario {
    pub question: String,
    pub answer_a: String,
    pub answer_b: String,
    pub name_a: String,
    pub name_b: String,
}

impl JudgeScenario {
    /// Project a scenario onto the judge's view using the assigned positions
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let positions = scenario.positions();
        Self {
            question: scenario.question.clone(),
            answer_a: positions.defending,
            answer_b: positions.opposing,
            name_a: Side::A.name().to_string(),
            name_b: Side::B.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof_scenario() -> Scenario {
        Scenario::new(
            "p-1",
            "The cat sat on the mat.",
            "Is it proved that the cat sat?",
            &["proved", "disproved"],
            "proved",
        )
    }

    #[test]
    fn test_positions_follow_label() {
        let scenario = proof_scenario();
        let positions = scenario.positions();
        assert_eq!(positions.answer_for(Side::A), "proved");
        assert_eq!(positions.answer_for(Side::B), "disproved");
        assert_eq!(positions.answer_against(Side::A), "disproved");
    }

    #[test]
    fn test_opposing_answer_wraps() {
        let scenario = Scenario::new("w", "s", "q", &["x", "y", "z"], "z");
        assert_eq!(scenario.opposing_answer(), "x");

        let scenario = Scenario::new("w", "s", "q", &["x", "y", "z"], "x");
        assert_eq!(scenario.opposing_answer(), "y");
    }

    #[test]
    fn test_answer_for_label() {
        let scenario = Scenario::new("w", "s", "q", &["x", "y", "z"], "z");
        assert_eq!(scenario.answer_for_label("A"), Some("x"));
        assert_eq!(scenario.answer_for_label("c"), Some("z"));
        assert_eq!(scenario.answer_for_label("D"), None);
        assert_eq!(scenario.answer_for_label("AB"), None);
    }

    #[test]
    fn test_unknown_label_falls_back_to_first_option() {
        let scenario = Scenario::new("w", "s", "q", &["x", "y"], "nope");
        assert_eq!(scenario.opposing_answer(), "x");
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_single_answer() {
        let scenario = Scenario::new("one", "s", "q", &["only"], "only");
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::TooFewAnswers {
                id: "one".to_string(),
                found: 1
            })
        );
        assert!(proof_scenario().validate().is_ok());
    }

    #[test]
    fn test_judge_scenario_has_no_evidence() {
        let scenario = proof_scenario();
        let judge = JudgeScenario::from_scenario(&scenario);
        let json = serde_json::to_string(&judge).unwrap();
        assert!(!json.contains(&scenario.situation));
        assert_eq!(judge.answer_a, "proved");
        assert_eq!(judge.answer_b, "disproved");
        assert_eq!(judge.name_a, "A");
    }

    #[test]
    fn test_deserialize_numeric_id_and_positions() {
        let json = r#"{
            "id": 42,
            "level": "hard",
            "situation": "s",
            "question": "q",
            "answer_options": ["a", "b"],
            "label": "b",
            "debaterA_position": "It is b."
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.id, "42");
        assert_eq!(scenario.position_override(Side::A), Some("It is b."));
        assert_eq!(scenario.position_override(Side::B), None);
    }
}
