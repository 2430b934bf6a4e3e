//! Prompt generator: scenario + transcript → role-tagged chat messages
//!
//! All builders are pure. They never see the orchestrator's state, only the
//! transcript they are handed.

use dialectic_core::{JudgeScenario, Scenario, Side, Transcript};
use dialectic_llm::ChatMessage;

use crate::config::DebateConfig;
use crate::prompts::{JudgeStyle, PromptSet};

/// Replace `{key}` placeholders in one pass.
///
/// Inserted values are never re-scanned, so a situation that happens to
/// contain `{transcript}` stays literal. Unknown placeholders are kept.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Positional answer label: A, B, C, ... then 27, 28, ...
pub fn answer_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

fn with_position(position: Option<&str>, body: String) -> String {
    match position {
        Some(position) => format!("Your position/argument is: {}\n\n{}", position, body),
        None => body,
    }
}

/// Builds every prompt the debate sends
#[derive(Debug, Clone)]
pub struct PromptGenerator {
    prompts: PromptSet,
    word_limit: u32,
}

impl Default for PromptGenerator {
    fn default() -> Self {
        Self::new(PromptSet::default(), &DebateConfig::default())
    }
}

impl PromptGenerator {
    pub fn new(prompts: PromptSet, config: &DebateConfig) -> Self {
        Self {
            prompts,
            word_limit: config.word_limit,
        }
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    pub fn word_limit(&self) -> u32 {
        self.word_limit
    }

    /// System instructions plus the situation, question and labelled options
    pub fn baseline(&self, scenario: &Scenario) -> Vec<ChatMessage> {
        let labels: Vec<String> = (0..scenario.answer_options.len()).map(answer_label).collect();
        let options = scenario
            .answer_options
            .iter()
            .zip(&labels)
            .map(|(option, label)| format!("- {}: {}", label, option))
            .collect::<Vec<_>>()
            .join("\n");
        let answer_labels = labels.join("|");

        let templates = &self.prompts.baseline;
        let user = fill(
            &templates.user,
            &[
                ("situation", &scenario.situation),
                ("question", &scenario.question),
                ("answer_options", &options),
                ("answer_labels", &answer_labels),
            ],
        );

        vec![
            ChatMessage::system(templates.system.trim()),
            ChatMessage::user(user.trim()),
        ]
    }

    /// The four-turn debater prompt: system, priming user turn, scripted
    /// acknowledgment, then the real request with situation and transcript.
    ///
    /// `transcript` must already contain every message this side may see;
    /// for B in round r that includes A's round-r argument.
    pub fn debater(
        &self,
        scenario: &Scenario,
        transcript: &Transcript,
        side: Side,
        round: u32,
    ) -> Vec<ChatMessage> {
        let positions = scenario.positions();
        let defending = positions.answer_for(side);
        let opposing = positions.answer_against(side);
        let word_limit = self.word_limit.to_string();
        let round_text = round.to_string();
        let history = transcript.format_history();

        let templates = &self.prompts.debate;
        let guidance = templates.round_guidance(round);
        let new_argument_request = fill(
            guidance.new_argument_request,
            &[
                ("question", &scenario.question),
                ("answer_defending", defending),
            ],
        );

        let stance = [
            ("question", scenario.question.as_str()),
            ("answer_defending", defending),
            ("answer_opposing", opposing),
        ];
        let system = fill(
            &templates.system,
            &[
                ("name", side.name()),
                ("round", &round_text),
                ("word_limit", &word_limit),
            ],
        );
        let user_1 = fill(&templates.user_1, &stance);
        let assistant = fill(&templates.assistant, &stance);
        let user_2 = fill(
            &templates.user_2,
            &[
                ("situation", &scenario.situation),
                ("transcript", &history),
                ("new_argument_request", &new_argument_request),
                ("thinking_advice", guidance.thinking_advice),
                ("word_limit", &word_limit),
            ],
        );
        let user_2 = with_position(scenario.position_override(side), user_2.trim().to_string());

        vec![
            ChatMessage::system(system.trim()),
            ChatMessage::user(user_1.trim()),
            ChatMessage::assistant(assistant.trim()),
            ChatMessage::user(user_2),
        ]
    }

    /// Judge prompt. Built from [`JudgeScenario`], which has no situation.
    pub fn judge(
        &self,
        scenario: &JudgeScenario,
        transcript: &Transcript,
        style: JudgeStyle,
    ) -> Vec<ChatMessage> {
        let templates = &self.prompts.judgement;
        let history = transcript.format_history();
        let user = fill(
            templates.user_for(style),
            &[
                ("question", &scenario.question),
                ("answer_a", &scenario.answer_a),
                ("answer_b", &scenario.answer_b),
                ("name_a", &scenario.name_a),
                ("name_b", &scenario.name_b),
                ("transcript", &history),
            ],
        );

        vec![
            ChatMessage::system(templates.system.trim()),
            ChatMessage::user(user.trim()),
        ]
    }

    /// Free-form turn: no round guidance, just the history so far
    pub fn unstructured(
        &self,
        scenario: &Scenario,
        transcript: &Transcript,
        side: Side,
    ) -> Vec<ChatMessage> {
        let positions = scenario.positions();
        let word_limit = self.word_limit.to_string();
        let history = transcript.format_history();
        let history = if history.is_empty() {
            "(no arguments yet)".to_string()
        } else {
            history
        };

        let templates = &self.prompts.unstructured;
        let system = fill(
            &templates.system,
            &[
                ("name", side.name()),
                ("question", &scenario.question),
                ("answer_defending", positions.answer_for(side)),
                ("answer_opposing", positions.answer_against(side)),
                ("word_limit", &word_limit),
            ],
        );
        let user = fill(
            &templates.user,
            &[("situation", &scenario.situation), ("transcript", &history)],
        );

        vec![
            ChatMessage::system(system.trim()),
            ChatMessage::user(with_position(
                scenario.position_override(side),
                user.trim().to_string(),
            )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_core::Message;
    use dialectic_llm::Role;

    fn scenario() -> Scenario {
        Scenario::new(
            "e2e",
            "Rule 1: birds fly. Tweety is a bird.",
            "Is it proved that Tweety flies?",
            &["proved", "disproved"],
            "proved",
        )
    }

    #[test]
    fn test_fill_single_pass() {
        let out = fill(
            "{a} and {b} and {missing}",
            &[("a", "{b}"), ("b", "x")],
        );
        assert_eq!(out, "{b} and x and {missing}");
        assert_eq!(fill("{a}{a}", &[("a", "1")]), "11");
        assert_eq!(fill("unclosed {a", &[("a", "1")]), "unclosed {a");
    }

    #[test]
    fn test_answer_labels() {
        assert_eq!(answer_label(0), "A");
        assert_eq!(answer_label(25), "Z");
        assert_eq!(answer_label(26), "27");
    }

    #[test]
    fn test_baseline_prompt() {
        let messages = PromptGenerator::default().baseline(&scenario());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        let user = &messages[1].content;
        assert!(user.contains("- A: proved\n- B: disproved"));
        assert!(user.contains("\"Answer: A|B\""));
        assert!(user.contains("Tweety is a bird."));
    }

    #[test]
    fn test_debater_prompt_structure() {
        let messages =
            PromptGenerator::default().debater(&scenario(), &Transcript::new(), Side::B, 1);
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);

        assert!(messages[0].content.contains("expert debater named B"));
        assert!(messages[0].content.contains("Do not exceed 150 words per argument"));
        assert!(messages[1].content.contains("<answer_defending>disproved</answer_defending>"));
        assert!(messages[2]
            .content
            .contains("is \"disproved\".\nI will argue against the answer \"proved\"."));
        assert!(messages[3].content.starts_with("<situation>\nRule 1"));
        assert!(messages[3].content.contains("opening argument"));
        assert!(messages[3].content.contains("Do not exceed 150 words."));
        assert!(!messages[3].content.contains('{'));
    }

    #[test]
    fn test_position_override_leads_final_turn() {
        let scenario = scenario().with_position(Side::A, "Birds fly by default");
        let generator = PromptGenerator::default();
        let a = generator.debater(&scenario, &Transcript::new(), Side::A, 2);
        assert!(a[3]
            .content
            .starts_with("Your position/argument is: Birds fly by default\n\n<situation>"));
        assert!(a[3].content.contains("next argument"));

        let b = generator.debater(&scenario, &Transcript::new(), Side::B, 2);
        assert!(b[3].content.starts_with("<situation>"));
    }

    #[test]
    fn test_history_shows_arguments_only() {
        let s = scenario();
        let mut transcript = Transcript::new();
        transcript.push(Message::debater(
            Side::A,
            1,
            "m",
            "<thinking>secret plan</thinking><argument>Per <quote>Tweety is a bird</quote>.</argument>",
            &s.situation,
        ));
        let messages = PromptGenerator::default().debater(&s, &transcript, Side::B, 1);
        let last = &messages[3].content;
        assert!(last.contains("A: Per <v_quote>Tweety is a bird</v_quote>."));
        assert!(!last.contains("secret plan"));
    }

    #[test]
    fn test_judge_prompt_is_blind() {
        let s = scenario();
        let mut transcript = Transcript::new();
        transcript.push(Message::debater(Side::A, 1, "m", "<argument>Birds fly.</argument>", &s.situation));
        transcript.push(Message::debater(Side::B, 1, "m", "<argument>Penguins.</argument>", &s.situation));

        for style in [JudgeStyle::Standard, JudgeStyle::EvidenceWeighing] {
            let messages =
                PromptGenerator::default().judge(&JudgeScenario::from_scenario(&s), &transcript, style);
            let joined: String = messages.iter().map(|m| m.content.as_str()).collect();
            assert!(!joined.contains(&s.situation));
            assert!(joined.contains("A: proved\nB: disproved"));
            assert!(joined.contains("A: Birds fly.\n\nB: Penguins."));
            assert!(joined.contains("Answer: <A|B>"));
        }
    }

    #[test]
    fn test_unstructured_prompt() {
        let messages =
            PromptGenerator::default().unstructured(&scenario(), &Transcript::new(), Side::A);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("is \"proved\", not \"disproved\""));
        assert!(messages[1].content.contains("(no arguments yet)"));
        assert!(messages[1].content.ends_with("Your response:"));
    }
}
