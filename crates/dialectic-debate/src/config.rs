//! Debate limits

use serde::{Deserialize, Serialize};

/// Tunable debate limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Per-argument word limit quoted to debaters
    pub word_limit: u32,
    /// Structured rounds a new debate starts with
    pub default_rounds: u32,
    /// Hard upper bound for `set_max_rounds`
    pub max_rounds: u32,
    /// Hard lower bound for `set_max_rounds`
    pub min_rounds: u32,
    /// A/B exchanges allowed in the unstructured phase
    pub unstructured_exchanges: u32,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            word_limit: 150,
            default_rounds: 3,
            max_rounds: 8,
            min_rounds: 1,
            unstructured_exchanges: 1,
        }
    }
}

impl DebateConfig {
    /// Clamp a requested round count into `[min_rounds, max_rounds]`
    pub fn clamp_rounds(&self, rounds: u32) -> u32 {
        rounds.clamp(self.min_rounds, self.max_rounds.max(self.min_rounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_rounds() {
        let config = DebateConfig::default();
        assert_eq!(config.clamp_rounds(0), 1);
        assert_eq!(config.clamp_rounds(5), 5);
        assert_eq!(config.clamp_rounds(40), 8);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DebateConfig = serde_json::from_str(r#"{"word_limit": 90}"#).unwrap();
        assert_eq!(config.word_limit, 90);
        assert_eq!(config.default_rounds, 3);
    }
}
