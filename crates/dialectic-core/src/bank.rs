//! Scenario source: load, filter, pick at random

use rand::seq::IndexedRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scenario::Scenario;

/// Errors while loading scenario files
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Attribute filter; `None` matches anything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioFilter {
    pub level: Option<String>,
    pub label: Option<String>,
}

impl ScenarioFilter {
    pub fn new(level: Option<&str>, label: Option<&str>) -> Self {
        Self {
            level: level.map(str::to_string),
            label: label.map(str::to_string),
        }
    }

    pub fn matches(&self, scenario: &Scenario) -> bool {
        self.level.as_ref().is_none_or(|l| &scenario.level == l)
            && self.label.as_ref().is_none_or(|l| &scenario.label == l)
    }
}

/// Result of a filter pass
#[derive(Debug, Clone)]
pub struct FilteredScenarios<'a> {
    pub scenarios: Vec<&'a Scenario>,
    pub total_count: usize,
    pub filtered_count: usize,
}

/// In-memory scenario collection
#[derive(Debug, Clone, Default)]
pub struct ScenarioBank {
    scenarios: Vec<Scenario>,
}

impl ScenarioBank {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Load every `*.json` file in a directory.
    ///
    /// A file holds either one scenario object or an array of them.
    /// Files are read in name order so ids stay stable across runs.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, BankError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| BankError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut scenarios = Vec::new();
        for path in paths {
            scenarios.extend(Self::load_file(&path)?);
        }
        tracing::debug!(dir = %dir.display(), count = scenarios.len(), "Loaded scenarios");
        Ok(Self { scenarios })
    }

    /// Load one scenario file
    pub fn load_file(path: &Path) -> Result<Vec<Scenario>, BankError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum ScenarioFile {
            Many(Vec<Scenario>),
            One(Box<Scenario>),
        }

        let raw = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ScenarioFile =
            serde_json::from_str(&raw).map_err(|source| BankError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(match parsed {
            ScenarioFile::Many(list) => list,
            ScenarioFile::One(one) => vec![*one],
        })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Look a scenario up by id
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Distinct levels, sorted
    pub fn levels(&self) -> Vec<&str> {
        let mut levels: Vec<&str> = self.scenarios.iter().map(|s| s.level.as_str()).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    pub fn filter(&self, filter: &ScenarioFilter) -> FilteredScenarios<'_> {
        let scenarios: Vec<&Scenario> =
            self.scenarios.iter().filter(|s| filter.matches(s)).collect();
        FilteredScenarios {
            filtered_count: scenarios.len(),
            total_count: self.scenarios.len(),
            scenarios,
        }
    }

    /// Uniformly random match, or `None` when nothing matches
    pub fn random(&self, filter: &ScenarioFilter) -> Option<&Scenario> {
        self.random_with(filter, &mut rand::rng())
    }

    pub fn random_with<R: Rng + ?Sized>(
        &self,
        filter: &ScenarioFilter,
        rng: &mut R,
    ) -> Option<&Scenario> {
        self.filter(filter).scenarios.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank() -> ScenarioBank {
        ScenarioBank::new(vec![
            Scenario::new("1", "s", "q", &["proved", "disproved"], "proved").with_level("easy"),
            Scenario::new("2", "s", "q", &["proved", "disproved"], "disproved").with_level("easy"),
            Scenario::new("3", "s", "q", &["proved", "disproved"], "proved").with_level("hard"),
        ])
    }

    #[test]
    fn test_filter_counts() {
        let bank = bank();
        let result = bank.filter(&ScenarioFilter::new(Some("easy"), Some("proved")));
        assert_eq!(result.total_count, 3);
        assert_eq!(result.filtered_count, 1);
        assert_eq!(result.scenarios[0].id, "1");

        let all = bank.filter(&ScenarioFilter::default());
        assert_eq!(all.filtered_count, 3);
    }

    #[test]
    fn test_random_pick_stays_in_filter() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        let filter = ScenarioFilter::new(None, Some("proved"));
        for _ in 0..20 {
            let picked = bank.random_with(&filter, &mut rng).unwrap();
            assert_eq!(picked.label, "proved");
        }
    }

    #[test]
    fn test_no_match() {
        let bank = bank();
        assert!(bank
            .random(&ScenarioFilter::new(Some("medium"), None))
            .is_none());
    }

    #[test]
    fn test_levels() {
        assert_eq!(bank().levels(), vec!["easy", "hard"]);
    }
}
