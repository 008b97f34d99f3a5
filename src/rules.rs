//! Gamification rules configuration.
//!
//! Points-per-completed-task and the achievement threshold table are
//! configuration rather than hardcoded literals, so embedders and tests can
//! tune them. Rules can be loaded from a YAML file alongside the app's
//! other settings.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An achievement threshold: completing `count` tasks unlocks `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRule {
    /// Number of completed tasks required.
    pub count: usize,
    /// Identifier unlocked at this threshold.
    pub id: String,
}

/// Gamification configuration for the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Points awarded per completed task.
    #[serde(default = "default_points_per_completed")]
    pub points_per_completed: u64,
    /// Ordered achievement thresholds, ascending by count.
    #[serde(default = "default_achievements")]
    pub achievements: Vec<AchievementRule>,
}

const fn default_points_per_completed() -> u64 {
    10
}

fn default_achievements() -> Vec<AchievementRule> {
    vec![
        AchievementRule { count: 5, id: "5tasks".to_string() },
        AchievementRule { count: 10, id: "10tasks".to_string() },
    ]
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            points_per_completed: default_points_per_completed(),
            achievements: default_achievements(),
        }
    }
}

impl GameRules {
    /// Load rules from a YAML file, returning `None` if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let rules: Self = serde_yaml::from_str(&content)?;
        Ok(Some(rules))
    }

    /// Save rules to a YAML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Points for the given completed-task count.
    #[must_use]
    pub fn points_for(&self, completed: usize) -> u64 {
        let completed = u64::try_from(completed).unwrap_or(u64::MAX);
        self.points_per_completed.saturating_mul(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let rules = GameRules::default();
        assert_eq!(rules.points_per_completed, 10);
        assert_eq!(rules.achievements.len(), 2);
        assert_eq!(rules.achievements[0].count, 5);
        assert_eq!(rules.achievements[0].id, "5tasks");
        assert_eq!(rules.achievements[1].count, 10);
        assert_eq!(rules.achievements[1].id, "10tasks");
    }

    #[test]
    fn test_points_for() {
        let rules = GameRules::default();
        assert_eq!(rules.points_for(0), 0);
        assert_eq!(rules.points_for(5), 50);

        let custom = GameRules { points_per_completed: 3, ..Default::default() };
        assert_eq!(custom.points_for(4), 12);
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let loaded = GameRules::load_from(&dir.path().join("rules.yaml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config/rules.yaml");

        let rules = GameRules {
            points_per_completed: 25,
            achievements: vec![AchievementRule { count: 1, id: "first".to_string() }],
        };
        rules.save_to(&path).unwrap();

        let loaded = GameRules::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded, rules);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let rules: GameRules = serde_yaml::from_str("points_per_completed: 7\n").unwrap();
        assert_eq!(rules.points_per_completed, 7);
        assert_eq!(rules.achievements, GameRules::default().achievements);
    }
}
