//! Match settings and difficulty profiles
//!
//! Loaded from a JSON file on native builds; missing or broken files fall
//! back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;

/// Problems loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Passive opponent: slower timers, no tower management
    #[default]
    Normal,
    /// Aggressive opponent: faster timers, income bonus, towers, mixed armies
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "easy" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Numeric behavior of one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    // === Decision cadence ===
    /// Main decision interval at the start of a match
    pub action_interval_ms: f32,
    /// Floor the decision interval approaches as the match goes on
    pub min_action_interval_ms: f32,
    /// Time constant of the interval decay
    pub learning_time_ms: f32,
    /// Tower management interval at the start of a match
    pub tower_interval_ms: f32,
    pub min_tower_interval_ms: f32,
    pub ability_interval_ms: f32,

    // === Economy ===
    /// Passive income multipliers for the side this tier controls
    pub gold_multiplier: f32,
    pub xp_multiplier: f32,
    /// Extra multiplier gained linearly over `income_ramp_ms`
    pub income_growth: f32,
    pub income_ramp_ms: f32,

    // === Gates ===
    pub evolve_chance: f32,
    pub upgrade_chance: f32,
    pub ability_purchase_chance: f32,

    // === Heuristics ===
    pub base_aggression: f32,
    /// Enemy units on the field before area damage is worth using
    pub area_damage_min_enemies: usize,
    /// Health fraction below which heals are used
    pub heal_below: f32,
    pub evolves_under_pressure: bool,
    pub manages_towers: bool,
    /// Alternate ranged and melee spawns instead of always buying the priciest unit
    pub mixes_composition: bool,
    /// Use resource grants while ahead, not only when broke
    pub opportunistic_grants: bool,
}

impl DifficultyProfile {
    pub fn normal() -> Self {
        Self {
            action_interval_ms: 5000.0,
            min_action_interval_ms: 3000.0,
            learning_time_ms: 240_000.0,
            tower_interval_ms: 15_000.0,
            min_tower_interval_ms: 15_000.0,
            ability_interval_ms: 10_000.0,

            gold_multiplier: 1.0,
            xp_multiplier: 1.0,
            income_growth: 0.0,
            income_ramp_ms: 300_000.0,

            evolve_chance: 0.5,
            upgrade_chance: 0.4,
            ability_purchase_chance: 0.3,

            base_aggression: 0.35,
            area_damage_min_enemies: 4,
            heal_below: 0.35,
            evolves_under_pressure: false,
            manages_towers: false,
            mixes_composition: false,
            opportunistic_grants: false,
        }
    }

    pub fn hard() -> Self {
        Self {
            action_interval_ms: 3000.0,
            min_action_interval_ms: 1000.0,
            learning_time_ms: 180_000.0,
            tower_interval_ms: 12_000.0,
            min_tower_interval_ms: 5000.0,
            ability_interval_ms: 6000.0,

            gold_multiplier: 1.25,
            xp_multiplier: 1.25,
            income_growth: 0.35,
            income_ramp_ms: 300_000.0,

            evolve_chance: 1.0,
            upgrade_chance: 0.8,
            ability_purchase_chance: 1.0,

            base_aggression: 0.55,
            area_damage_min_enemies: 3,
            heal_below: 0.5,
            evolves_under_pressure: true,
            manages_towers: true,
            mixes_composition: true,
            opportunistic_grants: true,
        }
    }

    /// Decision interval after `elapsed_ms` of play
    pub fn action_interval(&self, elapsed_ms: f64) -> f32 {
        decay(
            self.action_interval_ms,
            self.min_action_interval_ms,
            elapsed_ms,
            self.learning_time_ms,
        )
    }

    /// Tower management interval after `elapsed_ms` of play
    pub fn tower_interval(&self, elapsed_ms: f64) -> f32 {
        decay(
            self.tower_interval_ms,
            self.min_tower_interval_ms,
            elapsed_ms,
            self.learning_time_ms,
        )
    }

    /// (gold, xp) income multipliers after `elapsed_ms` of play
    pub fn income_multipliers(&self, elapsed_ms: f64) -> (f32, f32) {
        let ramp = if self.income_ramp_ms > 0.0 {
            (elapsed_ms as f32 / self.income_ramp_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let bonus = self.income_growth * ramp;
        (self.gold_multiplier + bonus, self.xp_multiplier + bonus)
    }
}

/// Exponential approach from `start` toward `floor`
fn decay(start: f32, floor: f32, elapsed_ms: f64, time_constant_ms: f32) -> f32 {
    if time_constant_ms <= 0.0 {
        return floor;
    }
    let t = (elapsed_ms as f32 / time_constant_ms).max(0.0);
    floor + (start - floor) * (-t).exp()
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the opponent's random source
    pub seed: u64,
    pub difficulty: Difficulty,
    /// Optional JSON content tables replacing the stock ones
    pub tuning_path: Option<PathBuf>,
    pub normal: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            difficulty: Difficulty::Normal,
            tuning_path: None,
            normal: DifficultyProfile::normal(),
            hard: DifficultyProfile::hard(),
        }
    }
}

impl Settings {
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Profile for a tier
    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Content tables for this match, falling back to the stock tables
    pub fn tuning(&self) -> Tuning {
        let Some(path) = &self.tuning_path else {
            return Tuning::default();
        };
        match Tuning::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {} ({} ages)", path.display(), tuning.ages.len());
                tuning
            }
            Err(e) => {
                log::warn!("Using stock tuning ({}): {}", path.display(), e);
                Tuning::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("normal"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::Hard.as_str(), "Hard");
    }

    #[test]
    fn test_action_interval_shrinks_toward_floor() {
        let profile = DifficultyProfile::hard();
        let start = profile.action_interval(0.0);
        let later = profile.action_interval(120_000.0);
        let much_later = profile.action_interval(10_000_000.0);
        assert!((start - profile.action_interval_ms).abs() < 0.001);
        assert!(later < start);
        assert!(much_later >= profile.min_action_interval_ms);
        assert!(much_later - profile.min_action_interval_ms < 1.0);
    }

    #[test]
    fn test_normal_tower_interval_is_flat() {
        let profile = DifficultyProfile::normal();
        assert_eq!(profile.tower_interval(0.0), profile.tower_interval(600_000.0));
    }

    #[test]
    fn test_income_multipliers_ramp() {
        let hard = DifficultyProfile::hard();
        let (gold0, _) = hard.income_multipliers(0.0);
        let (gold_end, xp_end) = hard.income_multipliers(hard.income_ramp_ms as f64 * 2.0);
        assert!((gold0 - 1.25).abs() < 0.001);
        assert!((gold_end - 1.6).abs() < 0.001);
        assert!((xp_end - 1.6).abs() < 0.001);

        let normal = DifficultyProfile::normal();
        assert_eq!(normal.income_multipliers(1_000_000.0), (1.0, 1.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "difficulty": "Hard", "seed": 7 }"#)
            .expect("valid settings");
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.seed, 7);
        assert!(settings.tuning_path.is_none());
        assert_eq!(settings.hard, DifficultyProfile::hard());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/age-of-lanes/settings.json");
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert!(matches!(
            Settings::from_file("/nonexistent/age-of-lanes/settings.json"),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_profile_lookup() {
        let settings = Settings::with_difficulty(Difficulty::Hard);
        assert!(settings.profile(Difficulty::Hard).manages_towers);
        assert!(!settings.profile(Difficulty::Normal).manages_towers);
    }
}
