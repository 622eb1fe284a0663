//! Age of Lanes - a two-sided lane battle simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (units, towers, queues, abilities, bot)
//! - `tuning`: Data-driven content tables (ages, units, upgrades, towers, abilities)
//! - `settings`: Match configuration (seed, difficulty, tuning overrides)

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, DifficultyProfile, Settings, SettingsError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate of the driving loop
    pub const FPS: u32 = 60;
    /// Frame duration in seconds at the nominal frame rate
    pub const FRAME_DT: f32 = 1.0 / FPS as f32;

    /// Battlefield width in pixels
    pub const GAME_WIDTH: f32 = 1200.0;

    /// Base health for both sides
    pub const MAX_HEALTH: f32 = 1000.0;
    pub const STARTING_GOLD: f32 = 250.0;
    pub const STARTING_XP: f32 = 0.0;

    /// Passive income per second of game time
    pub const GOLD_PER_SEC: f32 = 1.5;
    pub const XP_PER_SEC: f32 = 0.5;

    /// Kill rewards, credited to the side opposing the dead unit
    pub const GOLD_PER_KILL: f32 = 20.0;
    pub const XP_PER_KILL: f32 = 25.0;

    /// Base anchors on the lane axis
    pub const PLAYER_BASE_X: f32 = 60.0;
    pub const AI_BASE_X: f32 = 1080.0;
    /// New units appear this far in front of their own base
    pub const UNIT_SPAWN_OFFSET: f32 = 60.0;
    /// Units stop this far short of the enemy base anchor
    pub const BASE_CLEARANCE: f32 = 40.0;

    /// Units with less range than this are melee
    pub const MELEE_RANGE_THRESHOLD: f32 = 20.0;
    /// Effective reach of melee units against a base
    pub const MELEE_BASE_REACH: f32 = 50.0;

    /// Build queue capacity per side
    pub const MAX_QUEUE_LEN: usize = 5;
    /// Tower slots per side
    pub const TOWER_SLOTS: usize = 3;
    /// Fraction of tower cost refunded on sale
    pub const SELL_FRACTION: f32 = 0.5;
}

/// Milliseconds between attacks for a given attack rate (attacks per second)
#[inline]
pub fn attack_interval_ms(attack_speed: f32) -> f32 {
    if attack_speed > 0.0 {
        1000.0 / attack_speed
    } else {
        f32::INFINITY
    }
}
