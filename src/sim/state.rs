//! Game state and core simulation types
//!
//! One authoritative `GameState` per match. Everything the presentation layer
//! reads lives here, and everything is serializable for snapshots.

use serde::{Deserialize, Serialize};

use super::ledger::SideState;
use super::unit::Combatant;
use crate::consts::*;
use crate::tuning::UnitStats;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    /// Waiting for `start`
    #[default]
    StartScreen,
    /// Active gameplay
    Playing,
    /// One base fell
    GameOver,
}

/// Which side of the lane an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Player, Side::Ai];

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Direction of advance on the lane axis
    pub fn direction(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Ai => -1.0,
        }
    }

    /// Anchor of this side's own base
    pub fn base_x(self) -> f32 {
        match self {
            Side::Player => PLAYER_BASE_X,
            Side::Ai => AI_BASE_X,
        }
    }

    /// Where this side's new units appear
    pub fn spawn_x(self) -> f32 {
        self.base_x() + UNIT_SPAWN_OFFSET * self.direction()
    }

    /// Farthest point this side's units may advance to
    pub fn advance_limit(self) -> f32 {
        self.opponent().base_x() - BASE_CLEARANCE * self.direction()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Ai => "AI",
        }
    }
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub winner: Option<Side>,
    /// Game time spent in `Playing`
    pub elapsed_ms: f64,
    pub player: SideState,
    pub ai: SideState,
    /// Live units of both sides, in spawn order
    pub units: Vec<Combatant>,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            status: GameStatus::StartScreen,
            winner: None,
            elapsed_ms: 0.0,
            player: SideState::new(Side::Player),
            ai: SideState::new(Side::Ai),
            units: Vec::new(),
            next_id: 1,
        }
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a unit at its side's spawn point, returning its ID
    pub fn spawn_unit(&mut self, stats: UnitStats, side: Side) -> u32 {
        let id = self.next_entity_id();
        log::debug!("{} spawned {} (#{})", side.as_str(), stats.name, id);
        self.units.push(Combatant::new(id, stats, side, side.spawn_x()));
        id
    }

    pub fn unit(&self, id: u32) -> Option<&Combatant> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Live units belonging to `side`
    pub fn live_units(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.units
            .iter()
            .filter(move |u| u.side == side && !u.is_dead())
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.status, GameStatus::StartScreen);
        assert!(state.winner.is_none());
        for side in Side::ALL {
            let s = state.side(side);
            assert_eq!(s.health, MAX_HEALTH);
            assert_eq!(s.gold, STARTING_GOLD);
            assert_eq!(s.xp, STARTING_XP);
            assert_eq!(s.age, 0);
            assert!(s.queue.is_empty());
            assert_eq!(s.towers.len(), TOWER_SLOTS);
        }
        assert!(state.units.is_empty());
    }

    #[test]
    fn test_side_geometry() {
        assert_eq!(Side::Player.opponent(), Side::Ai);
        assert_eq!(Side::Player.spawn_x(), PLAYER_BASE_X + UNIT_SPAWN_OFFSET);
        assert_eq!(Side::Ai.spawn_x(), AI_BASE_X - UNIT_SPAWN_OFFSET);
        assert_eq!(Side::Player.advance_limit(), AI_BASE_X - BASE_CLEARANCE);
        assert_eq!(Side::Ai.advance_limit(), PLAYER_BASE_X + BASE_CLEARANCE);
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let tuning = Tuning::default();
        let mut state = GameState::new();
        let a = state.spawn_unit(tuning.ages[0].units[0].clone(), Side::Player);
        let b = state.spawn_unit(tuning.ages[0].units[1].clone(), Side::Ai);
        assert_ne!(a, b);
        assert_eq!(state.live_units(Side::Player).count(), 1);
        assert_eq!(state.live_units(Side::Ai).count(), 1);
        assert_eq!(state.unit(b).map(|u| u.x), Some(Side::Ai.spawn_x()));
    }
}
