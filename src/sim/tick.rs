//! Per-tick simulation steps
//!
//! The engine runs these in a fixed order each tick, with the opponent's
//! decision step between the build queues and the towers:
//! income, queues, (bot), towers, units, death sweep, win check.

use super::ledger::{accrue, award_kills};
use super::queue;
use super::state::{GameState, GameStatus, Side};
use super::tower::fire_towers;
use super::unit::update_units;

/// Passive gold/XP for both sides; `ai_multipliers` are (gold, xp)
pub fn accrue_income(state: &mut GameState, dt: f32, ai_multipliers: (f32, f32)) {
    accrue(&mut state.player, &mut state.ai, dt, ai_multipliers);
}

/// Count down each side's head item and spawn whatever completes
pub fn advance_build_queues(state: &mut GameState, dt: f32) {
    let dt_ms = dt.max(0.0) * 1000.0;
    for side in Side::ALL {
        if let Some(done) = queue::advance(&mut state.side_mut(side).queue, dt_ms) {
            state.spawn_unit(done.stats, side);
        }
    }
}

/// Let every ready tower take its shot; returns (player shots, ai shots)
pub fn advance_towers(state: &mut GameState, now_ms: f64) -> (u32, u32) {
    let GameState {
        player, ai, units, ..
    } = state;
    let player_shots = fire_towers(&mut player.towers, Side::Player, units, now_ms);
    let ai_shots = fire_towers(&mut ai.towers, Side::Ai, units, now_ms);
    (player_shots, ai_shots)
}

/// Run unit behavior and apply base damage
pub fn advance_units(state: &mut GameState, dt: f32) {
    let GameState {
        player, ai, units, ..
    } = state;
    update_units(units, dt, |side, damage| match side {
        Side::Player => player.health -= damage,
        Side::Ai => ai.health -= damage,
    });
}

/// Remove dead units and reward their killers; returns (player kills, ai kills)
pub fn sweep_dead(state: &mut GameState) -> (u32, u32) {
    let mut player_kills = 0;
    let mut ai_kills = 0;
    state.units.retain(|unit| {
        if !unit.is_dead() {
            return true;
        }
        match unit.side {
            Side::Player => ai_kills += 1,
            Side::Ai => player_kills += 1,
        }
        false
    });
    award_kills(&mut state.player, player_kills);
    award_kills(&mut state.ai, ai_kills);
    (player_kills, ai_kills)
}

/// End the match if a base has fallen; returns the winner.
///
/// The player's base is checked first, so a simultaneous fall goes to the AI.
pub fn check_game_over(state: &mut GameState) -> Option<Side> {
    let winner = if state.player.health <= 0.0 {
        Side::Ai
    } else if state.ai.health <= 0.0 {
        Side::Player
    } else {
        return None;
    };

    state.status = GameStatus::GameOver;
    state.winner = Some(winner);
    state.units.clear();
    for side in Side::ALL {
        let s = state.side_mut(side);
        s.queue.clear();
        s.health = s.health.max(0.0);
    }
    Some(winner)
}
