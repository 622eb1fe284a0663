//! Purchasable special abilities
//!
//! Bought once with XP, then usable whenever their cooldown has elapsed.

use serde::{Deserialize, Serialize};

use super::ledger::SideState;
use super::state::{GameState, Side};
use crate::consts::MAX_HEALTH;
use crate::tuning::{AbilityKind, AbilityStats};

/// Per-side ownership record of an ability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityCharge {
    /// Engine clock of the last successful use
    pub last_used_ms: Option<f64>,
}

impl AbilityCharge {
    /// Milliseconds until the ability can be used again
    pub fn remaining_ms(&self, stats: &AbilityStats, now_ms: f64) -> f64 {
        match self.last_used_ms {
            None => 0.0,
            Some(last) => (stats.cooldown_ms as f64 - (now_ms - last)).max(0.0),
        }
    }
}

/// Buy an ability unlocked at `unlock_age`; repeats are no-ops
pub fn purchase(side: &mut SideState, stats: &AbilityStats, unlock_age: usize) -> bool {
    if unlock_age > side.age || side.owns_ability(&stats.name) || !side.spend_xp(stats.cost) {
        return false;
    }
    side.abilities.insert(stats.name.clone(), AbilityCharge::default());
    true
}

/// Use an owned, ready ability for `side`. Returns whether it took effect.
pub fn activate(state: &mut GameState, side: Side, stats: &AbilityStats, now_ms: f64) -> bool {
    let ready = state
        .side(side)
        .abilities
        .get(&stats.name)
        .is_some_and(|charge| charge.remaining_ms(stats, now_ms) <= 0.0);
    if !ready {
        return false;
    }

    let applied = match stats.kind {
        AbilityKind::AreaDamage => area_damage(state, side, stats.magnitude),
        AbilityKind::Heal => heal(state.side_mut(side), stats.magnitude),
        AbilityKind::ResourceGrant => {
            state.side_mut(side).gold += stats.magnitude;
            true
        }
    };

    if applied {
        if let Some(charge) = state.side_mut(side).abilities.get_mut(&stats.name) {
            charge.last_used_ms = Some(now_ms);
        }
    }
    applied
}

/// Hit every live enemy unit. Always succeeds, even with nothing to hit.
fn area_damage(state: &mut GameState, side: Side, damage: f32) -> bool {
    for unit in state
        .units
        .iter_mut()
        .filter(|u| u.side != side && !u.is_dead())
    {
        unit.take_damage(damage);
    }
    true
}

/// Restore base health up to the cap; fails at full health
fn heal(side: &mut SideState, amount: f32) -> bool {
    let healed = (side.health + amount).min(MAX_HEALTH);
    if healed <= side.health {
        return false;
    }
    side.health = healed;
    true
}
