//! Stationary towers on fixed slots
//!
//! Towers fire at the first live enemy within horizontal range whenever their
//! attack interval has passed. Build, upgrade and sell take effect immediately.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ledger::SideState;
use super::state::Side;
use super::unit::Combatant;
use crate::attack_interval_ms;
use crate::consts::TOWER_SLOTS;
use crate::tuning::TowerStats;

/// Horizontal spacing between slots, starting from the base anchor
const SLOT_SPACING: f32 = 20.0;
const SLOT_INSET: f32 = 30.0;
/// Height of the lowest slot and the rise between slots
const SLOT_BASE_Y: f32 = 420.0;
const SLOT_RISE: f32 = 60.0;

/// A built tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub stats: TowerStats,
    /// Engine clock of the last shot
    pub last_attack_ms: Option<f64>,
}

impl Tower {
    pub fn new(stats: TowerStats) -> Self {
        Self {
            stats,
            last_attack_ms: None,
        }
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms - last >= attack_interval_ms(self.stats.attack_speed) as f64,
        }
    }
}

/// A fixed tower position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerSlot {
    pub id: usize,
    pub pos: Vec2,
    pub tower: Option<Tower>,
}

impl TowerSlot {
    pub fn is_empty(&self) -> bool {
        self.tower.is_none()
    }
}

/// Slot layout for a side, stepping away from its base
pub fn default_slots(side: Side) -> Vec<TowerSlot> {
    (0..TOWER_SLOTS)
        .map(|id| {
            let x = side.base_x() + side.direction() * (SLOT_INSET + SLOT_SPACING * id as f32);
            TowerSlot {
                id,
                pos: Vec2::new(x, SLOT_BASE_Y - SLOT_RISE * id as f32),
                tower: None,
            }
        })
        .collect()
}

/// Fire every ready tower of `side` at enemy units; returns shots fired
pub fn fire_towers(slots: &mut [TowerSlot], side: Side, units: &mut [Combatant], now_ms: f64) -> u32 {
    let mut shots = 0;
    for slot in slots.iter_mut() {
        let Some(tower) = slot.tower.as_mut() else {
            continue;
        };
        if !tower.ready(now_ms) {
            continue;
        }
        let target = units.iter_mut().find(|u| {
            u.side != side && !u.is_dead() && (u.x - slot.pos.x).abs() <= tower.stats.range
        });
        if let Some(unit) = target {
            unit.take_damage(tower.stats.damage);
            tower.last_attack_ms = Some(now_ms);
            shots += 1;
        }
    }
    shots
}

/// Build on an empty slot
pub fn build(side: &mut SideState, slot_id: usize, stats: &TowerStats) -> bool {
    let empty = side.towers.get(slot_id).is_some_and(TowerSlot::is_empty);
    if !empty || !side.spend_gold(stats.cost) {
        return false;
    }
    side.towers[slot_id].tower = Some(Tower::new(stats.clone()));
    true
}

/// Replace a tower with its successor, paying the cost difference
pub fn upgrade(side: &mut SideState, slot_id: usize, stats: &TowerStats) -> bool {
    let Some(current) = side.towers.get(slot_id).and_then(|s| s.tower.as_ref()) else {
        return false;
    };
    if stats.upgrade_from.as_deref() != Some(current.stats.name.as_str()) {
        return false;
    }
    let delta = (stats.cost - current.stats.cost).max(0.0);
    let last_attack_ms = current.last_attack_ms;
    if !side.spend_gold(delta) {
        return false;
    }
    side.towers[slot_id].tower = Some(Tower {
        stats: stats.clone(),
        last_attack_ms,
    });
    true
}

/// Remove a tower and refund its sell value
pub fn sell(side: &mut SideState, slot_id: usize) -> Option<f32> {
    let tower = side.towers.get_mut(slot_id)?.tower.take()?;
    side.gold += tower.stats.sell_value;
    Some(tower.stats.sell_value)
}
