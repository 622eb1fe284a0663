//! Per-side resources and progression
//!
//! Gold and XP accrue passively and from kills. Every spend goes through a
//! sufficiency check immediately before the debit, so neither can go negative.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::ability::AbilityCharge;
use super::queue::BuildQueueItem;
use super::state::Side;
use super::tower::{TowerSlot, default_slots};
use crate::consts::*;
use crate::tuning::{Tuning, UnitStats, Upgrade};

/// Resources, progression and production of one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideState {
    /// Base health (may dip below zero inside a tick, clamped at the win check)
    pub health: f32,
    pub gold: f32,
    pub xp: f32,
    /// Index into the tuning's ages
    pub age: usize,
    /// Purchased upgrade names
    pub upgrades: BTreeSet<String>,
    /// Owned abilities by name
    pub abilities: BTreeMap<String, AbilityCharge>,
    /// Units in production, head first
    pub queue: VecDeque<BuildQueueItem>,
    pub towers: Vec<TowerSlot>,
}

impl SideState {
    pub fn new(side: Side) -> Self {
        Self {
            health: MAX_HEALTH,
            gold: STARTING_GOLD,
            xp: STARTING_XP,
            age: 0,
            upgrades: BTreeSet::new(),
            abilities: BTreeMap::new(),
            queue: VecDeque::new(),
            towers: default_slots(side),
        }
    }

    /// Debit gold if there is enough (boundary inclusive)
    pub fn spend_gold(&mut self, cost: f32) -> bool {
        if self.gold >= cost {
            self.gold -= cost;
            true
        } else {
            false
        }
    }

    /// Debit XP if there is enough (boundary inclusive)
    pub fn spend_xp(&mut self, cost: f32) -> bool {
        if self.xp >= cost {
            self.xp -= cost;
            true
        } else {
            false
        }
    }

    /// XP required to leave the current age, if another age follows
    pub fn evolve_cost(&self, tuning: &Tuning) -> Option<f32> {
        if self.age >= tuning.last_age() {
            return None;
        }
        tuning.age(self.age).and_then(|a| a.xp_to_evolve)
    }

    /// Advance one age if affordable
    pub fn evolve(&mut self, tuning: &Tuning) -> bool {
        match self.evolve_cost(tuning) {
            Some(cost) if self.spend_xp(cost) => {
                self.age += 1;
                true
            }
            _ => false,
        }
    }

    pub fn owns_upgrade(&self, name: &str) -> bool {
        self.upgrades.contains(name)
    }

    /// Buy an upgrade once; repeats are no-ops
    pub fn purchase_upgrade(&mut self, upgrade: &Upgrade) -> bool {
        if self.owns_upgrade(&upgrade.name) || !self.spend_xp(upgrade.cost) {
            return false;
        }
        self.upgrades.insert(upgrade.name.clone());
        true
    }

    pub fn owns_ability(&self, name: &str) -> bool {
        self.abilities.contains_key(name)
    }
}

/// Base stats plus every owned upgrade targeting this unit
pub fn effective_stats(base: &UnitStats, owned: &BTreeSet<String>, tuning: &Tuning) -> UnitStats {
    let mut stats = base.clone();
    for upgrade in owned.iter().filter_map(|name| tuning.upgrade(name)) {
        if upgrade.unit_name == base.name {
            stats.apply(upgrade.stat, upgrade.value);
        }
    }
    stats
}

/// Passive income for both sides; `ai_multipliers` are (gold, xp)
pub fn accrue(player: &mut SideState, ai: &mut SideState, dt: f32, ai_multipliers: (f32, f32)) {
    let dt = dt.max(0.0);
    player.gold += GOLD_PER_SEC * dt;
    player.xp += XP_PER_SEC * dt;
    ai.gold += GOLD_PER_SEC * dt * ai_multipliers.0;
    ai.xp += XP_PER_SEC * dt * ai_multipliers.1;
}

/// Credit kill rewards
pub fn award_kills(side: &mut SideState, kills: u32) {
    side.gold += kills as f32 * GOLD_PER_KILL;
    side.xp += kills as f32 * XP_PER_KILL;
}
