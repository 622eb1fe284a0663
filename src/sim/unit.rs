//! Combatants and their per-tick behavior
//!
//! Each unit seeks the nearest enemy ahead of it within range, otherwise walks
//! toward the enemy base and attacks it once close enough. Targets are stored
//! as lookup keys and re-resolved every tick, so a unit removed by the death
//! sweep never leaves a dangling reference behind.

use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::attack_interval_ms;
use crate::consts::MELEE_BASE_REACH;
use crate::tuning::UnitStats;

/// Behavioral status of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnitStatus {
    #[default]
    Walking,
    Attacking,
    /// Representable, never entered by the current rules
    Idle,
    Dead,
}

/// What a unit is engaging this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Enemy unit by ID
    Unit(u32),
    /// The enemy base
    Base,
}

/// Result of target acquisition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engagement {
    pub target: Target,
    /// Distance to the target along the lane
    pub distance: f32,
    /// Range at which the target can be hit
    pub reach: f32,
}

impl Engagement {
    pub fn in_reach(&self) -> bool {
        self.distance <= self.reach
    }
}

/// A unit on the battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: u32,
    /// Upgrade-applied stats, fixed at creation
    pub stats: UnitStats,
    pub side: Side,
    pub x: f32,
    pub max_health: f32,
    pub health: f32,
    /// Time until the next attack may land
    pub attack_cooldown_ms: f32,
    pub status: UnitStatus,
    /// Last tick's target, for display only
    pub target: Option<Target>,
}

impl Combatant {
    pub fn new(id: u32, stats: UnitStats, side: Side, x: f32) -> Self {
        Self {
            id,
            max_health: stats.health,
            health: stats.health,
            stats,
            side,
            x,
            attack_cooldown_ms: 0.0,
            status: UnitStatus::Walking,
            target: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
        if self.is_dead() {
            self.status = UnitStatus::Dead;
        }
    }

    /// Signed distance to `x` in this unit's direction of advance
    pub fn forward_distance(&self, x: f32) -> f32 {
        (x - self.x) * self.side.direction()
    }

    /// Pick this tick's target from the shared unit list
    pub fn find_target(&self, units: &[Combatant]) -> Engagement {
        let nearest = units
            .iter()
            .filter(|other| other.side != self.side && !other.is_dead())
            .map(|other| (other.id, self.forward_distance(other.x)))
            .filter(|&(_, distance)| distance > 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((id, distance)) = nearest {
            if distance <= self.stats.range {
                return Engagement {
                    target: Target::Unit(id),
                    distance,
                    reach: self.stats.range,
                };
            }
        }

        // Melee units could never close the clearance gap in front of a base
        let reach = if self.stats.is_melee() {
            self.stats.range.max(MELEE_BASE_REACH)
        } else {
            self.stats.range
        };
        Engagement {
            target: Target::Base,
            distance: (self.side.opponent().base_x() - self.x).abs(),
            reach,
        }
    }

    /// Move forward, never past the enemy base clearance
    fn advance(&mut self, dt: f32) {
        let x = self.x + self.stats.speed * dt * self.side.direction();
        let limit = self.side.advance_limit();
        self.x = match self.side {
            Side::Player => x.min(limit),
            Side::Ai => x.max(limit),
        };
    }
}

/// Advance every live unit by `dt` seconds.
///
/// `on_base_hit` receives the side whose base was struck and the damage dealt.
/// Units killed earlier in the same pass do not act.
pub fn update_units(units: &mut [Combatant], dt: f32, mut on_base_hit: impl FnMut(Side, f32)) {
    let dt = dt.max(0.0);
    let dt_ms = dt * 1000.0;

    for i in 0..units.len() {
        if units[i].is_dead() {
            units[i].status = UnitStatus::Dead;
            continue;
        }

        let engagement = units[i].find_target(units);
        let unit = &mut units[i];
        unit.attack_cooldown_ms = (unit.attack_cooldown_ms - dt_ms).max(0.0);
        unit.target = Some(engagement.target);

        let mut strike = None;
        if engagement.in_reach() {
            unit.status = UnitStatus::Attacking;
            if unit.attack_cooldown_ms <= 0.0 {
                unit.attack_cooldown_ms = attack_interval_ms(unit.stats.attack_speed);
                strike = Some((engagement.target, unit.stats.damage));
            }
        } else {
            unit.status = UnitStatus::Walking;
            unit.advance(dt);
        }

        let side = unit.side;
        match strike {
            Some((Target::Unit(id), damage)) => {
                if let Some(victim) = units.iter_mut().find(|u| u.id == id) {
                    victim.take_damage(damage);
                }
            }
            Some((Target::Base, damage)) => on_base_hit(side.opponent(), damage),
            None => {}
        }
    }
}
