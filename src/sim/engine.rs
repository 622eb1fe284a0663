//! The simulation engine
//!
//! Owns the authoritative `GameState` and exposes the only mutation surface.
//! The human input layer and the opponent bot both go through the same
//! methods; failed preconditions are silent no-ops that return `false`.

use super::ability;
use super::bot::{Bot, Opponent};
use super::ledger::effective_stats;
use super::queue::{self, BuildQueueItem};
use super::state::{GameState, GameStatus, Side};
use super::tick;
use super::tower;
use crate::settings::{Difficulty, DifficultyProfile, Settings};
use crate::tuning::{Tuning, UnitStats};

/// Handle returned by [`Engine::subscribe`]
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&GameState)>;

/// Match driver and mutation API
pub struct Engine {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    difficulty: Difficulty,
    /// Opponent driving the AI side, taken out while it runs
    bot: Option<Box<dyn Opponent>>,
    /// `now` of the latest tick
    clock_ms: f64,
    /// Mutations during a tick publish once at its end
    in_tick: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Engine {
    /// New match using the settings' tuning (stock tables unless overridden)
    pub fn new(settings: Settings) -> Self {
        let tuning = settings.tuning();
        Self::with_tuning(settings, tuning)
    }

    pub fn with_tuning(settings: Settings, tuning: Tuning) -> Self {
        Self::from_state(settings, tuning, GameState::new())
    }

    /// Resume from an existing state
    pub fn from_state(settings: Settings, tuning: Tuning, state: GameState) -> Self {
        let difficulty = settings.difficulty;
        let bot: Option<Box<dyn Opponent>> = Some(Box::new(Bot::seeded(Side::Ai, settings.seed)));
        Self {
            state,
            tuning,
            settings,
            difficulty,
            bot,
            clock_ms: 0.0,
            in_tick: false,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    // === Read access ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned point-in-time copy of the state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Profile of the selected difficulty
    pub fn profile(&self) -> &DifficultyProfile {
        self.settings.profile(self.difficulty)
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    // === Subscriptions ===

    /// Register a callback receiving every published state
    pub fn subscribe(&mut self, listener: impl FnMut(&GameState) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        if self.in_tick {
            return;
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    // === Opponent ===

    /// Replace the AI-side opponent, e.g. a [`Bot`] over another random source
    pub fn set_opponent(&mut self, opponent: impl Opponent + 'static) {
        self.bot = Some(Box::new(opponent));
    }

    /// Remove and return the AI-side opponent, leaving the AI side idle
    pub fn take_opponent(&mut self) -> Option<Box<dyn Opponent>> {
        self.bot.take()
    }

    // === Match flow ===

    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::StartScreen {
            log::debug!("Start ignored outside the start screen");
            return false;
        }
        self.state.status = GameStatus::Playing;
        log::info!("Match started ({})", self.difficulty.as_str());
        self.notify();
        true
    }

    /// Fresh match, keeping the selected difficulty and the attached opponent
    pub fn restart(&mut self) {
        self.state = GameState::new();
        if let Some(bot) = self.bot.as_mut() {
            bot.reset(self.settings.seed);
        }
        log::info!("Match reset");
        self.notify();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            log::info!("Difficulty set to {}", difficulty.as_str());
        }
        self.difficulty = difficulty;
    }

    /// Advance the match by `dt_secs`, with `now_ms` from the caller's monotonic clock
    pub fn tick(&mut self, dt_secs: f32, now_ms: f64) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        let dt = dt_secs.max(0.0);
        self.clock_ms = now_ms;
        self.in_tick = true;
        self.state.elapsed_ms += dt as f64 * 1000.0;

        let multipliers = self.profile().income_multipliers(self.state.elapsed_ms);
        tick::accrue_income(&mut self.state, dt, multipliers);
        tick::advance_build_queues(&mut self.state, dt);

        if let Some(mut bot) = self.bot.take() {
            bot.update(self, now_ms);
            self.bot = Some(bot);
        }

        let (player_shots, ai_shots) = tick::advance_towers(&mut self.state, now_ms);
        if player_shots + ai_shots > 0 {
            log::debug!("Tower shots this tick: player {}, AI {}", player_shots, ai_shots);
        }
        tick::advance_units(&mut self.state, dt);
        let (player_kills, ai_kills) = tick::sweep_dead(&mut self.state);
        if player_kills + ai_kills > 0 {
            log::debug!("Kills this tick: player {}, AI {}", player_kills, ai_kills);
        }
        if let Some(winner) = tick::check_game_over(&mut self.state) {
            log::info!(
                "Game over after {:.1}s: {} wins",
                self.state.elapsed_ms / 1000.0,
                winner.as_str()
            );
        }

        self.in_tick = false;
        self.notify();
    }

    // === Mutations ===

    /// Queue a unit from the side's current age
    pub fn spawn_unit(&mut self, side: Side, unit_index: usize) -> bool {
        if !self.state.is_playing() {
            return rejected(side, "spawn");
        }
        let age = self.state.side(side).age;
        let Some(base) = self
            .tuning
            .age(age)
            .and_then(|a| a.units.get(unit_index))
            .cloned()
        else {
            return rejected(side, "spawn of an unknown unit");
        };
        self.enqueue_unit(side, base)
    }

    /// Queue a unit named by a stat block.
    ///
    /// Only the name is read: it must belong to the side's current age, and
    /// the table entry for it is what gets paid for and built.
    pub fn spawn_stats(&mut self, side: Side, stats: &UnitStats) -> bool {
        if !self.state.is_playing() {
            return rejected(side, "spawn");
        }
        let age = self.state.side(side).age;
        let Some(base) = self
            .tuning
            .age(age)
            .and_then(|a| a.units.iter().find(|u| u.name == stats.name))
            .cloned()
        else {
            return rejected(side, "spawn of a unit outside the current age");
        };
        self.enqueue_unit(side, base)
    }

    fn enqueue_unit(&mut self, side: Side, base: UnitStats) -> bool {
        let tuning = &self.tuning;
        let s = self.state.side_mut(side);
        if s.gold < base.cost {
            return rejected(side, "spawn");
        }
        let stats = effective_stats(&base, &s.upgrades, tuning);
        if !queue::enqueue(&mut s.queue, BuildQueueItem::new(stats, side)) {
            return rejected(side, "spawn into a full queue");
        }
        s.gold -= base.cost;
        log::debug!("{} queued {}", side.as_str(), base.name);
        self.notify();
        true
    }

    pub fn evolve(&mut self, side: Side) -> bool {
        if !self.state.is_playing() || !self.state.side_mut(side).evolve(&self.tuning) {
            return rejected(side, "evolve");
        }
        let age = self.state.side(side).age;
        log::info!(
            "{} evolved to {}",
            side.as_str(),
            self.tuning.age(age).map_or("?", |a| a.name.as_str())
        );
        self.notify();
        true
    }

    /// Buy an upgrade from the side's current age
    pub fn purchase_upgrade(&mut self, side: Side, upgrade_index: usize) -> bool {
        let age = self.state.side(side).age;
        let upgrade = self.tuning.age(age).and_then(|a| a.upgrades.get(upgrade_index));
        let bought = match upgrade {
            Some(upgrade) if self.state.is_playing() => {
                self.state.side_mut(side).purchase_upgrade(upgrade)
            }
            _ => false,
        };
        let Some(upgrade) = upgrade.filter(|_| bought) else {
            return rejected(side, "upgrade");
        };
        log::debug!("{} bought upgrade {}", side.as_str(), upgrade.name);
        self.notify();
        true
    }

    /// Build a tower from the side's current age on an empty slot
    pub fn build_tower(&mut self, side: Side, slot_id: usize, tower_index: usize) -> bool {
        let age = self.state.side(side).age;
        let stats = self.tuning.age(age).and_then(|a| a.towers.get(tower_index));
        let built = match stats {
            Some(stats) if self.state.is_playing() => {
                tower::build(self.state.side_mut(side), slot_id, stats)
            }
            _ => false,
        };
        let Some(stats) = stats.filter(|_| built) else {
            return rejected(side, "tower build");
        };
        log::debug!("{} built {} on slot {}", side.as_str(), stats.name, slot_id);
        self.notify();
        true
    }

    /// Replace a tower with its successor from the side's current age
    pub fn upgrade_tower(&mut self, side: Side, slot_id: usize, tower_index: usize) -> bool {
        let age = self.state.side(side).age;
        let stats = self.tuning.age(age).and_then(|a| a.towers.get(tower_index));
        let upgraded = match stats {
            Some(stats) if self.state.is_playing() => {
                tower::upgrade(self.state.side_mut(side), slot_id, stats)
            }
            _ => false,
        };
        let Some(stats) = stats.filter(|_| upgraded) else {
            return rejected(side, "tower upgrade");
        };
        log::debug!("{} upgraded slot {} to {}", side.as_str(), slot_id, stats.name);
        self.notify();
        true
    }

    pub fn sell_tower(&mut self, side: Side, slot_id: usize) -> bool {
        if !self.state.is_playing() {
            return rejected(side, "tower sale");
        }
        let Some(refund) = tower::sell(self.state.side_mut(side), slot_id) else {
            return rejected(side, "tower sale");
        };
        log::debug!("{} sold slot {} for {}", side.as_str(), slot_id, refund);
        self.notify();
        true
    }

    pub fn purchase_ability(&mut self, side: Side, name: &str) -> bool {
        let bought = match self.tuning.ability(name) {
            Some((unlock_age, stats)) if self.state.is_playing() => {
                ability::purchase(self.state.side_mut(side), stats, unlock_age)
            }
            _ => false,
        };
        if !bought {
            return rejected(side, "ability purchase");
        }
        log::debug!("{} bought ability {}", side.as_str(), name);
        self.notify();
        true
    }

    /// Use an owned ability at the engine clock; `false` if it had no effect
    pub fn use_ability(&mut self, side: Side, name: &str) -> bool {
        let used = match self.tuning.ability(name) {
            Some((_, stats)) if self.state.is_playing() => {
                ability::activate(&mut self.state, side, stats, self.clock_ms)
            }
            _ => false,
        };
        if !used {
            return rejected(side, "ability use");
        }
        log::info!("{} used {}", side.as_str(), name);
        self.notify();
        true
    }

    /// Milliseconds until `side` can use `name` again (0 if ready or never used)
    pub fn ability_cooldown(&self, side: Side, name: &str) -> f64 {
        let charge = self.state.side(side).abilities.get(name);
        match (charge, self.tuning.ability(name)) {
            (Some(charge), Some((_, stats))) => charge.remaining_ms(stats, self.clock_ms),
            _ => 0.0,
        }
    }
}

/// Log a refused mutation; always `false`
fn rejected(side: Side, action: &str) -> bool {
    log::debug!("{} {} rejected", side.as_str(), action);
    false
}
