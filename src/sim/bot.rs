//! Opponent policy
//!
//! A bot is an ordinary client of the [`Engine`]: it reads the published
//! state and calls the same mutations the human input layer calls. Decisions
//! run on three cadences (main, towers, abilities), each gated by a timer
//! that shrinks as the match goes on.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::engine::Engine;
use super::state::{GameState, Side};
use crate::consts::MAX_HEALTH;
use crate::settings::{Difficulty, DifficultyProfile};
use crate::tuning::{AbilityKind, Tuning, UnitStats, Upgrade};

/// Situation summary computed at each decision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub own_units: usize,
    pub enemy_units: usize,
    pub health_ratio: f32,
    pub enemy_health_ratio: f32,
    /// Own gold over enemy gold
    pub gold_ratio: f32,
    /// Own age minus enemy age
    pub age_advantage: i32,
    /// Willingness to attack, in [0, 1]
    pub aggression: f32,
    pub under_pressure: bool,
}

impl Assessment {
    pub fn of(state: &GameState, side: Side, profile: &DifficultyProfile) -> Self {
        let own = state.side(side);
        let enemy = state.side(side.opponent());
        let own_units = state.live_units(side).count();
        let enemy_units = state.live_units(side.opponent()).count();
        let health_ratio = (own.health / MAX_HEALTH).clamp(0.0, 1.0);
        let enemy_health_ratio = (enemy.health / MAX_HEALTH).clamp(0.0, 1.0);
        let gold_ratio = own.gold / enemy.gold.max(1.0);
        let age_advantage = own.age as i32 - enemy.age as i32;
        let unit_edge = own_units as f32 - enemy_units as f32;

        let aggression = (profile.base_aggression
            + 0.1 * (gold_ratio.min(3.0) - 1.0)
            + 0.15 * age_advantage as f32
            + 0.25 * (health_ratio - enemy_health_ratio)
            + 0.05 * unit_edge)
            .clamp(0.0, 1.0);

        let under_pressure =
            enemy_units >= own_units + 2 || (health_ratio < 0.4 && enemy_units > own_units);

        Self {
            own_units,
            enemy_units,
            health_ratio,
            enemy_health_ratio,
            gold_ratio,
            age_advantage,
            aggression,
            under_pressure,
        }
    }
}

/// One mutation the bot has settled on
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Evolve,
    Upgrade(usize),
    Spawn(usize),
    BuildTower { slot: usize, tower: usize },
    UpgradeTower { slot: usize, tower: usize },
    BuyAbility(String),
    UseAbility(String),
}

impl Action {
    fn apply(&self, engine: &mut Engine, side: Side) -> bool {
        match self {
            Action::Evolve => engine.evolve(side),
            Action::Upgrade(index) => engine.purchase_upgrade(side, *index),
            Action::Spawn(index) => engine.spawn_unit(side, *index),
            Action::BuildTower { slot, tower } => engine.build_tower(side, *slot, *tower),
            Action::UpgradeTower { slot, tower } => engine.upgrade_tower(side, *slot, *tower),
            Action::BuyAbility(name) => engine.purchase_ability(side, name),
            Action::UseAbility(name) => engine.use_ability(side, name),
        }
    }
}

/// Something that plays a side from inside [`Engine::tick`]
pub trait Opponent {
    /// Run whatever decisions are due at `now_ms`
    fn update(&mut self, engine: &mut Engine, now_ms: f64);
    /// Forget per-match progress and reseed for a fresh match
    fn reset(&mut self, seed: u64);
}

/// Automated opponent for one side
#[derive(Debug, Clone)]
pub struct Bot<R: Rng = Pcg32> {
    side: Side,
    rng: R,
    /// Tier to play at; `None` follows the engine's selected difficulty
    difficulty: Option<Difficulty>,
    last_action_ms: f64,
    last_tower_ms: f64,
    last_ability_ms: f64,
    /// Successful spawns, drives the mixed composition rotation
    spawn_counter: u32,
}

impl Bot<Pcg32> {
    pub fn seeded(side: Side, seed: u64) -> Self {
        Self::new(side, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng + SeedableRng> Opponent for Bot<R> {
    fn update(&mut self, engine: &mut Engine, now_ms: f64) {
        Bot::update(self, engine, now_ms);
    }

    fn reset(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
        self.last_action_ms = 0.0;
        self.last_tower_ms = 0.0;
        self.last_ability_ms = 0.0;
        self.spawn_counter = 0;
    }
}

impl<R: Rng> Bot<R> {
    pub fn new(side: Side, rng: R) -> Self {
        Self {
            side,
            rng,
            difficulty: None,
            last_action_ms: 0.0,
            last_tower_ms: 0.0,
            last_ability_ms: 0.0,
            spawn_counter: 0,
        }
    }

    /// Pin the bot to a tier regardless of the engine's selection
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Run whichever cadences are due at `now_ms`
    pub fn update(&mut self, engine: &mut Engine, now_ms: f64) {
        if !engine.state().is_playing() {
            return;
        }
        let profile = match self.difficulty {
            Some(difficulty) => engine.settings().profile(difficulty).clone(),
            None => engine.profile().clone(),
        };
        let elapsed = engine.state().elapsed_ms;

        if now_ms - self.last_action_ms > profile.action_interval(elapsed) as f64 {
            self.last_action_ms = now_ms;
            let assessment = Assessment::of(engine.state(), self.side, &profile);
            if let Some(action) = self.decide(engine, &assessment, &profile) {
                log::debug!(
                    "{} bot (aggression {:.2}, pressure {}): {:?}",
                    self.side.as_str(),
                    assessment.aggression,
                    assessment.under_pressure,
                    action
                );
                let spawned = matches!(action, Action::Spawn(_));
                if action.apply(engine, self.side) && spawned {
                    self.spawn_counter += 1;
                }
            }
        }

        if profile.manages_towers
            && now_ms - self.last_tower_ms > profile.tower_interval(elapsed) as f64
        {
            self.last_tower_ms = now_ms;
            if let Some(action) = self.manage_towers(engine) {
                action.apply(engine, self.side);
            }
        }

        if now_ms - self.last_ability_ms > profile.ability_interval_ms as f64 {
            self.last_ability_ms = now_ms;
            for action in self.buy_abilities(engine, &profile) {
                action.apply(engine, self.side);
            }
            let assessment = Assessment::of(engine.state(), self.side, &profile);
            for action in self.use_abilities(engine, &assessment, &profile) {
                action.apply(engine, self.side);
            }
        }
    }

    /// Main priority: evolve, then upgrade, then spawn
    fn decide(
        &mut self,
        engine: &Engine,
        assessment: &Assessment,
        profile: &DifficultyProfile,
    ) -> Option<Action> {
        let tuning = engine.tuning();
        let own = engine.state().side(self.side);

        if let Some(cost) = own.evolve_cost(tuning) {
            let blocked = assessment.under_pressure && !profile.evolves_under_pressure;
            if own.xp >= cost && !blocked && self.roll(profile.evolve_chance) {
                return Some(Action::Evolve);
            }
        }

        let age = tuning.age(own.age)?;
        let upgrades: Vec<(usize, &Upgrade)> = age
            .upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| u.cost <= own.xp && !own.owns_upgrade(&u.name))
            .collect();
        if !upgrades.is_empty() && self.roll(profile.upgrade_chance) {
            if let Some(index) = pick_upgrade(&upgrades, assessment) {
                return Some(Action::Upgrade(index));
            }
        }

        self.pick_unit(&age.units, own.gold, assessment, profile)
            .map(Action::Spawn)
    }

    /// Unit index to spawn from the current age's roster
    fn pick_unit(
        &self,
        units: &[UnitStats],
        gold: f32,
        assessment: &Assessment,
        profile: &DifficultyProfile,
    ) -> Option<usize> {
        if assessment.under_pressure {
            return affordable(units, gold)
                .min_by(|a, b| a.1.cost.total_cmp(&b.1.cost))
                .map(|(i, _)| i);
        }
        if profile.mixes_composition {
            let want_ranged = self.spawn_counter % 3 == 2;
            let pool = affordable(units, gold).filter(|(_, u)| u.is_melee() != want_ranged);
            if let Some(index) = priciest(pool) {
                return Some(index);
            }
        }
        priciest(affordable(units, gold))
    }

    /// Fill the first empty slot, otherwise upgrade the first tower with an affordable successor
    fn manage_towers(&self, engine: &Engine) -> Option<Action> {
        let own = engine.state().side(self.side);
        let age = engine.tuning().age(own.age)?;

        let cheapest_base = age
            .towers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_base_tier() && t.cost <= own.gold)
            .min_by(|a, b| a.1.cost.total_cmp(&b.1.cost));
        if let Some((tower, _)) = cheapest_base {
            if let Some(slot) = own.towers.iter().find(|s| s.is_empty()) {
                return Some(Action::BuildTower { slot: slot.id, tower });
            }
        }

        own.towers.iter().find_map(|slot| {
            let current = slot.tower.as_ref()?;
            let (tower, next) = age.towers.iter().enumerate().find(|(_, t)| {
                t.upgrade_from.as_deref() == Some(current.stats.name.as_str())
            })?;
            let delta = (next.cost - current.stats.cost).max(0.0);
            (delta <= own.gold).then_some(Action::UpgradeTower {
                slot: slot.id,
                tower,
            })
        })
    }

    /// Purchases of unlocked, unowned abilities the bot can afford in order
    fn buy_abilities(&mut self, engine: &Engine, profile: &DifficultyProfile) -> Vec<Action> {
        let own = engine.state().side(self.side);
        let mut xp = own.xp;
        let mut actions = Vec::new();
        for ability in engine.tuning().unlocked_abilities(own.age) {
            if own.owns_ability(&ability.name) || ability.cost > xp {
                continue;
            }
            if self.roll(profile.ability_purchase_chance) {
                xp -= ability.cost;
                actions.push(Action::BuyAbility(ability.name.clone()));
            }
        }
        actions
    }

    /// Owned, ready abilities whose trigger condition holds
    fn use_abilities(
        &self,
        engine: &Engine,
        assessment: &Assessment,
        profile: &DifficultyProfile,
    ) -> Vec<Action> {
        let tuning = engine.tuning();
        let own = engine.state().side(self.side);
        let cheapest_unit = cheapest_unit_cost(tuning, own.age);

        own.abilities
            .keys()
            .filter(|name| engine.ability_cooldown(self.side, name) <= 0.0)
            .filter_map(|name| {
                let (_, stats) = tuning.ability(name)?;
                let fire = match stats.kind {
                    AbilityKind::AreaDamage => {
                        assessment.enemy_units >= profile.area_damage_min_enemies
                    }
                    AbilityKind::Heal => assessment.health_ratio < profile.heal_below,
                    AbilityKind::ResourceGrant => {
                        cheapest_unit.is_some_and(|cost| own.gold < cost)
                            || (profile.opportunistic_grants && assessment.aggression > 0.7)
                    }
                };
                fire.then(|| Action::UseAbility(name.clone()))
            })
            .collect()
    }

    fn roll(&mut self, chance: f32) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 {
            return false;
        }
        self.rng.random::<f32>() < chance
    }
}

/// Upgrade to buy from the affordable candidates
fn pick_upgrade(affordable: &[(usize, &Upgrade)], assessment: &Assessment) -> Option<usize> {
    let preferred = if assessment.under_pressure {
        affordable.iter().find(|(_, u)| u.stat.is_defensive())
    } else if assessment.aggression > 0.6 {
        affordable.iter().find(|(_, u)| !u.stat.is_defensive())
    } else {
        None
    };
    preferred.or(affordable.first()).map(|(i, _)| *i)
}

fn affordable(units: &[UnitStats], gold: f32) -> impl Iterator<Item = (usize, &UnitStats)> {
    units.iter().enumerate().filter(move |(_, u)| u.cost <= gold)
}

fn priciest<'a>(pool: impl Iterator<Item = (usize, &'a UnitStats)>) -> Option<usize> {
    pool.max_by(|a, b| a.1.cost.total_cmp(&b.1.cost)).map(|(i, _)| i)
}

fn cheapest_unit_cost(tuning: &Tuning, age: usize) -> Option<f32> {
    tuning
        .age(age)?
        .units
        .iter()
        .map(|u| u.cost)
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GameStatus;
    use crate::sim::tower::Tower;

    /// Settings where only the cadences a test enables ever fire
    fn hard_settings() -> Settings {
        let mut settings = Settings::with_difficulty(Difficulty::Hard);
        let hard = &mut settings.hard;
        hard.action_interval_ms = 1.0e9;
        hard.min_action_interval_ms = 1.0e9;
        hard.tower_interval_ms = 1.0e9;
        hard.min_tower_interval_ms = 1.0e9;
        hard.ability_interval_ms = 1.0e9;
        settings
    }

    fn engine_with(settings: Settings, state: GameState) -> Engine {
        let mut engine = Engine::from_state(settings, Tuning::default(), state);
        engine.take_opponent();
        engine
    }

    fn playing() -> GameState {
        let mut state = GameState::new();
        state.status = GameStatus::Playing;
        state
    }

    fn crowd(state: &mut GameState, side: Side, count: usize) {
        let clubman = Tuning::default().ages[0].units[0].clone();
        for _ in 0..count {
            state.spawn_unit(clubman.clone(), side);
        }
    }

    fn assessment(under_pressure: bool, aggression: f32) -> Assessment {
        Assessment {
            own_units: 0,
            enemy_units: 0,
            health_ratio: 1.0,
            enemy_health_ratio: 1.0,
            gold_ratio: 1.0,
            age_advantage: 0,
            aggression,
            under_pressure,
        }
    }

    #[test]
    fn test_assessment_detects_pressure() {
        let profile = DifficultyProfile::normal();
        let mut state = playing();
        crowd(&mut state, Side::Player, 2);
        let a = Assessment::of(&state, Side::Ai, &profile);
        assert_eq!((a.own_units, a.enemy_units), (0, 2));
        assert!(a.under_pressure);

        crowd(&mut state, Side::Ai, 1);
        assert!(!Assessment::of(&state, Side::Ai, &profile).under_pressure);

        state.ai.health = 300.0;
        let a = Assessment::of(&state, Side::Ai, &profile);
        assert!(a.under_pressure);
        assert!(a.aggression >= 0.0 && a.aggression <= 1.0);
    }

    #[test]
    fn test_aggression_rises_with_advantage() {
        let profile = DifficultyProfile::normal();
        let even = Assessment::of(&playing(), Side::Ai, &profile);
        assert!((even.aggression - profile.base_aggression).abs() < 0.001);

        let mut state = playing();
        state.ai.age = 1;
        state.player.health = 400.0;
        let ahead = Assessment::of(&state, Side::Ai, &profile);
        assert!(ahead.aggression > even.aggression);
        assert_eq!(ahead.age_advantage, 1);
    }

    #[test]
    fn test_unit_choice() {
        let units = Tuning::default().ages[0].units.clone();
        let normal = DifficultyProfile::normal();
        let hard = DifficultyProfile::hard();
        let mut bot = Bot::seeded(Side::Ai, 1);

        // Clubman 50, Slingshot 75
        assert_eq!(bot.pick_unit(&units, 200.0, &assessment(false, 0.3), &normal), Some(1));
        assert_eq!(bot.pick_unit(&units, 200.0, &assessment(true, 0.3), &normal), Some(0));
        assert_eq!(bot.pick_unit(&units, 60.0, &assessment(false, 0.3), &normal), Some(0));
        assert_eq!(bot.pick_unit(&units, 10.0, &assessment(false, 0.3), &normal), None);

        assert_eq!(bot.pick_unit(&units, 200.0, &assessment(false, 0.3), &hard), Some(0));
        bot.spawn_counter = 2;
        assert_eq!(bot.pick_unit(&units, 200.0, &assessment(false, 0.3), &hard), Some(1));
        // Ranged turn without ranged gold falls back to what is affordable
        assert_eq!(bot.pick_unit(&units, 60.0, &assessment(false, 0.3), &hard), Some(0));
    }

    #[test]
    fn test_upgrade_preference() {
        let tuning = Tuning::default();
        let upgrades: Vec<(usize, &Upgrade)> = tuning.ages[0].upgrades.iter().enumerate().collect();
        // Sharpened Sticks (damage), Tougher Hide (health), Bigger Rocks (damage)
        assert_eq!(pick_upgrade(&upgrades, &assessment(true, 0.9)), Some(1));
        assert_eq!(pick_upgrade(&upgrades, &assessment(false, 0.9)), Some(0));
        assert_eq!(pick_upgrade(&upgrades[1..2], &assessment(false, 0.9)), Some(1));
        assert_eq!(pick_upgrade(&upgrades[1..], &assessment(false, 0.3)), Some(1));
        assert_eq!(pick_upgrade(&[], &assessment(false, 0.3)), None);
    }

    #[test]
    fn test_evolves_first() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        let mut state = playing();
        state.ai.xp = 400.0;
        let mut engine = engine_with(settings, state);
        let gold = engine.state().ai.gold;

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert_eq!(engine.state().ai.age, 1);
        // Only one main action per pass
        assert_eq!(engine.state().ai.gold, gold);
        assert!(engine.state().ai.queue.is_empty());
    }

    #[test]
    fn test_normal_holds_evolution_under_pressure() {
        let mut settings = Settings::default();
        settings.normal.action_interval_ms = 0.0;
        settings.normal.min_action_interval_ms = 0.0;
        settings.normal.evolve_chance = 1.0;
        let mut state = playing();
        state.ai.xp = 400.0;
        crowd(&mut state, Side::Player, 3);
        let mut engine = engine_with(settings, state);

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert_eq!(engine.state().ai.age, 0);
    }

    #[test]
    fn test_buys_health_upgrade_under_pressure() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        settings.hard.upgrade_chance = 1.0;
        let mut state = playing();
        state.ai.xp = 150.0;
        crowd(&mut state, Side::Player, 2);
        let mut engine = engine_with(settings, state);

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.owns_upgrade("Tougher Hide"));
        assert_eq!(engine.state().ai.upgrades.len(), 1);
    }

    #[test]
    fn test_spawn_advances_rotation() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        let mut state = playing();
        state.ai.gold = 1000.0;
        let mut engine = engine_with(settings, state);
        let mut bot = Bot::seeded(Side::Ai, 1);

        for step in 1..=3 {
            bot.update(&mut engine, step as f64 * 16.0);
        }
        let names: Vec<&str> = engine
            .state()
            .ai
            .queue
            .iter()
            .map(|item| item.stats.name.as_str())
            .collect();
        assert_eq!(names, ["Clubman", "Clubman", "Slingshot"]);
        assert_eq!(bot.spawn_counter, 3);
    }

    #[test]
    fn test_reset_restarts_rotation_and_random_stream() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        let mut state = playing();
        state.ai.gold = 1000.0;
        let mut engine = engine_with(settings, state);
        let mut bot = Bot::seeded(Side::Ai, 1);
        bot.update(&mut engine, 16.0);
        let _: f32 = bot.rng.random();

        Opponent::reset(&mut bot, 1);
        assert_eq!(bot.spawn_counter, 0);
        assert_eq!(bot.last_action_ms, 0.0);
        let mut fresh = Bot::seeded(Side::Ai, 1);
        assert_eq!(bot.rng.random::<f32>(), fresh.rng.random::<f32>());
    }

    #[test]
    fn test_action_timer_gates_decisions() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 3000.0;
        settings.hard.min_action_interval_ms = 3000.0;
        let mut engine = engine_with(settings, playing());
        let mut bot = Bot::seeded(Side::Ai, 1);

        bot.update(&mut engine, 2000.0);
        assert!(engine.state().ai.queue.is_empty());
        bot.update(&mut engine, 3001.0);
        assert_eq!(engine.state().ai.queue.len(), 1);
        bot.update(&mut engine, 5000.0);
        assert_eq!(engine.state().ai.queue.len(), 1);
    }

    #[test]
    fn test_hard_builds_then_upgrades_towers() {
        let mut state = playing();
        state.ai.gold = 100.0;
        let mut engine = engine_with(hard_settings_with_towers(), state);
        let mut bot = Bot::seeded(Side::Ai, 1);

        bot.update(&mut engine, 16.0);
        let slot = &engine.state().ai.towers[0];
        assert_eq!(slot.tower.as_ref().map(|t| t.stats.name.as_str()), Some("Rock Slinger"));
        assert_eq!(engine.state().ai.gold, 0.0);

        // Broke: nothing to build, upgrade unaffordable
        bot.update(&mut engine, 32.0);
        assert!(engine.state().ai.towers[1].is_empty());

        let mut state = engine.snapshot();
        for slot in state.ai.towers.iter_mut().skip(1) {
            slot.tower = Some(Tower::new(Tuning::default().ages[0].towers[1].clone()));
        }
        state.ai.gold = 120.0;
        let mut engine = engine_with(hard_settings_with_towers(), state);
        bot.update(&mut engine, 48.0);
        let slot = &engine.state().ai.towers[0];
        assert_eq!(slot.tower.as_ref().map(|t| t.stats.name.as_str()), Some("Boulder Thrower"));
        assert_eq!(engine.state().ai.gold, 0.0);
    }

    fn hard_settings_with_towers() -> Settings {
        let mut settings = hard_settings();
        settings.hard.tower_interval_ms = 0.0;
        settings.hard.min_tower_interval_ms = 0.0;
        settings
    }

    #[test]
    fn test_normal_never_touches_towers() {
        let mut settings = Settings::default();
        settings.normal.tower_interval_ms = 0.0;
        settings.normal.min_tower_interval_ms = 0.0;
        settings.normal.action_interval_ms = 1.0e9;
        settings.normal.min_action_interval_ms = 1.0e9;
        let mut engine = engine_with(settings, playing());

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.towers.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_buys_and_fires_area_damage() {
        let mut settings = hard_settings();
        settings.hard.ability_interval_ms = 0.0;
        let mut state = playing();
        state.ai.xp = 150.0;
        crowd(&mut state, Side::Player, 3);
        let mut engine = engine_with(settings, state);

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.owns_ability("Rockfall"));
        assert!(!engine.state().ai.owns_ability("Tribal Remedy"));
        let rockfall = engine.tuning().ability("Rockfall").map(|(_, a)| a.magnitude);
        for unit in engine.state().live_units(Side::Player) {
            assert_eq!(Some(unit.max_health - unit.health), rockfall);
        }
        assert!(engine.ability_cooldown(Side::Ai, "Rockfall") > 0.0);
    }

    #[test]
    fn test_holds_area_damage_below_threshold() {
        let mut settings = hard_settings();
        settings.hard.ability_interval_ms = 0.0;
        let mut state = playing();
        state.ai.xp = 150.0;
        crowd(&mut state, Side::Player, 2);
        let mut engine = engine_with(settings, state);

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.owns_ability("Rockfall"));
        assert_eq!(engine.ability_cooldown(Side::Ai, "Rockfall"), 0.0);
    }

    #[test]
    fn test_heals_when_hurt() {
        let mut settings = hard_settings();
        settings.hard.ability_interval_ms = 0.0;
        let mut state = playing();
        state.ai.xp = 120.0;
        state.ai.health = 200.0;
        let mut engine = engine_with(settings, state);

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.owns_ability("Tribal Remedy"));
        assert_eq!(engine.state().ai.health, 350.0);
    }

    #[test]
    fn test_idle_outside_play() {
        let mut settings = hard_settings();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        let mut engine = engine_with(settings, GameState::new());

        Bot::seeded(Side::Ai, 1).update(&mut engine, 16.0);
        assert!(engine.state().ai.queue.is_empty());
    }

    #[test]
    fn test_player_side_bot_with_pinned_difficulty() {
        let mut settings = Settings::default();
        settings.hard.action_interval_ms = 0.0;
        settings.hard.min_action_interval_ms = 0.0;
        let mut engine = engine_with(settings, playing());

        let mut bot = Bot::seeded(Side::Player, 9).with_difficulty(Difficulty::Hard);
        assert_eq!(bot.side(), Side::Player);
        bot.update(&mut engine, 16.0);
        assert_eq!(engine.state().player.queue.len(), 1);
        assert!(engine.state().ai.queue.is_empty());
    }
}
