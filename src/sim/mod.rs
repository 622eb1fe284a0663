//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only enters through `Engine::tick`
//! - Seeded RNG only, owned by the bot
//! - Stable iteration order (spawn order for units, slot order for towers)
//! - No rendering or platform dependencies

pub mod ability;
pub mod bot;
pub mod engine;
pub mod ledger;
pub mod queue;
pub mod state;
pub mod tick;
pub mod tower;
pub mod unit;

pub use ability::AbilityCharge;
pub use bot::{Assessment, Bot, Opponent};
pub use engine::{Engine, SubscriptionId};
pub use ledger::SideState;
pub use queue::BuildQueueItem;
pub use state::{GameState, GameStatus, Side};
pub use tower::{Tower, TowerSlot};
pub use unit::{Combatant, Target, UnitStatus};
