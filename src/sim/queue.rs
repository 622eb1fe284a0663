//! Build queue: one production line per side
//!
//! Only the head item counts down. Items carry the upgrade-applied stats
//! captured when the gold was spent.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::consts::MAX_QUEUE_LEN;
use crate::tuning::UnitStats;

/// A unit in production
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildQueueItem {
    pub stats: UnitStats,
    pub side: Side,
    /// Time left before the unit takes the field
    pub remaining_ms: f32,
}

impl BuildQueueItem {
    pub fn new(stats: UnitStats, side: Side) -> Self {
        let remaining_ms = stats.build_time_ms.max(0.0);
        Self {
            stats,
            side,
            remaining_ms,
        }
    }
}

pub fn has_room(queue: &VecDeque<BuildQueueItem>) -> bool {
    queue.len() < MAX_QUEUE_LEN
}

/// Append an item if the queue has room
pub fn enqueue(queue: &mut VecDeque<BuildQueueItem>, item: BuildQueueItem) -> bool {
    if !has_room(queue) {
        return false;
    }
    queue.push_back(item);
    true
}

/// Count the head down by `dt_ms`; returns the head once it completes
pub fn advance(queue: &mut VecDeque<BuildQueueItem>, dt_ms: f32) -> Option<BuildQueueItem> {
    let head = queue.front_mut()?;
    head.remaining_ms -= dt_ms.max(0.0);
    if head.remaining_ms > 0.0 {
        return None;
    }
    head.remaining_ms = 0.0;
    queue.pop_front()
}

/// Progress of the head item in [0, 1]
pub fn head_progress(queue: &VecDeque<BuildQueueItem>) -> Option<f32> {
    queue.front().map(|item| {
        if item.stats.build_time_ms <= 0.0 {
            1.0
        } else {
            1.0 - item.remaining_ms / item.stats.build_time_ms
        }
    })
}
