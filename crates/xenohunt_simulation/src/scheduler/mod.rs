//! Deferred actions: отложенные side effects по времени симуляции
//!
//! Вместо корутин: очередь {action, due time, owner}, которую раз в тик
//! разбирает `run_deferred_actions`.
//!
//! Гарантии:
//! - actions выполняются в порядке due time (при равенстве: в порядке `schedule`)
//! - никогда раньше своего due time
//! - если owner entity уже не существует: action молча пропускается

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::SimulationSet;

/// Что сделать, когда наступит время
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Убрать entity из симуляции (труп после смерти)
    Despawn,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: f32,
    seq: u64,
    owner: Entity,
    action: DeferredAction,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap: max-heap, поэтому сравнение перевёрнуто (раньше due/seq = "больше")
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Очередь отложенных actions (min-heap по due time)
#[derive(Resource, Debug, Default)]
pub struct DeferredActions {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl DeferredActions {
    pub fn schedule(&mut self, owner: Entity, due: f32, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due,
            seq,
            owner,
            action,
        });
    }

    /// Достать следующий action, чей due time уже наступил
    pub fn pop_due(&mut self, now: f32) -> Option<(Entity, DeferredAction)> {
        if self.queue.peek().is_some_and(|entry| entry.due <= now) {
            self.queue.pop().map(|entry| (entry.owner, entry.action))
        } else {
            None
        }
    }

    pub fn next_due(&self) -> Option<f32> {
        self.queue.peek().map(|entry| entry.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// System: выполнить все наступившие actions
pub fn run_deferred_actions(
    mut commands: Commands,
    mut deferred: ResMut<DeferredActions>,
    existing: Query<Entity>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    while let Some((owner, action)) = deferred.pop_due(now) {
        if !existing.contains(owner) {
            // Owner уже уничтожен: action больше не актуален
            continue;
        }

        match action {
            DeferredAction::Despawn => {
                if let Ok(mut entity_commands) = commands.get_entity(owner) {
                    entity_commands.despawn();
                    crate::log(&format!("Despawned {:?}", owner));
                }
            }
        }
    }
}

/// Scheduler Plugin
pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeferredActions>().add_systems(
            FixedUpdate,
            run_deferred_actions.in_set(SimulationSet::Deferred),
        );
    }
}
