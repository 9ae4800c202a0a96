//! Damage application + death handling
//!
//! Все источники урона (weapon, AI attack) идут через `apply_hit`:
//! - Health::apply_damage (capability Damageable)
//! - DamageDealt event на каждое применение
//! - EntityDied event ровно один раз (только на `DamageOutcome::Killed`)
//!
//! Смерть: маркер Dead сразу (цель больше не targetable),
//! despawn через DeferredActions после `corpse_linger_seconds`.

use bevy::prelude::*;

use crate::components::{DamageOutcome, Damageable};
use crate::config::SimulationConfig;
use crate::scheduler::{DeferredAction, DeferredActions};

/// Источник урона (для presentation: разные звуки/эффекты)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageSource {
    /// Выстрел оружия (hitscan)
    Ranged,
    /// Атака AI вблизи
    Melee,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    /// Health цели после урона
    pub remaining: f32,
    pub source: DamageSource,
}

/// Событие: entity умер (health ≤ 0), death notification
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// Ставится в тот же тик, что и EntityDied. AI и hit query его пропускают.
#[derive(Component, Debug)]
pub struct Dead;

/// Описание одного удара
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub attacker: Option<Entity>,
    pub amount: f32,
    pub source: DamageSource,
}

/// Применить удар к цели и сгенерировать события
///
/// Мёртвая цель → `Ignored`, никаких событий.
pub fn apply_hit<D: Damageable + ?Sized>(
    target: Entity,
    health: &mut D,
    hit: Hit,
    damage_events: &mut EventWriter<DamageDealt>,
    death_events: &mut EventWriter<EntityDied>,
) -> DamageOutcome {
    let outcome = health.apply_damage(hit.amount);
    if outcome == DamageOutcome::Ignored {
        return outcome;
    }

    damage_events.write(DamageDealt {
        attacker: hit.attacker,
        target,
        amount: hit.amount.max(0.0),
        remaining: health.remaining_health(),
        source: hit.source,
    });

    crate::log(&format!(
        "{:?} took {} damage ({:?}), remaining health: {}",
        target,
        hit.amount,
        hit.source,
        health.remaining_health()
    ));

    if outcome == DamageOutcome::Killed {
        death_events.write(EntityDied {
            entity: target,
            killer: hit.attacker,
        });
        crate::log_info(&format!("{:?} has died (killer: {:?})", target, hit.attacker));
    }

    outcome
}

/// Система: обработка смертей
///
/// Ставит Dead и планирует удаление entity из симуляции.
pub fn process_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut deferred: ResMut<DeferredActions>,
    config: Res<SimulationConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    let linger = config.health.corpse_linger_seconds.max(0.0);

    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
            deferred.schedule(event.entity, now + linger, DeferredAction::Despawn);
        }
    }
}
