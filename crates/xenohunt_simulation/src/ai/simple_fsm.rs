//! Simple FSM AI для alien
//!
//! Конечный автомат: Idle → Chase → Attack
//!
//! Архитектура:
//! - Mode пересчитывается КАЖДЫЙ тик из текущей дистанции до target (без памяти/hysteresis)
//! - Приоритет: Attack (≤ attack_range) > Chase (≤ sight_range) > Idle
//! - Attack cooldown гейтит только урон, не сам режим Attack
//! - Target: явная ссылка (AITarget), без глобального поиска игрока

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::events::AIModeChanged;
use crate::combat::{apply_hit, DamageDealt, DamageSource, Dead, EntityDied, Hit};
use crate::components::{Damageable, Health, NavigationIntent};

/// AI FSM состояния
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Idle: target вне sight range (movement intent не выдаётся)
    #[default]
    Idle,
    /// Chase: видим target, бежим к нему
    Chase,
    /// Attack: в радиусе атаки, стоим и бьём
    Attack,
}

/// Параметры AI
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Дистанция, на которой alien видит target (метры)
    pub sight_range: f32,
    /// Дистанция атаки (метры)
    pub attack_range: f32,
    /// Стартовая скорость навигации (m/s)
    pub patrol_speed: f32,
    /// Скорость погони (m/s)
    pub chase_speed: f32,
    /// Урон одной атаки
    pub attack_damage: f32,
    /// Cooldown между атаками (секунды)
    pub time_between_attacks: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            sight_range: 15.0,
            attack_range: 2.0,
            patrol_speed: 1.5,
            chase_speed: 3.5,
            attack_damage: 15.0,
            time_between_attacks: 1.5,
        }
    }
}

/// Кого alien воспринимает и атакует (инжектится при спавне)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AITarget(pub Entity);

/// Маркер: AI отключен из-за misconfiguration (нет target)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AIDisabled;

/// Последнее измерение perception oracle (обновляется каждый тик)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub distance: Option<f32>,
    pub target_position: Option<Vec3>,
}

/// Attacker: способность наносить урон вблизи с cooldown
///
/// Cooldown = абсолютный timestamp `ready_at`, не countdown.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Урон атаки
    pub base_damage: f32,
    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,
    ready_at: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self::from_config(&AIConfig::default())
    }
}

impl Attacker {
    pub fn from_config(config: &AIConfig) -> Self {
        Self {
            base_damage: config.attack_damage,
            attack_cooldown: config.time_between_attacks,
            ready_at: f32::NEG_INFINITY,
        }
    }

    /// Может ли атаковать (cooldown истёк)
    pub fn can_attack(&self, now: f32) -> bool {
        now >= self.ready_at
    }

    pub fn is_on_cooldown(&self, now: f32) -> bool {
        !self.can_attack(now)
    }

    /// Атака состоялась → армим cooldown
    pub fn start_attack(&mut self, now: f32) {
        self.ready_at = now + self.attack_cooldown.max(0.0);
    }

    pub fn ready_at(&self) -> f32 {
        self.ready_at
    }
}

/// Transition function: режим из текущей дистанции (stateless)
pub fn evaluate_mode(distance: f32, config: &AIConfig) -> AIState {
    if distance <= config.attack_range {
        AIState::Attack
    } else if distance <= config.sight_range {
        AIState::Chase
    } else {
        AIState::Idle
    }
}

/// Система: проверка конфигурации новых AI агентов
///
/// Нет target (или target entity не существует) → AIDisabled + одна ошибка в лог.
/// Процесс не падает, агент просто стоит.
pub fn validate_ai_agents(
    mut commands: Commands,
    agents: Query<(Entity, Option<&AITarget>), Added<AIState>>,
    positions: Query<(), With<Transform>>,
) {
    for (entity, target) in agents.iter() {
        let problem = match target {
            None => Some("no target assigned".to_string()),
            Some(AITarget(target)) if *target == entity => Some("agent targets itself".to_string()),
            Some(AITarget(target)) if !positions.contains(*target) => {
                Some(format!("target {:?} does not exist", target))
            }
            Some(_) => None,
        };

        if let Some(problem) = problem {
            crate::log_error(&format!("AI {:?} disabled: {}", entity, problem));
            commands.entity(entity).insert(AIDisabled);
        }
    }
}

/// Система: AI FSM transitions
///
/// Perception (дистанция между Transform) → AIState.
/// Мёртвый агент или пропавший/мёртвый target → Idle.
pub fn ai_fsm_transitions(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &AITarget,
            &AIConfig,
            Option<&Health>,
            &mut AIState,
            &mut Perception,
        ),
        (Without<AIDisabled>, Without<Dead>),
    >,
    targets: Query<(&Transform, Option<&Health>), Without<Dead>>,
    mut mode_events: EventWriter<AIModeChanged>,
) {
    for (entity, transform, target, config, health, mut state, mut perception) in agents.iter_mut() {
        let self_alive = health.is_none_or(|health| health.is_alive());

        let measured = targets
            .get(target.0)
            .ok()
            .filter(|(_, target_health)| target_health.is_none_or(|health| health.is_alive()))
            .map(|(target_transform, _)| {
                (
                    transform.translation.distance(target_transform.translation),
                    target_transform.translation,
                )
            });

        *perception = Perception {
            distance: measured.map(|(distance, _)| distance),
            target_position: measured.map(|(_, position)| position),
        };

        let new_state = match measured {
            Some((distance, _)) if self_alive => evaluate_mode(distance, config),
            _ => AIState::Idle,
        };

        if *state != new_state {
            crate::log(&format!("Alien {:?}: {:?} → {:?}", entity, *state, new_state));
            mode_events.write(AIModeChanged {
                agent: entity,
                from: *state,
                to: new_state,
            });
            *state = new_state;
        }
    }
}

/// Система: AI movement от FSM state
///
/// - Attack: стоим на месте (destination = своя позиция), смотрим на target
/// - Chase: destination = позиция target, speed = chase_speed
/// - Idle: intent не трогаем
pub fn ai_movement_from_state(
    mut agents: Query<
        (&mut Transform, &AIState, &AIConfig, &Perception, &mut NavigationIntent),
        (Without<AIDisabled>, Without<Dead>),
    >,
) {
    for (mut transform, state, config, perception, mut intent) in agents.iter_mut() {
        let Some(target_position) = perception.target_position else {
            continue;
        };

        match state {
            AIState::Attack => {
                intent.destination = Some(transform.translation);
                if transform.translation.distance_squared(target_position) > f32::EPSILON {
                    transform.look_at(target_position, Vec3::Y);
                }
            }
            AIState::Chase => {
                intent.speed = config.chase_speed;
                intent.destination = Some(target_position);
            }
            AIState::Idle => {}
        }
    }
}

/// Система: AI attack execution
///
/// Attack + cooldown готов → урон target через Damageable, cooldown армится.
pub fn ai_attack_execution(
    mut agents: Query<(Entity, &AIState, &AITarget, &mut Attacker), (Without<AIDisabled>, Without<Dead>)>,
    mut targets: Query<&mut Health>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for (entity, state, target, mut attacker) in agents.iter_mut() {
        if *state != AIState::Attack || attacker.is_on_cooldown(now) {
            continue;
        }

        crate::log(&format!("Alien {:?}: attacking {:?}", entity, target.0));

        if let Ok(mut health) = targets.get_mut(target.0) {
            apply_hit(
                target.0,
                &mut *health,
                Hit {
                    attacker: Some(entity),
                    amount: attacker.base_damage,
                    source: DamageSource::Melee,
                },
                &mut damage_events,
                &mut death_events,
            );
        }

        attacker.start_attack(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_state_default() {
        let state = AIState::default();
        assert_eq!(state, AIState::Idle);
    }

    #[test]
    fn test_ai_config_default() {
        let config = AIConfig::default();
        assert_eq!(config.sight_range, 15.0);
        assert_eq!(config.attack_range, 2.0);
        assert_eq!(config.patrol_speed, 1.5);
        assert_eq!(config.chase_speed, 3.5);
        assert_eq!(config.attack_damage, 15.0);
        assert_eq!(config.time_between_attacks, 1.5);
    }

    #[test]
    fn test_mode_from_distance() {
        let config = AIConfig::default();

        assert_eq!(evaluate_mode(1.0, &config), AIState::Attack);
        assert_eq!(evaluate_mode(10.0, &config), AIState::Chase);
        assert_eq!(evaluate_mode(20.0, &config), AIState::Idle);
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        let config = AIConfig::default();

        assert_eq!(evaluate_mode(2.0, &config), AIState::Attack);
        assert_eq!(evaluate_mode(15.0, &config), AIState::Chase);
        assert_eq!(evaluate_mode(15.001, &config), AIState::Idle);
    }

    #[test]
    fn test_attack_wins_over_chase() {
        // attack_range > sight_range: всё равно Attack первым
        let config = AIConfig {
            sight_range: 1.0,
            attack_range: 3.0,
            ..default()
        };
        assert_eq!(evaluate_mode(2.0, &config), AIState::Attack);
    }

    #[test]
    fn test_nan_distance_is_idle() {
        assert_eq!(evaluate_mode(f32::NAN, &AIConfig::default()), AIState::Idle);
    }

    #[test]
    fn test_attacker_cooldown() {
        let mut attacker = Attacker::default();
        assert!(attacker.can_attack(0.0));

        attacker.start_attack(1.0);
        assert!(attacker.is_on_cooldown(1.0));
        assert!(attacker.is_on_cooldown(2.0));
        assert_eq!(attacker.ready_at(), 2.5);

        assert!(attacker.can_attack(2.5));
    }
}
