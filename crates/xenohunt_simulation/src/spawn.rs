//! Spawn helpers: player, alien, prop
//!
//! Config передаётся явно, никаких глобальных синглтонов.

use bevy::prelude::*;

use crate::ai::{AIState, AITarget, Attacker, Perception};
use crate::combat::{HitSphere, Weapon};
use crate::components::{Health, NavigationIntent, PhysicsBody, Player, PlayerInput};
use crate::config::SimulationConfig;
use crate::movement::JumpTiming;
use crate::physics::KinematicController;

/// Радиус hit-сферы персонажей (метры)
pub const ACTOR_HIT_RADIUS: f32 = 0.5;

/// Player: здоровье, оружие, kinematic locomotion, jump timing
pub fn spawn_player(commands: &mut Commands, config: &SimulationConfig, position: Vec3) -> Entity {
    let movement = &config.movement;

    commands
        .spawn((
            Player,
            PlayerInput::default(),
            Transform::from_translation(position),
            Health::new(config.health.max_health),
            Weapon::new(config.weapon),
            KinematicController::from_config(movement),
            JumpTiming::new(movement.coyote_time, movement.jump_input_buffer_time),
            PhysicsBody::default(),
            HitSphere {
                radius: ACTOR_HIT_RADIUS,
            },
        ))
        .id()
}

/// Alien с FSM AI
///
/// `target == None`: misconfiguration, агент будет отключен (AIDisabled) на первом тике.
pub fn spawn_alien(
    commands: &mut Commands,
    config: &SimulationConfig,
    position: Vec3,
    target: Option<Entity>,
) -> Entity {
    let agent = config.agent;

    let mut alien = commands.spawn((
        Transform::from_translation(position),
        Health::new(config.health.max_health),
        AIState::default(),
        agent,
        Attacker::from_config(&agent),
        Perception::default(),
        NavigationIntent::new(agent.patrol_speed),
        HitSphere {
            radius: ACTOR_HIT_RADIUS,
        },
    ));

    if let Some(target) = target {
        alien.insert(AITarget(target));
    }

    alien.id()
}

/// Prop (стена, ящик, бочка)
///
/// `health == None`: неразрушимый, попадание = EnvironmentHit.
pub fn spawn_prop(
    commands: &mut Commands,
    position: Vec3,
    radius: f32,
    health: Option<f32>,
) -> Entity {
    let mut prop = commands.spawn((Transform::from_translation(position), HitSphere { radius }));

    if let Some(max) = health {
        prop.insert(Health::new(max));
    }

    prop.id()
}
