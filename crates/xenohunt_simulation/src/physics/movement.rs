//! Kinematic контроллер для игрока + headless integrator/navigation
//!
//! Архитектура:
//! - Симуляция считает только желаемую velocity (PhysicsBody), коллизии: host
//! - Ground contact: внешний oracle (KinematicController::grounded)
//! - Headless режим: GroundPlane → ground check + интеграция, HeadlessNavigation → AI движение
//!
//! Детерминизм: fixed timestep, все вычисления от Time::delta

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{Dead, GroundPlane};
use crate::components::{NavigationIntent, PhysicsBody, Player, PlayerInput};
use crate::movement::{JumpExecuted, JumpTiming};

/// Допуск ground check над плоскостью (метры)
pub const GROUND_TOLERANCE: f32 = 0.05;

/// Скорость выравнивания горизонтальной velocity в воздухе (1/s)
pub const AIR_CONTROL: f32 = 5.0;

/// Параметры locomotion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,
    /// m/s², отрицательная = вниз
    pub gravity: f32,
    pub jump_input_buffer_time: f32,
    pub coyote_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 8.0,
            jump_force: 8.0,
            gravity: -19.62, // 2g, прыжок ощущается "тяжелее"
            jump_input_buffer_time: 0.2,
            coyote_time: 0.15,
        }
    }
}

/// Kinematic контроллер компонент
///
/// Управляет движением персонажа (WASD + run + jump + gravity).
/// `grounded` пишет физический collaborator (или `detect_ground_contact` в headless).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub grounded: bool,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl KinematicController {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            jump_force: config.jump_force,
            gravity: config.gravity,
            grounded: false,
        }
    }
}

/// Маркер-ресурс: включает straight-line навигацию для NavigationIntent
///
/// В игре путь строит NavigationAgent host'а, здесь: только для тестов/demo.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HeadlessNavigation;

/// Один тик locomotion: новая velocity + был ли прыжок
///
/// Landing reset + горизонталь → `JumpTiming::update` (press, ground, jump check) →
/// gravity. Решение о прыжке принимает только `JumpTiming`.
#[allow(clippy::too_many_arguments)]
pub fn step_locomotion(
    controller: &KinematicController,
    timing: &mut JumpTiming,
    velocity: Vec3,
    desired_move: Vec3,
    run: bool,
    jump_pressed: bool,
    now: f32,
    dt: f32,
) -> (Vec3, bool) {
    let speed = if run { controller.run_speed } else { controller.walk_speed };
    let mut horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let mut vertical = velocity.y;

    if controller.grounded {
        if vertical < 0.0 {
            vertical = 0.0;
        }
        horizontal = desired_move.normalize_or_zero() * speed;
    } else {
        let t = (dt * AIR_CONTROL).clamp(0.0, 1.0);
        horizontal = horizontal.lerp(desired_move * speed, t);
    }

    let jumped = timing.update(now, controller.grounded, jump_pressed);
    if jumped {
        vertical = controller.jump_force;
    }

    vertical += controller.gravity * dt;

    (Vec3::new(horizontal.x, vertical, horizontal.z), jumped)
}

/// Система: player input → PhysicsBody.velocity
///
/// Jump edge забирается из PlayerInput (одно нажатие = один запрос).
pub fn player_locomotion(
    mut players: Query<
        (
            Entity,
            &Transform,
            &KinematicController,
            &mut PlayerInput,
            &mut JumpTiming,
            &mut PhysicsBody,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut jump_events: EventWriter<JumpExecuted>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for (entity, transform, controller, mut input, mut timing, mut body) in players.iter_mut() {
        let forward = transform.forward().with_y(0.0);
        let right = transform.right().with_y(0.0);
        let desired_move = forward * input.vertical + right * input.horizontal;
        let jump_pressed = input.take_jump();

        let (velocity, jumped) = step_locomotion(
            controller,
            &mut timing,
            body.velocity,
            desired_move,
            input.run,
            jump_pressed,
            now,
            dt,
        );
        body.velocity = velocity;

        if jumped {
            crate::log(&format!("Player {:?}: jump", entity));
            jump_events.write(JumpExecuted { entity });
        }
    }
}

/// Система ground detection через GroundPlane (headless oracle)
pub fn detect_ground_contact(
    mut query: Query<(&Transform, &mut KinematicController)>,
    ground: Res<GroundPlane>,
) {
    for (transform, mut controller) in query.iter_mut() {
        controller.grounded = transform.translation.y <= ground.height + GROUND_TOLERANCE;
    }
}

/// Система интеграции velocity → Transform (headless режим)
///
/// position += velocity * dt, затем clamp на GroundPlane.
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform), With<KinematicController>>,
    ground: Res<GroundPlane>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;
        transform.translation.y = transform.translation.y.max(ground.height);
    }
}

/// Система straight-line навигации к NavigationIntent::destination
///
/// Движение только в горизонтальной плоскости, без overshoot.
pub fn follow_navigation_intent(
    mut agents: Query<(&NavigationIntent, &mut Transform), (Without<Player>, Without<Dead>)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (intent, mut transform) in agents.iter_mut() {
        let Some(destination) = intent.destination else {
            continue;
        };

        let offset = (destination - transform.translation).with_y(0.0);
        let distance = offset.length();
        if distance <= f32::EPSILON {
            continue;
        }

        let step = (intent.speed.max(0.0) * delta).min(distance);
        transform.translation += offset / distance * step;
    }
}
