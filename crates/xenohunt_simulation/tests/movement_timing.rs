//! Movement timing integration test
//!
//! Player на GroundPlane, headless ground check + integrator.
//! gravity = -16, dt = 0.125 → все скорости и позиции точные.

use std::time::Duration;

use bevy::prelude::*;
use xenohunt_simulation::*;

const DT: f32 = 0.125;

fn create_movement_app() -> (App, SimulationConfig) {
    let mut config = SimulationConfig::default();
    config.movement.gravity = -16.0;

    let mut app = App::new();
    app.init_resource::<Time>()
        .insert_resource(config.clone())
        .insert_resource(GroundPlane { height: 0.0 })
        .add_plugins(SimulationPlugin);
    (app, config)
}

fn spawn_player_at(app: &mut App, config: &SimulationConfig, position: Vec3) -> Entity {
    let world = app.world_mut();
    let player = {
        let mut commands = world.commands();
        spawn_player(&mut commands, config, position)
    };
    world.flush();
    player
}

fn tick(app: &mut App) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(DT));
    app.world_mut().run_schedule(FixedUpdate);
}

fn press_jump(app: &mut App, player: Entity) {
    app.world_mut()
        .get_mut::<PlayerInput>(player)
        .expect("player input")
        .jump_pressed = true;
}

fn jumps(app: &mut App) -> usize {
    app.world_mut()
        .resource_mut::<Events<JumpExecuted>>()
        .drain()
        .count()
}

fn height(app: &App, player: Entity) -> f32 {
    app.world()
        .get::<Transform>(player)
        .map(|transform| transform.translation.y)
        .unwrap_or(f32::NAN)
}

/// Test: прыжок с земли, одно нажатие = один прыжок, приземление
#[test]
fn test_jump_from_ground_once() {
    let (mut app, config) = create_movement_app();
    let player = spawn_player_at(&mut app, &config, Vec3::ZERO);

    tick(&mut app);
    press_jump(&mut app, player);
    tick(&mut app);

    assert_eq!(jumps(&mut app), 1);
    // v = 8 - 2 = 6, y = 6 * 0.125
    assert_eq!(height(&app, player), 0.75);
    assert_eq!(
        app.world().get::<PlayerInput>(player).map(|input| input.jump_pressed),
        Some(false)
    );

    // Полёт и приземление без повторного прыжка
    for _ in 0..12 {
        tick(&mut app);
    }
    assert_eq!(jumps(&mut app), 0);
    assert_eq!(height(&app, player), 0.0);
    assert_eq!(
        app.world().get::<KinematicController>(player).map(|c| c.grounded),
        Some(true)
    );
}

/// Test: coyote time: прыжок сразу после потери земли
#[test]
fn test_coyote_jump_after_ledge() {
    let (mut app, config) = create_movement_app();
    let player = spawn_player_at(&mut app, &config, Vec3::ZERO);

    tick(&mut app); // grounded в t = 0.125 → coyote до 0.275

    // "Сошли с уступа"
    app.world_mut()
        .get_mut::<Transform>(player)
        .expect("player transform")
        .translation
        .y = 2.0;

    press_jump(&mut app, player);
    tick(&mut app); // t = 0.25

    assert_eq!(jumps(&mut app), 1);
}

/// Test: нажатие после coyote окна игнорируется
#[test]
fn test_late_jump_after_ledge_ignored() {
    let (mut app, config) = create_movement_app();
    let player = spawn_player_at(&mut app, &config, Vec3::ZERO);

    tick(&mut app);
    app.world_mut()
        .get_mut::<Transform>(player)
        .expect("player transform")
        .translation
        .y = 2.0;

    tick(&mut app); // t = 0.25, в воздухе
    press_jump(&mut app, player);
    tick(&mut app); // t = 0.375 > 0.275

    assert_eq!(jumps(&mut app), 0);
    assert!(height(&app, player) < 2.0);
}

/// Test: jump buffer: нажали в воздухе, прыжок при приземлении
#[test]
fn test_buffered_jump_on_landing() {
    let (mut app, config) = create_movement_app();
    let player = spawn_player_at(&mut app, &config, Vec3::new(0.0, 0.2, 0.0));

    // t = 0.125: в воздухе, нажатие → buffer до 0.325; падение на пол
    press_jump(&mut app, player);
    tick(&mut app);
    assert_eq!(jumps(&mut app), 0);
    assert_eq!(height(&app, player), 0.0);

    // t = 0.25: grounded, buffer ещё жив
    tick(&mut app);
    assert_eq!(jumps(&mut app), 1);
    assert!(height(&app, player) > 0.0);
}

/// Test: ходьба по земле с walk_speed вдоль forward (-Z)
#[test]
fn test_walk_forward_on_ground() {
    let (mut app, config) = create_movement_app();
    let player = spawn_player_at(&mut app, &config, Vec3::ZERO);

    app.world_mut()
        .get_mut::<PlayerInput>(player)
        .expect("player input")
        .vertical = 1.0;

    for _ in 0..4 {
        tick(&mut app);
    }

    let position = app
        .world()
        .get::<Transform>(player)
        .map(|transform| transform.translation)
        .unwrap_or(Vec3::NAN);
    assert!(position.distance(Vec3::new(0.0, 0.0, -2.5)) < 1e-4);
}
