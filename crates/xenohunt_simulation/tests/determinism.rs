//! Тесты детерминизма
//!
//! Проверяем что симуляция с одинаковым seed даёт идентичные результаты:
//! scripted input из DeterministicRng, фиксированный шаг времени.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use xenohunt_simulation::{
    create_headless_app, spawn_alien, spawn_player, spawn_prop, world_snapshot, DeterministicRng,
    Health, PlayerInput, SimulationConfig, SimulationSet,
};

/// Scripted input: случайные fire/reload/jump/оси из seeded RNG
fn scripted_input(mut rng: ResMut<DeterministicRng>, mut players: Query<&mut PlayerInput>) {
    for mut input in players.iter_mut() {
        input.fire_held = rng.rng.gen_bool(0.6);
        input.reload_pressed |= rng.rng.gen_bool(0.02);
        input.jump_pressed |= rng.rng.gen_bool(0.05);
        input.horizontal = rng.rng.gen_range(-1.0..=1.0);
        input.vertical = rng.rng.gen_range(-1.0..=1.0);
        input.run = rng.rng.gen_bool(0.3);
    }
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )))
    .add_systems(FixedUpdate, scripted_input.before(SimulationSet::Weapons));

    let config = SimulationConfig::default();
    let world = app.world_mut();
    {
        let mut commands = world.commands();
        let player = spawn_player(&mut commands, &config, Vec3::ZERO);
        spawn_alien(&mut commands, &config, Vec3::new(0.0, 0.0, -12.0), Some(player));
        spawn_alien(&mut commands, &config, Vec3::new(6.0, 0.0, -8.0), Some(player));
        spawn_prop(&mut commands, Vec3::new(-3.0, 0.0, -5.0), 1.0, Some(40.0));
    }
    world.flush();

    for _ in 0..tick_count {
        app.update();
    }

    (
        world_snapshot::<Transform>(app.world_mut()),
        world_snapshot::<Health>(app.world_mut()),
    )
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 600;

    let run1 = run_simulation(SEED, TICK_COUNT);
    let run2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        run1, run2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 300;

    // Запускаем 3 раза: все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_plugin_keeps_host_seed() {
    let app = create_headless_app(777);
    assert_eq!(app.world().resource::<DeterministicRng>().seed, 777);
}
