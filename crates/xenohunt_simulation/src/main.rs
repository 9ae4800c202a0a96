//! Headless симуляция XENOHUNT
//!
//! Player против alien'ов в коридоре, input генерируется из DeterministicRng.
//! Время двигается фиксированными шагами 1/60: прогон полностью воспроизводим.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use xenohunt_simulation::*;

const TICKS: usize = 1200;

/// Счётчики событий за прогон
#[derive(Resource, Debug, Default)]
struct DemoStats {
    shots: usize,
    hits: usize,
    reloads: usize,
    jumps: usize,
    deaths: Vec<Entity>,
}

/// Scripted input: в основном держим огонь и идём вперёд, иногда прыгаем
fn scripted_input(mut rng: ResMut<DeterministicRng>, mut players: Query<&mut PlayerInput>) {
    for mut input in players.iter_mut() {
        input.fire_held = rng.rng.gen_bool(0.8);
        input.reload_pressed |= rng.rng.gen_bool(0.005);
        input.jump_pressed |= rng.rng.gen_bool(0.02);
        input.horizontal = rng.rng.gen_range(-0.3..=0.3);
        input.vertical = rng.rng.gen_range(0.0..=0.5);
        input.run = false;
    }
}

fn collect_stats(
    mut stats: ResMut<DemoStats>,
    mut fired: EventReader<combat::WeaponFired>,
    mut shots: EventReader<ShotResolved>,
    mut reloads: EventReader<combat::ReloadStarted>,
    mut jumps: EventReader<JumpExecuted>,
    mut deaths: EventReader<EntityDied>,
) {
    stats.shots += fired.read().count();
    stats.hits += shots
        .read()
        .filter(|shot| matches!(shot.outcome, ShotOutcome::EnemyHit { .. }))
        .count();
    stats.reloads += reloads.read().count();
    stats.jumps += jumps.read().count();
    stats.deaths.extend(deaths.read().map(|event| event.entity));
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    log_info(&format!("Starting XENOHUNT headless simulation (seed: {})", seed));

    let mut config = SimulationConfig::default();
    config.weapon.fire_rate = 4.0;
    config.weapon.mag_size = 12;
    config.health.corpse_linger_seconds = 2.0;
    if let Err(err) = config.validate() {
        log_error(&format!("Invalid tuning preset: {}", err));
        return;
    }

    app.insert_resource(config.clone())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .init_resource::<DemoStats>()
        .add_systems(FixedUpdate, scripted_input.before(SimulationSet::Weapons))
        .add_systems(Update, collect_stats);

    let world = app.world_mut();
    let (player, aliens) = {
        let mut commands = world.commands();
        let player = spawn_player(&mut commands, &config, Vec3::ZERO);
        let aliens = [
            spawn_alien(&mut commands, &config, Vec3::new(0.0, 0.0, -14.0), Some(player)),
            spawn_alien(&mut commands, &config, Vec3::new(0.0, 0.0, -24.0), Some(player)),
        ];
        // Стены коридора
        for z in [-6.0, -12.0, -18.0] {
            spawn_prop(&mut commands, Vec3::new(-3.0, 0.0, z), 1.0, None);
            spawn_prop(&mut commands, Vec3::new(3.0, 0.0, z), 1.0, None);
        }
        (player, aliens)
    };
    world.flush();

    for tick in 0..TICKS {
        app.update();

        if tick % 120 == 0 {
            let player_health = app
                .world()
                .get::<Health>(player)
                .map_or(0.0, |health| health.current());
            log_info(&format!(
                "Tick {}: player health {}, {} entities",
                tick,
                player_health,
                app.world().entities().len()
            ));
        }
    }

    let world = app.world();
    let stats = world.resource::<DemoStats>();
    let alive_aliens = aliens
        .iter()
        .filter(|alien| world.get::<Dead>(**alien).is_none() && world.get_entity(**alien).is_ok())
        .count();

    log_info(&format!(
        "Simulation complete: {} shots, {} hits, {} reloads, {} jumps, deaths {:?}",
        stats.shots, stats.hits, stats.reloads, stats.jumps, stats.deaths
    ));
    log_info(&format!(
        "Player {}, aliens alive: {}/{}",
        if world.get_entity(player).is_ok() { "survived" } else { "died" },
        alive_aliens,
        aliens.len()
    ));
}
