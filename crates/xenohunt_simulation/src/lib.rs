//! XENOHUNT Simulation Core
//!
//! ECS-симуляция боевого ядра FPS на Bevy 0.16:
//! - HealthModel: здоровье, capability урона, единственное уведомление о смерти
//! - WeaponSystem: fire rate, магазин, перезарядка, shot resolution
//! - AIBehavior: Idle / Chase / Attack FSM для alien
//! - MovementTiming: coyote time + jump buffer поверх kinematic locomotion
//!
//! Физика, рендер, pathfinding и input polling: вне симуляции (host).
//! Headless заглушки oracle'ов: HitSphere/GroundPlane/HeadlessNavigation.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod scheduler;
pub mod spawn;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIModeChanged, AIPlugin, AIState, AITarget, Attacker};
pub use combat::{
    AmmoChanged, CombatPlugin, DamageDealt, Dead, EntityDied, GroundPlane, HeadlessHitQuery,
    HitOracle, HitQuery, HitSphere, RayHit, ShotOutcome, ShotResolved, Weapon, WeaponStats,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use movement::{JumpExecuted, JumpTiming, MovementPlugin};
pub use physics::{HeadlessNavigation, KinematicController, MovementConfig};
pub use scheduler::{DeferredAction, DeferredActions, SchedulerPlugin};
pub use spawn::{spawn_alien, spawn_player, spawn_prop};

/// Фазы одного simulation тика (FixedUpdate), строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Стрельба, перезарядка, попадания
    Weapons,
    /// AI perception → FSM → intent → атака
    AI,
    /// Jump timing, locomotion, headless физика
    Locomotion,
    /// Dead маркер + планирование despawn
    Deaths,
    /// Отложенные действия (DeferredActions)
    Deferred,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию, если host не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SimulationConfig>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Weapons,
                    SimulationSet::AI,
                    SimulationSet::Locomotion,
                    SimulationSet::Deaths,
                    SimulationSet::Deferred,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((CombatPlugin, AIPlugin, MovementPlugin, SchedulerPlugin));

        // Config, вставленный host'ом напрямую, не проходил через from_json_str
        if let Err(err) = app.world().resource::<SimulationConfig>().validate() {
            log_error(&format!("Invalid simulation config: {}", err));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Симуляция + headless oracles (HitSphere snapshot, GroundPlane на y=0,
/// straight-line навигация).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(GroundPlane { height: 0.0 })
        .init_resource::<HeadlessHitQuery>()
        .insert_resource(HeadlessNavigation)
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-представление компонента, отсортированное по Entity)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
