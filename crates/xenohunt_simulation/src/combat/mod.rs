//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Weapon (ammo, fire-rate, reload)
//! - Combat rules: shot resolution, damage application, death
//! - Events: WeaponFired, ShotResolved, AmmoChanged, Reload*, DamageDealt, EntityDied
//!
//! Вне симуляции:
//! - Raycast физика (HitQuery oracle, headless stub: HitSphere + GroundPlane)
//! - Звук, muzzle flash, decals, анимации (читают events)

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod hit_query;
pub mod weapon;


// Re-export основных типов
pub use damage::{apply_hit, DamageDealt, DamageSource, Dead, EntityDied, Hit};
pub use hit_query::{
    refresh_headless_hit_query, GroundPlane, HeadlessHitQuery, HitOracle, HitQuery, HitSphere,
    RayHit,
};
pub use weapon::{
    AmmoChanged, FireDecision, ReloadDecision, ReloadFinished, ReloadStarted, ShotOutcome,
    ShotResolved, Weapon, WeaponFired, WeaponPhase, WeaponStats, MIN_FIRE_INTERVAL,
};

/// Combat Plugin
///
/// Порядок выполнения (SimulationSet::Weapons):
/// 1. announce_new_weapons: стартовый AmmoChanged
/// 2. tick_weapon_reloads: завершение перезарядок по timestamp
/// 3. refresh_headless_hit_query: snapshot HitSphere (только если HeadlessHitQuery установлен)
/// 4. handle_weapon_input: fire / reload requests → shot resolution → damage
///
/// SimulationSet::Deaths:
/// 5. process_deaths: Dead маркер + отложенный despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<WeaponFired>()
            .add_event::<ShotResolved>()
            .add_event::<AmmoChanged>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadFinished>();

        // process_deaths читает linger из config и планирует despawn
        app.init_resource::<crate::config::SimulationConfig>()
            .init_resource::<crate::scheduler::DeferredActions>();

        app.add_systems(
            FixedUpdate,
            (
                weapon::announce_new_weapons,
                weapon::tick_weapon_reloads,
                hit_query::refresh_headless_hit_query.run_if(resource_exists::<HeadlessHitQuery>),
                weapon::handle_weapon_input,
            )
                .chain()
                .in_set(SimulationSet::Weapons),
        )
        .add_systems(
            FixedUpdate,
            damage::process_deaths.in_set(SimulationSet::Deaths),
        );
    }
}
