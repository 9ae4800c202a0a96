//! Weapon system: fire-rate gating, ammo, reload, shot resolution
//!
//! State machine (`WeaponPhase`):
//! - Ready --[fire (ammo > 0)]--> Cooldown (выстрел, ammo - 1, next_fire_at = now + interval)
//! - Cooldown --[now ≥ next_fire_at]--> Ready (автоматически, по времени)
//! - Ready|Cooldown --[fire (ammo == 0)]--> Reloading (auto-reload)
//! - Ready|Cooldown --[reload (ammo < max)]--> Reloading
//! - Reloading --[reload_time прошло]--> Ready (ammo = max)
//! - Reloading: все fire/reload requests игнорируются
//!
//! Все таймеры: абсолютные timestamps (секунды симуляции), не countdown.
//!
//! ECS ответственность: решение "выстрел был / попал / в кого".
//! Presentation (звук, muzzle flash, decal) читает события.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::damage::{apply_hit, DamageDealt, DamageSource, Dead, EntityDied, Hit};
use crate::combat::hit_query::{HeadlessHitQuery, HitOracle, HitQuery, RayHit};
use crate::components::{Health, PlayerInput};

/// Минимальный интервал между выстрелами (секунды)
pub const MIN_FIRE_INTERVAL: f32 = 0.001;

/// Tuning оружия
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct WeaponStats {
    /// Урон за попадание
    pub damage: f32,
    /// Дальность hit query (метры)
    pub range: f32,
    /// Выстрелов в секунду
    pub fire_rate: f32,
    /// Размер магазина
    pub mag_size: u32,
    /// Длительность перезарядки (секунды)
    pub reload_time: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            damage: 10.0,
            range: 100.0,
            fire_rate: 0.5,
            mag_size: 30,
            reload_time: 2.0,
        }
    }
}

impl WeaponStats {
    /// Интервал между выстрелами (не меньше `MIN_FIRE_INTERVAL`)
    pub fn fire_interval(&self) -> f32 {
        if self.fire_rate > 0.0 {
            (1.0 / self.fire_rate).max(MIN_FIRE_INTERVAL)
        } else {
            MIN_FIRE_INTERVAL
        }
    }
}

/// Наблюдаемое состояние оружия в момент `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WeaponPhase {
    Ready,
    Cooldown,
    Reloading,
}

/// Решение по fire request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireDecision {
    /// Выстрел разрешён: ammo уже списан, нужно resolve shot
    Fired { ammo_left: u32 },
    /// Ещё рано (now < next_fire_at)
    RateLimited,
    /// Магазин пуст: началась auto-reload
    ReloadStarted { finishes_at: f32 },
    /// Идёт перезарядка
    Ignored,
}

/// Решение по reload request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReloadDecision {
    Started { finishes_at: f32 },
    AlreadyFull,
    AlreadyReloading,
}

/// Оружие (per-instance state)
///
/// Поля приватные: ammo меняется только через fire/reload.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    stats: WeaponStats,
    current_ammo: u32,
    next_fire_at: f32,
    reload_finishes_at: Option<f32>,
}

impl Weapon {
    /// Новое оружие с полным магазином
    ///
    /// mag_size 0 поднимается до 1 (config validation такое не пропускает).
    pub fn new(mut stats: WeaponStats) -> Self {
        stats.mag_size = stats.mag_size.max(1);
        Self {
            current_ammo: stats.mag_size,
            stats,
            next_fire_at: f32::NEG_INFINITY,
            reload_finishes_at: None,
        }
    }

    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.stats.mag_size
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_finishes_at.is_some()
    }

    pub fn next_fire_at(&self) -> f32 {
        self.next_fire_at
    }

    pub fn reload_finishes_at(&self) -> Option<f32> {
        self.reload_finishes_at
    }

    pub fn phase(&self, now: f32) -> WeaponPhase {
        if self.is_reloading() {
            WeaponPhase::Reloading
        } else if now < self.next_fire_at {
            WeaponPhase::Cooldown
        } else {
            WeaponPhase::Ready
        }
    }

    /// Fire request (fire-held в этом тике)
    pub fn request_fire(&mut self, now: f32) -> FireDecision {
        if self.is_reloading() {
            return FireDecision::Ignored;
        }

        if self.current_ammo == 0 {
            return FireDecision::ReloadStarted {
                finishes_at: self.start_reload(now),
            };
        }

        if now < self.next_fire_at {
            return FireDecision::RateLimited;
        }

        self.current_ammo -= 1;
        self.next_fire_at = now + self.stats.fire_interval();
        FireDecision::Fired {
            ammo_left: self.current_ammo,
        }
    }

    /// Manual reload request
    pub fn request_reload(&mut self, now: f32) -> ReloadDecision {
        if self.is_reloading() {
            return ReloadDecision::AlreadyReloading;
        }
        if self.current_ammo >= self.stats.mag_size {
            return ReloadDecision::AlreadyFull;
        }

        ReloadDecision::Started {
            finishes_at: self.start_reload(now),
        }
    }

    /// Завершить перезарядку, если время пришло. true: магазин полон снова
    pub fn finish_reload_if_due(&mut self, now: f32) -> bool {
        match self.reload_finishes_at {
            Some(finishes_at) if now >= finishes_at => {
                self.reload_finishes_at = None;
                self.current_ammo = self.stats.mag_size;
                true
            }
            _ => false,
        }
    }

    fn start_reload(&mut self, now: f32) -> f32 {
        let finishes_at = now + self.stats.reload_time.max(0.0);
        self.reload_finishes_at = Some(finishes_at);
        finishes_at
    }
}

/// Итог shot resolution (только при hit)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Попали в Damageable entity: урон применён
    EnemyHit { target: Entity, point: Vec3 },
    /// Попали в геометрию без Health
    EnvironmentHit { point: Vec3, normal: Vec3 },
}

/// Event: выстрел произведён (muzzle flash, звук, анимация)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub ammo_left: u32,
}

/// Event: выстрел куда-то попал
#[derive(Event, Debug, Clone)]
pub struct ShotResolved {
    pub shooter: Entity,
    pub outcome: ShotOutcome,
}

/// Event: изменился боезапас (HUD)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AmmoChanged {
    pub entity: Entity,
    pub current: u32,
    pub max: u32,
}

impl std::fmt::Display for AmmoChanged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.current, self.max)
    }
}

/// Event: перезарядка началась
#[derive(Event, Debug, Clone)]
pub struct ReloadStarted {
    pub entity: Entity,
    pub finishes_at: f32,
}

/// Event: перезарядка завершена
#[derive(Event, Debug, Clone)]
pub struct ReloadFinished {
    pub entity: Entity,
}

/// Shot resolution: forward hit query в пределах range
///
/// Capability check (есть ли у entity Health): на стороне вызывающего.
pub fn cast_shot<Q: HitQuery + ?Sized>(
    oracle: &Q,
    shooter: Entity,
    origin: Vec3,
    forward: Vec3,
    range: f32,
) -> Option<RayHit> {
    oracle.cast_ray(origin, forward, range, Some(shooter))
}

/// System: начальный AmmoChanged для новых оружий (HUD получает стартовое значение)
pub fn announce_new_weapons(
    weapons: Query<(Entity, &Weapon), Added<Weapon>>,
    mut ammo_events: EventWriter<AmmoChanged>,
) {
    for (entity, weapon) in weapons.iter() {
        ammo_events.write(AmmoChanged {
            entity,
            current: weapon.current_ammo(),
            max: weapon.max_ammo(),
        });
    }
}

/// System: завершение перезарядок (по timestamp)
pub fn tick_weapon_reloads(
    mut weapons: Query<(Entity, &mut Weapon)>,
    mut reload_events: EventWriter<ReloadFinished>,
    mut ammo_events: EventWriter<AmmoChanged>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        if weapon.finish_reload_if_due(now) {
            reload_events.write(ReloadFinished { entity });
            ammo_events.write(AmmoChanged {
                entity,
                current: weapon.current_ammo(),
                max: weapon.max_ammo(),
            });
            crate::log(&format!("{:?}: reload complete", entity));
        }
    }
}

/// System: fire/reload input игрока → выстрелы и перезарядки
///
/// Порядок на одно оружие: fire (fire_held), потом reload (reload_pressed edge).
/// Hit query: `HitOracle` host'а, иначе headless snapshot. Без обоих выстрел
/// тратит патрон, но ни во что не попадает.
#[allow(clippy::too_many_arguments)]
pub fn handle_weapon_input(
    mut shooters: Query<(Entity, &Transform, &mut Weapon, &mut PlayerInput), Without<Dead>>,
    mut targets: Query<&mut Health>,
    host_oracle: Option<Res<HitOracle>>,
    headless_oracle: Option<Res<HeadlessHitQuery>>,
    time: Res<Time>,
    mut fired_events: EventWriter<WeaponFired>,
    mut shot_events: EventWriter<ShotResolved>,
    mut ammo_events: EventWriter<AmmoChanged>,
    mut reload_events: EventWriter<ReloadStarted>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    let now = time.elapsed_secs();

    let oracle: Option<&dyn HitQuery> = match (&host_oracle, &headless_oracle) {
        (Some(host), _) => Some(&*host.0),
        (None, Some(headless)) => Some(&**headless),
        (None, None) => None,
    };

    for (shooter, transform, mut weapon, mut input) in shooters.iter_mut() {
        if input.fire_held {
            match weapon.request_fire(now) {
                FireDecision::Fired { ammo_left } => {
                    fired_events.write(WeaponFired { shooter, ammo_left });
                    ammo_events.write(AmmoChanged {
                        entity: shooter,
                        current: ammo_left,
                        max: weapon.max_ammo(),
                    });

                    let stats = *weapon.stats();
                    let hit = oracle.and_then(|oracle| {
                        cast_shot(
                            oracle,
                            shooter,
                            transform.translation,
                            *transform.forward(),
                            stats.range,
                        )
                    });
                    if let Some(hit) = hit {
                        let outcome = resolve_hit(
                            shooter,
                            hit,
                            stats.damage,
                            &mut targets,
                            &mut damage_events,
                            &mut death_events,
                        );
                        shot_events.write(ShotResolved { shooter, outcome });
                    }
                }
                FireDecision::ReloadStarted { finishes_at } => {
                    reload_events.write(ReloadStarted {
                        entity: shooter,
                        finishes_at,
                    });
                    crate::log(&format!("{:?}: magazine empty, reloading...", shooter));
                }
                FireDecision::RateLimited | FireDecision::Ignored => {}
            }
        }

        if input.take_reload() {
            if let ReloadDecision::Started { finishes_at } = weapon.request_reload(now) {
                reload_events.write(ReloadStarted {
                    entity: shooter,
                    finishes_at,
                });
                crate::log(&format!("{:?}: reloading...", shooter));
            }
        }
    }
}

/// Hit → outcome. Damageable target получает урон, остальное: environment
fn resolve_hit(
    shooter: Entity,
    hit: RayHit,
    damage: f32,
    targets: &mut Query<&mut Health>,
    damage_events: &mut EventWriter<DamageDealt>,
    death_events: &mut EventWriter<EntityDied>,
) -> ShotOutcome {
    let Some(entity) = hit.entity else {
        return ShotOutcome::EnvironmentHit {
            point: hit.point,
            normal: hit.normal,
        };
    };

    match targets.get_mut(entity) {
        Ok(mut health) => {
            apply_hit(
                entity,
                &mut *health,
                Hit {
                    attacker: Some(shooter),
                    amount: damage,
                    source: DamageSource::Ranged,
                },
                damage_events,
                death_events,
            );
            crate::log(&format!("{:?} hit {:?}", shooter, entity));
            ShotOutcome::EnemyHit {
                target: entity,
                point: hit.point,
            }
        }
        Err(_) => ShotOutcome::EnvironmentHit {
            point: hit.point,
            normal: hit.normal,
        },
    }
}
