//! Hit query oracle: "во что попадает луч"
//!
//! Симуляция не владеет физикой: ray/surface intersection считает внешний oracle.
//! `HitQuery` trait = контракт oracle. Провайдеры (weapon system берёт первый найденный):
//! 1. `HitOracle`: oracle host'а (Rapier, Godot PhysicsServer, что угодно)
//! 2. `HeadlessHitQuery` resource: sphere colliders (`HitSphere`) + бесконечный пол
//!    (`GroundPlane`), пересобирается каждый тик `refresh_headless_hit_query`

use bevy::prelude::*;

use crate::combat::damage::Dead;

/// Результат ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Entity, в который попали (None: статическая геометрия без entity)
    pub entity: Option<Entity>,
    /// Дистанция от origin до point
    pub distance: f32,
}

/// Oracle: forward hit query
pub trait HitQuery {
    /// Ближайшее пересечение луча в пределах `max_distance`, `ignore` пропускается
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit>;
}

/// Oracle, установленный host'ом
///
/// Перекрывает headless snapshot, если оба присутствуют.
#[derive(Resource)]
pub struct HitOracle(pub Box<dyn HitQuery + Send + Sync>);

impl HitOracle {
    pub fn new(oracle: impl HitQuery + Send + Sync + 'static) -> Self {
        Self(Box::new(oracle))
    }
}

/// Sphere collider для headless hit query
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitSphere {
    pub radius: f32,
}

/// Горизонтальная плоскость пола (headless ground + hit query)
///
/// Когда resource есть, headless ground detection и integrator включены.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GroundPlane {
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
struct SphereCollider {
    entity: Entity,
    center: Vec3,
    radius: f32,
}

/// Snapshot collider'ов на текущий тик
#[derive(Resource, Debug, Default)]
pub struct HeadlessHitQuery {
    spheres: Vec<SphereCollider>,
    ground: Option<f32>,
}

impl HeadlessHitQuery {
    pub fn new(ground: Option<f32>) -> Self {
        Self {
            spheres: Vec::new(),
            ground,
        }
    }

    pub fn with_sphere(mut self, entity: Entity, center: Vec3, radius: f32) -> Self {
        self.add_sphere(entity, center, radius);
        self
    }

    /// Сбросить snapshot перед пересборкой
    pub fn clear(&mut self, ground: Option<f32>) {
        self.spheres.clear();
        self.ground = ground;
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn add_sphere(&mut self, entity: Entity, center: Vec3, radius: f32) {
        self.spheres.push(SphereCollider {
            entity,
            center,
            radius,
        });
    }
}

impl HitQuery for HeadlessHitQuery {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let sphere_hits = self
            .spheres
            .iter()
            .filter(|sphere| Some(sphere.entity) != ignore)
            .filter_map(|sphere| ray_sphere(origin, direction, sphere));

        let ground_hit = self
            .ground
            .and_then(|height| ray_ground(origin, direction, height));

        sphere_hits
            .chain(ground_hit)
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// System: пересобрать headless snapshot из живых `HitSphere` + `GroundPlane`
pub fn refresh_headless_hit_query(
    mut snapshot: ResMut<HeadlessHitQuery>,
    colliders: Query<(Entity, &Transform, &HitSphere), Without<Dead>>,
    ground: Option<Res<GroundPlane>>,
) {
    snapshot.clear(ground.map(|plane| plane.height));
    for (entity, transform, sphere) in colliders.iter() {
        snapshot.add_sphere(entity, transform.translation, sphere.radius);
    }
}

fn ray_sphere(origin: Vec3, direction: Vec3, sphere: &SphereCollider) -> Option<RayHit> {
    let offset = origin - sphere.center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - sphere.radius * sphere.radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let mut distance = -b - root;
    if distance < 0.0 {
        // Origin внутри сферы: берём выходную точку
        distance = -b + root;
    }
    if distance < 0.0 {
        return None;
    }

    let point = origin + direction * distance;
    Some(RayHit {
        point,
        normal: (point - sphere.center).normalize_or(Vec3::Y),
        entity: Some(sphere.entity),
        distance,
    })
}

fn ray_ground(origin: Vec3, direction: Vec3, height: f32) -> Option<RayHit> {
    if direction.y.abs() < f32::EPSILON {
        return None;
    }

    let distance = (height - origin.y) / direction.y;
    if distance < 0.0 {
        return None;
    }

    let normal = if origin.y >= height { Vec3::Y } else { Vec3::NEG_Y };
    Some(RayHit {
        point: origin + direction * distance,
        normal,
        entity: None,
        distance,
    })
}
