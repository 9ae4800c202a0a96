//! Movement компоненты: navigation intent (AI) и velocity (physics integrator)

use bevy::prelude::*;

/// Movement intent для навигации (выполняется внешним NavigationAgent)
///
/// Архитектура:
/// - AI система пишет intent (куда и с какой скоростью)
/// - Pathfinding вне симуляции (headless stub: `follow_navigation_intent`)
/// - `destination == None` пока intent ни разу не выдавался
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct NavigationIntent {
    pub destination: Option<Vec3>,
    /// Скорость движения (m/s)
    pub speed: f32,
}

impl NavigationIntent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            speed,
        }
    }
}

/// Желаемая velocity тела (для physics integrator)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}
