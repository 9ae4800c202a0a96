//! Movement domain: jump timing и locomotion pipeline
//!
//! Содержит:
//! - JumpTiming (coyote time + jump buffer)
//! - JumpExecuted (event для прыжка)
//! - MovementPlugin (регистрирует locomotion из physics)

use bevy::prelude::*;

use crate::combat::GroundPlane;
use crate::physics::{self, HeadlessNavigation};
use crate::SimulationSet;

pub mod events;
pub mod jump;

pub use events::*;
pub use jump::JumpTiming;

/// Movement Plugin
///
/// Порядок выполнения (SimulationSet::Locomotion):
/// 1. detect_ground_contact: grounded от GroundPlane (headless oracle)
/// 2. player_locomotion: input → PhysicsBody.velocity, jump timing
/// 3. follow_navigation_intent: AI intent → velocity (headless navigation)
/// 4. integrate_velocity_to_transform: velocity → Transform (headless integrator)
///
/// Без GroundPlane / HeadlessNavigation шаги 1, 3, 4 отдаются host'у.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpExecuted>();

        app.add_systems(
            FixedUpdate,
            (
                physics::detect_ground_contact.run_if(resource_exists::<GroundPlane>),
                physics::player_locomotion,
                physics::follow_navigation_intent.run_if(resource_exists::<HeadlessNavigation>),
                physics::integrate_velocity_to_transform.run_if(resource_exists::<GroundPlane>),
            )
                .chain()
                .in_set(SimulationSet::Locomotion),
        );
    }
}
