//! Physics simulation module
//!
//! Kinematic контроллер и headless заглушки физики (без Rapier).

pub mod movement;

// Re-export основных типов
pub use movement::{
    detect_ground_contact, follow_navigation_intent, integrate_velocity_to_transform,
    player_locomotion, step_locomotion, HeadlessNavigation, KinematicController, MovementConfig,
    AIR_CONTROL, GROUND_TOLERANCE,
};
