//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье и capability урона (Health, Damageable)
//! - player: player control (Player, PlayerInput)
//! - movement: navigation intent и velocity (NavigationIntent, PhysicsBody)

pub mod actor;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use player::*;
