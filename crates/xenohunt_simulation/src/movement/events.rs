//! Movement events

use bevy::prelude::*;

/// Event: прыжок выполнен (оба timing окна совпали)
///
/// Читают анимация/звук. Сама вертикальная скорость уже выставлена в PhysicsBody.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpExecuted {
    pub entity: Entity,
}
