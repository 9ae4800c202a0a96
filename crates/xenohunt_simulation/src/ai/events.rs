//! AI Events: наблюдаемые переходы FSM
//!
//! Внешние слои (анимация, звук, отладочный overlay) читают эти события,
//! симуляция от них не зависит.

use bevy::prelude::*;

use crate::ai::simple_fsm::AIState;

/// Режим AI агента сменился (эмитится только при реальной смене)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AIModeChanged {
    pub agent: Entity,
    pub from: AIState,
    pub to: AIState,
}
