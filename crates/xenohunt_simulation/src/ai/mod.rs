//! AI decision-making module
//!
//! Simple FSM для alien: Idle / Chase / Attack.
//! Perception = дистанция до явно назначенного target, без vision cone.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod events;
pub mod simple_fsm;

// Re-export основных типов
pub use events::AIModeChanged;
pub use simple_fsm::{
    evaluate_mode, AIConfig, AIDisabled, AIState, AITarget, Attacker, Perception,
};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения (SimulationSet::AI):
/// 1. validate_ai_agents: misconfigured агенты → AIDisabled
/// 2. ai_fsm_transitions: perception → AIState
/// 3. ai_movement_from_state: AIState → NavigationIntent
/// 4. ai_attack_execution: урон target с cooldown
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AIModeChanged>()
            .add_event::<crate::combat::DamageDealt>()
            .add_event::<crate::combat::EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                simple_fsm::validate_ai_agents,
                simple_fsm::ai_fsm_transitions,
                simple_fsm::ai_movement_from_state,
                simple_fsm::ai_attack_execution,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::AI),
        );
    }
}
