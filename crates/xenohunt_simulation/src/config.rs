//! Tuning preset симуляции
//!
//! Все параметры: числа, не CLI/env surface. Defaults = tuning прототипа.
//! Валидация при загрузке: невалидные значения отклоняются, а не "как-нибудь работают".

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AIConfig;
use crate::combat::WeaponStats;
use crate::physics::MovementConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning preset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Параметры здоровья
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_health: f32,
    /// Сколько труп остаётся в симуляции после смерти (0 = удаляется в тот же тик)
    pub corpse_linger_seconds: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            corpse_linger_seconds: 0.0,
        }
    }
}

/// Полный tuning preset
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub health: HealthConfig,
    pub weapon: WeaponStats,
    pub agent: AIConfig,
    pub movement: MovementConfig,
}

impl SimulationConfig {
    /// Загрузить preset из JSON (отсутствующие поля = defaults) и провалидировать
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("health.max_health", self.health.max_health)?;
        non_negative("health.corpse_linger_seconds", self.health.corpse_linger_seconds)?;

        let weapon = &self.weapon;
        non_negative("weapon.damage", weapon.damage)?;
        positive("weapon.range", weapon.range)?;
        positive("weapon.fire_rate", weapon.fire_rate)?;
        non_negative("weapon.reload_time", weapon.reload_time)?;
        if weapon.mag_size == 0 {
            return Err(invalid("weapon.mag_size", 0.0, "magazine must hold at least one round"));
        }

        let agent = &self.agent;
        non_negative("agent.sight_range", agent.sight_range)?;
        non_negative("agent.attack_range", agent.attack_range)?;
        non_negative("agent.patrol_speed", agent.patrol_speed)?;
        non_negative("agent.chase_speed", agent.chase_speed)?;
        non_negative("agent.attack_damage", agent.attack_damage)?;
        non_negative("agent.time_between_attacks", agent.time_between_attacks)?;

        let movement = &self.movement;
        non_negative("movement.walk_speed", movement.walk_speed)?;
        non_negative("movement.run_speed", movement.run_speed)?;
        non_negative("movement.jump_force", movement.jump_force)?;
        non_negative("movement.jump_input_buffer_time", movement.jump_input_buffer_time)?;
        non_negative("movement.coyote_time", movement.coyote_time)?;
        if !movement.gravity.is_finite() || movement.gravity > 0.0 {
            return Err(invalid(
                "movement.gravity",
                movement.gravity,
                "must be finite and point down (≤ 0)",
            ));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, value: f32, reason: &'static str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        value: f64::from(value),
        reason,
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, value, "must be a positive finite number"))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, value, "must be a finite number ≥ 0"))
    }
}
