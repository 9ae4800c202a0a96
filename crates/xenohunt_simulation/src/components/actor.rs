//! Здоровье и capability получения урона: Health, Damageable

use bevy::prelude::*;

/// Результат применения урона
///
/// `Killed` возвращает только тот вызов, который впервые опустил health ≤ 0.
/// По нему вызывающий код генерирует `EntityDied` (ровно один раз).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель уже мертва: урон не применён
    Ignored,
    /// Урон применён, цель жива
    Wounded,
    /// Урон применён, цель умерла на этом вызове
    Killed,
}

/// Capability: entity может получать урон
///
/// Реализуется любым типом (player, alien, breakable prop).
/// В ECS проверка "поддерживает ли hit target урон" = `Query<&mut Health>::get_mut`.
pub trait Damageable {
    fn remaining_health(&self) -> f32;

    fn is_alive(&self) -> bool {
        self.remaining_health() > 0.0
    }

    fn apply_damage(&mut self, amount: f32) -> DamageOutcome;
}

/// Здоровье entity
///
/// Инвариант: current не растёт; после current ≤ 0 больше не меняется.
/// Поля приватные: единственный путь мутации `apply_damage`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

impl Damageable for Health {
    fn remaining_health(&self) -> f32 {
        self.current
    }

    fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        // Отрицательный урон (и NaN) не лечит
        let amount = if amount > 0.0 { amount } else { 0.0 };
        self.current -= amount;

        if self.is_alive() {
            DamageOutcome::Wounded
        } else {
            DamageOutcome::Killed
        }
    }
}
