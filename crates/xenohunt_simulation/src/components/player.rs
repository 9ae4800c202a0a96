//! Player control: marker + input сигналы
//!
//! Input polling вне симуляции. Host пишет сюда уже debounced значения.

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// AI systems сюда не смотрят, weapon/locomotion systems работают только с ним.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Входные сигналы игрока за тик
///
/// - `fire_held`, `run`, оси: level-сигналы, host перезаписывает каждый кадр
/// - `reload_pressed`, `jump_pressed`: latched edge, host ставит `true` на нажатии,
///   симуляция сбрасывает в `false` после обработки (одно нажатие = один запрос)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    pub fire_held: bool,
    pub reload_pressed: bool,
    pub jump_pressed: bool,
    /// Strafe ось (-1..1)
    pub horizontal: f32,
    /// Forward ось (-1..1)
    pub vertical: f32,
    pub run: bool,
}

impl PlayerInput {
    /// Забрать reload edge (true максимум один раз на нажатие)
    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_pressed)
    }

    /// Забрать jump edge
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }
}
