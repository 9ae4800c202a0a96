//! Jump timing: coyote time + jump buffer
//!
//! Два временных окна поверх шумного ground/input сигнала:
//! - coyote: прыжок разрешён ещё `coyote_window` секунд после последнего grounded тика
//! - buffer: нажатие "помнится" `buffer_window` секунд (нажал чуть раньше приземления)
//!
//! Прыжок = now строго раньше ОБОИХ deadline. После прыжка оба deadline сбрасываются
//! в прошлое, одно нажатие не даёт двух прыжков.

use bevy::prelude::*;

/// Состояние jump timing (absolute deadlines в секундах симуляции)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct JumpTiming {
    pub coyote_window: f32,
    pub buffer_window: f32,
    grounded_deadline: f32,
    jump_request_deadline: f32,
}

impl Default for JumpTiming {
    fn default() -> Self {
        Self::new(0.15, 0.2)
    }
}

impl JumpTiming {
    pub fn new(coyote_window: f32, buffer_window: f32) -> Self {
        Self {
            coyote_window,
            buffer_window,
            grounded_deadline: f32::NEG_INFINITY,
            jump_request_deadline: f32::NEG_INFINITY,
        }
    }

    /// Тик с контактом с землёй → продлить coyote окно
    pub fn record_ground_contact(&mut self, now: f32) {
        self.grounded_deadline = now + self.coyote_window;
    }

    /// Нажатие прыжка (edge) → открыть buffer окно
    pub fn record_jump_request(&mut self, now: f32) {
        self.jump_request_deadline = now + self.buffer_window;
    }

    pub fn can_jump(&self, now: f32) -> bool {
        now < self.grounded_deadline && now < self.jump_request_deadline
    }

    /// Проверить оба окна и, если прыжок разрешён, поглотить их
    pub fn try_consume(&mut self, now: f32) -> bool {
        if !self.can_jump(now) {
            return false;
        }

        self.grounded_deadline = f32::NEG_INFINITY;
        self.jump_request_deadline = f32::NEG_INFINITY;
        true
    }

    /// Полный шаг за тик: press → ground → решение
    pub fn update(&mut self, now: f32, grounded: bool, jump_pressed: bool) -> bool {
        if jump_pressed {
            self.record_jump_request(now);
        }
        if grounded {
            self.record_ground_contact(now);
        }
        self.try_consume(now)
    }

    pub fn grounded_deadline(&self) -> f32 {
        self.grounded_deadline
    }

    pub fn jump_request_deadline(&self) -> f32 {
        self.jump_request_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> JumpTiming {
        JumpTiming::new(0.15, 0.2)
    }

    #[test]
    fn test_fresh_state_never_jumps() {
        let mut jump = timing();
        assert!(!jump.can_jump(0.0));
        assert!(!jump.update(0.0, false, false));
    }

    #[test]
    fn test_coyote_jump_after_leaving_ground() {
        let mut jump = timing();
        assert!(!jump.update(0.0, true, false));

        // Уже в воздухе, но в пределах coyote окна
        assert!(jump.update(0.10, false, true));
    }

    #[test]
    fn test_late_press_outside_coyote_window() {
        let mut jump = timing();
        jump.update(0.0, true, false);

        assert!(!jump.update(0.20, false, true));
    }

    #[test]
    fn test_buffered_press_jumps_on_landing() {
        let mut jump = timing();
        assert!(!jump.update(-0.05, false, true));

        assert!(jump.update(0.0, true, false));
    }

    #[test]
    fn test_buffer_expires() {
        let mut jump = timing();
        jump.update(0.0, false, true);

        assert!(!jump.update(0.25, true, false));
    }

    #[test]
    fn test_consumed_jump_does_not_retrigger() {
        let mut jump = timing();
        assert!(jump.update(0.0, true, true));

        // Всё ещё на земле, но нового нажатия не было
        assert!(!jump.update(0.05, true, false));
        assert_eq!(jump.jump_request_deadline(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_windows_are_strict() {
        let mut jump = timing();
        jump.record_ground_contact(0.0);
        jump.record_jump_request(0.0);

        assert!(jump.can_jump(0.125));
        assert!(!jump.can_jump(0.15));
    }

    #[test]
    fn test_zero_windows_never_jump() {
        let mut jump = JumpTiming::new(0.0, 0.0);
        assert!(!jump.update(1.0, true, true));
    }
}
