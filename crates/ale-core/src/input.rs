//! Controller input presented to the engine for one frame.
//!
//! Two layers:
//! 1. `JoystickState`: discrete direction/fire bits, rebuilt every frame.
//! 2. `PaddleState`: an accumulated resistance that persists across frames.

/// Smallest paddle resistance.
pub const PADDLE_MIN: i32 = 27_450;
/// Largest paddle resistance.
pub const PADDLE_MAX: i32 = 790_196;
/// Resistance change applied by one paddle action.
pub const PADDLE_DELTA: i32 = 23_000;
/// Resistance of a centred paddle.
pub const PADDLE_DEFAULT_VALUE: i32 = (PADDLE_MAX - PADDLE_MIN) / 2 + PADDLE_MIN;

/// Joystick state for one port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoystickState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Paddle state for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddleState {
    /// Potentiometer resistance, always within `PADDLE_MIN..=PADDLE_MAX`.
    pub resistance: i32,
    pub fire: bool,
}

impl Default for PaddleState {
    fn default() -> Self {
        Self {
            resistance: PADDLE_DEFAULT_VALUE,
            fire: false,
        }
    }
}

impl PaddleState {
    /// Move the resistance by `delta`, clamped to the potentiometer range.
    pub fn nudge(&mut self, delta: i32) {
        self.resistance = self
            .resistance
            .saturating_add(delta)
            .clamp(PADDLE_MIN, PADDLE_MAX);
    }

    /// Position as a fraction of the travel: 0.0 at `PADDLE_MAX`, 1.0 at `PADDLE_MIN`.
    ///
    /// Turning the knob clockwise lowers resistance and moves the on-screen
    /// object right.
    #[must_use]
    pub fn position(&self) -> f64 {
        f64::from(PADDLE_MAX - self.resistance) / f64::from(PADDLE_MAX - PADDLE_MIN)
    }
}

/// Everything the engine samples from the controllers and console switches
/// for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub joysticks: [JoystickState; 2],
    pub paddles: [PaddleState; 2],
    /// Console reset switch held this frame.
    pub console_reset: bool,
}

impl InputFrame {
    /// Release every discrete key. Paddle resistance is left as is.
    pub fn release_keys(&mut self) {
        self.joysticks = [JoystickState::default(); 2];
        for paddle in &mut self.paddles {
            paddle.fire = false;
        }
        self.console_reset = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paddle_is_centred() {
        let paddle = PaddleState::default();
        assert_eq!(paddle.resistance, 408_823);
        assert!((paddle.position() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn nudge_clamps_at_both_ends() {
        let mut paddle = PaddleState::default();
        for _ in 0..100 {
            paddle.nudge(PADDLE_DELTA);
        }
        assert_eq!(paddle.resistance, PADDLE_MAX);
        for _ in 0..100 {
            paddle.nudge(-PADDLE_DELTA);
        }
        assert_eq!(paddle.resistance, PADDLE_MIN);
    }

    #[test]
    fn release_keys_keeps_resistance() {
        let mut input = InputFrame::default();
        input.joysticks[0].fire = true;
        input.paddles[1].fire = true;
        input.paddles[1].nudge(-PADDLE_DELTA);
        input.console_reset = true;

        input.release_keys();

        assert_eq!(input.joysticks[0], JoystickState::default());
        assert!(!input.paddles[1].fire);
        assert!(!input.console_reset);
        assert_eq!(input.paddles[1].resistance, PADDLE_DEFAULT_VALUE - PADDLE_DELTA);
    }
}
