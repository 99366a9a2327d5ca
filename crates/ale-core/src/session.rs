//! Live environment-side state: frame counters and controller input.
//!
//! The engine owns the console; the session owns everything the environment
//! adds on top of it and that a snapshot has to carry alongside the engine
//! blob.

use crate::action::{Action, Player};
use crate::engine::{Engine, FrameOutcome};
use crate::input::{InputFrame, PADDLE_DELTA, PADDLE_DEFAULT_VALUE};
use crate::rng::Random;
use crate::state::Dynamics;

/// Idle frames run before the console reset switch is pressed.
pub const DEFAULT_NOOP_RESET_STEPS: u32 = 60;

#[derive(Debug, Clone)]
pub struct Session {
    frame_number: u64,
    episode_frame_number: u64,
    input: InputFrame,
    last_actions: [Action; 2],
    episode_start_lives: i32,
    noop_reset_steps: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_NOOP_RESET_STEPS)
    }
}

impl Session {
    #[must_use]
    pub fn new(noop_reset_steps: u32) -> Self {
        Self {
            frame_number: 0,
            episode_frame_number: 0,
            input: InputFrame::default(),
            last_actions: [Action::noop(Player::A), Action::noop(Player::B)],
            episode_start_lives: 0,
            noop_reset_steps,
        }
    }

    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    #[must_use]
    pub fn episode_frame_number(&self) -> u64 {
        self.episode_frame_number
    }

    #[must_use]
    pub fn last_actions(&self) -> [Action; 2] {
        self.last_actions
    }

    /// Lives the current episode started with.
    #[must_use]
    pub fn episode_start_lives(&self) -> i32 {
        self.episode_start_lives
    }

    pub fn set_episode_start_lives(&mut self, lives: i32) {
        self.episode_start_lives = lives;
    }

    #[must_use]
    pub fn paddles(&self) -> [i32; 2] {
        [self.input.paddles[0].resistance, self.input.paddles[1].resistance]
    }

    /// Input that the next (or last) frame is emulated with.
    #[must_use]
    pub fn input(&self) -> &InputFrame {
        &self.input
    }

    /// Count `n` emulated frames on both counters.
    pub fn increment_frame(&mut self, n: u64) {
        self.frame_number += n;
        self.episode_frame_number += n;
    }

    pub fn reset_episode_frame_number(&mut self) {
        self.episode_frame_number = 0;
    }

    pub(crate) fn reset_counters(&mut self) {
        self.frame_number = 0;
        self.episode_frame_number = 0;
    }

    /// Centre both paddles.
    pub fn reset_paddles(&mut self) {
        for paddle in &mut self.input.paddles {
            paddle.resistance = PADDLE_DEFAULT_VALUE;
        }
    }

    /// Build the controller input for the next frame.
    ///
    /// `a` drives the left port and `b` the right port. Joystick games get
    /// the action's direction and fire bits; paddle games turn left-type
    /// actions into more resistance and right-type actions into less. The
    /// reset actions hold the console reset switch; the remaining system
    /// actions press nothing.
    pub fn apply_actions(&mut self, a: Action, b: Action, uses_paddles: bool) {
        self.input.release_keys();
        for (port, action) in [a, b].into_iter().enumerate() {
            match action {
                Action::Reset | Action::SystemReset => self.input.console_reset = true,
                Action::Undefined | Action::Random => {
                    log::warn!("{action} has no controller effect; running an idle frame");
                }
                Action::SaveState | Action::LoadState => {}
                _ if uses_paddles => {
                    let js = action.joystick();
                    let paddle = &mut self.input.paddles[port];
                    if js.left {
                        paddle.nudge(PADDLE_DELTA);
                    } else if js.right {
                        paddle.nudge(-PADDLE_DELTA);
                    }
                    paddle.fire = js.fire;
                }
                _ => self.input.joysticks[port] = action.joystick(),
            }
        }
        self.last_actions = [a, b];
    }

    /// Emulate one frame with the given actions and count it.
    pub fn step<E: Engine>(
        &mut self,
        engine: &mut E,
        rng: &mut Random,
        a: Action,
        b: Action,
    ) -> FrameOutcome {
        let uses_paddles = engine.game().uses_paddles;
        self.apply_actions(a, b, uses_paddles);
        let outcome = engine.step(&self.input, rng);
        self.increment_frame(1);
        outcome
    }

    /// Power-cycle the game and bring it to its start position.
    ///
    /// Runs the idle frames and then `num_reset_steps` frames with the
    /// console reset switch held. Controllers return to rest and both
    /// counters end at zero. Returns the number of frames emulated.
    pub fn reset_to_start<E: Engine>(
        &mut self,
        engine: &mut E,
        rng: &mut Random,
        num_reset_steps: u32,
    ) -> u64 {
        engine.power_cycle();
        self.reset_paddles();
        self.last_actions = [Action::noop(Player::A), Action::noop(Player::B)];

        self.input.release_keys();
        for _ in 0..self.noop_reset_steps {
            engine.step(&self.input, rng);
        }
        self.input.console_reset = true;
        for _ in 0..num_reset_steps {
            engine.step(&self.input, rng);
        }
        self.input.release_keys();

        self.reset_counters();
        u64::from(self.noop_reset_steps) + u64::from(num_reset_steps)
    }

    /// Environment-side part of a snapshot.
    #[must_use]
    pub fn capture(&self, engine_blob: Vec<u8>) -> Dynamics {
        Dynamics {
            frame_number: self.frame_number,
            episode_frame_number: self.episode_frame_number,
            paddles: self.paddles(),
            last_actions: self.last_actions,
            episode_start_lives: self.episode_start_lives,
            engine: engine_blob,
        }
    }

    /// Adopt counters and controller state from a snapshot.
    pub fn restore(&mut self, dynamics: &Dynamics) {
        self.frame_number = dynamics.frame_number;
        self.episode_frame_number = dynamics.episode_frame_number;
        self.input.release_keys();
        for (paddle, &resistance) in self.input.paddles.iter_mut().zip(&dynamics.paddles) {
            paddle.resistance = resistance;
        }
        self.last_actions = dynamics.last_actions;
        self.episode_start_lives = dynamics.episode_start_lives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{JoystickState, PADDLE_MAX, PADDLE_MIN};

    #[test]
    fn joystick_actions_set_bits_per_port() {
        let mut session = Session::default();
        session.apply_actions(Action::PlayerAUpFire, Action::PlayerBLeft, false);
        let input = session.input();
        assert!(input.joysticks[0].up && input.joysticks[0].fire);
        assert!(input.joysticks[1].left && !input.joysticks[1].fire);

        session.apply_actions(Action::PlayerANoop, Action::PlayerBNoop, false);
        assert_eq!(session.input().joysticks, [JoystickState::default(); 2]);
    }

    #[test]
    fn paddle_actions_accumulate_and_clamp() {
        let mut session = Session::default();
        session.apply_actions(Action::PlayerALeftFire, Action::PlayerBRight, true);
        assert_eq!(session.paddles()[0], PADDLE_DEFAULT_VALUE + PADDLE_DELTA);
        assert_eq!(session.paddles()[1], PADDLE_DEFAULT_VALUE - PADDLE_DELTA);
        assert!(session.input().paddles[0].fire);
        assert!(!session.input().paddles[1].fire);

        for _ in 0..200 {
            session.apply_actions(Action::PlayerALeft, Action::PlayerBRight, true);
        }
        assert_eq!(session.paddles(), [PADDLE_MAX, PADDLE_MIN]);
        assert!(!session.input().paddles[0].fire);
    }

    #[test]
    fn reset_actions_hold_console_reset() {
        let mut session = Session::default();
        session.apply_actions(Action::SystemReset, Action::PlayerBNoop, false);
        assert!(session.input().console_reset);
        session.apply_actions(Action::Random, Action::PlayerBNoop, false);
        assert_eq!(*session.input(), InputFrame::default());
    }

    #[test]
    fn counters() {
        let mut session = Session::default();
        session.increment_frame(1);
        session.increment_frame(4);
        assert_eq!(session.frame_number(), 5);
        assert_eq!(session.episode_frame_number(), 5);
        session.reset_episode_frame_number();
        assert_eq!(session.frame_number(), 5);
        assert_eq!(session.episode_frame_number(), 0);
    }

    #[test]
    fn capture_restore_carries_controller_state() {
        let mut session = Session::default();
        session.apply_actions(Action::PlayerARight, Action::PlayerBLeftFire, true);
        session.increment_frame(3);
        session.set_episode_start_lives(4);
        let dynamics = session.capture(vec![1, 2]);

        let mut other = Session::default();
        other.restore(&dynamics);
        assert_eq!(other.paddles(), session.paddles());
        assert_eq!(other.last_actions(), session.last_actions());
        assert_eq!(other.frame_number(), 3);
        assert_eq!(other.episode_start_lives(), 4);
        assert_eq!(other.capture(vec![1, 2]), dynamics);
    }
}
