//! The emulation engine seam.
//!
//! The environment layer never looks inside the console. It drives an
//! [`Engine`] one frame at a time, reads back the reward and terminal flag,
//! and copies RAM and the framebuffer out. Engine dynamics are an opaque
//! byte blob that the engine alone can interpret.

use crate::action::Action;
use crate::input::InputFrame;
use crate::ram::RAM_SIZE;
use crate::rng::Random;

/// Static facts about the loaded game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub name: String,
    /// Actions that have a distinct effect in this game.
    pub minimal_actions: Vec<Action>,
    /// Game is played with paddles rather than joysticks.
    pub uses_paddles: bool,
    /// Actions applied once after every reset to get past title screens.
    pub starting_actions: Vec<Action>,
}

/// What one emulated frame produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Score change during this frame.
    pub reward: i32,
    /// The game has reached a terminal state.
    pub terminal: bool,
}

/// Errors an engine reports.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The cartridge image could not be booted.
    #[error("invalid rom: {0}")]
    InvalidRom(String),
    /// Dynamics belong to a different cartridge or engine.
    #[error("incompatible state: {0}")]
    IncompatibleState(String),
    /// Dynamics bytes could not be decoded.
    #[error("corrupt dynamics: {0}")]
    CorruptDynamics(String),
}

/// A deterministic console emulation driven frame by frame.
///
/// Given the same dynamics, the same input and the same RNG state, `step`
/// must produce the same outcome, RAM and framebuffer.
pub trait Engine {
    /// Boot a cartridge image into its power-on state.
    fn boot(rom: &[u8]) -> Result<Self, EngineError>
    where
        Self: Sized;

    fn game(&self) -> &GameInfo;

    /// Return to the power-on state of the loaded cartridge.
    fn power_cycle(&mut self);

    /// Emulate one frame with the given controller input.
    fn step(&mut self, input: &InputFrame, rng: &mut Random) -> FrameOutcome;

    /// The game has ended. Matches the `terminal` flag of the last step.
    fn is_terminal(&self) -> bool;

    /// Remaining lives, as displayed by the game.
    fn lives(&self) -> i32;

    fn ram(&self) -> &[u8; RAM_SIZE];

    /// Palette codes of the last completed frame, row-major.
    fn framebuffer(&self) -> &[u8];

    /// `(height, width)` of the framebuffer.
    fn screen_size(&self) -> (usize, usize);

    /// Everything needed to continue emulation exactly, excluding the RNG.
    fn save_dynamics(&self) -> Vec<u8>;

    /// Replace the dynamics with a blob from [`Engine::save_dynamics`].
    ///
    /// Afterwards `ram()` and `framebuffer()` reflect the restored state.
    /// On error the engine must be left exactly as it was.
    fn load_dynamics(&mut self, blob: &[u8]) -> Result<(), EngineError>;
}
