//! Snapshot, observation and action core for emulator-driven reinforcement
//! learning environments.
//!
//! An [`Engine`] emulates the console one frame at a time. [`AleInterface`]
//! wraps it with everything an agent needs: a closed [`Action`] set, frame
//! counters, planning and system snapshots ([`AleState`]) with a versioned
//! byte encoding, and observations as raw palette codes, RAM, RGB or
//! grayscale via [`ColourPalette`].

pub mod action;
pub mod boundary;
pub mod capture;
pub mod engine;
mod error;
pub mod input;
mod interface;
pub mod palette;
mod ram;
pub mod rng;
mod screen;
pub mod session;
pub mod settings;
pub mod state;

pub use action::{Action, Player};
pub use boundary::AleHandle;
pub use capture::ScreenExporter;
pub use engine::{Engine, EngineError, FrameOutcome, GameInfo};
pub use error::{AleError, Result};
pub use input::{InputFrame, JoystickState, PaddleState};
pub use interface::{AleInterface, Status};
pub use palette::{ColourPalette, DisplayFormat, PaletteType};
pub use ram::{AleRam, RAM_SIZE};
pub use rng::Random;
pub use screen::AleScreen;
pub use settings::Settings;
pub use state::{AleState, Dynamics};
