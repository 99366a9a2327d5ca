//! Deterministic reference console.
//!
//! A small catch game that behaves like a real cartridge from the
//! environment's point of view: a title screen until the reset switch is
//! pressed, all game state in 128 bytes of RAM, a 160×210 framebuffer of
//! palette codes, lives, rewards, and a ball whose spawn column draws from
//! the environment RNG.

mod cartridge;
pub mod kernel;
mod machine;
mod render;

pub use cartridge::{Cartridge, Kernel};
pub use machine::SimEngine;

/// Environment driving the reference console.
pub type SimInterface = ale_core::AleInterface<SimEngine>;

/// Boundary handle over the reference console.
pub type SimHandle = ale_core::AleHandle<SimEngine>;
