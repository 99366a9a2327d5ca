//! Shared cartridge builders for the integration tests.

#![allow(dead_code)]

use ale_sim::{Cartridge, Kernel, SimInterface};

/// RAM address of the catcher's x position.
pub const CATCHER_X: usize = ale_sim::kernel::addr::CATCHER_X;
/// RAM address of the "ball in play" flag.
pub const BALL_LIVE: usize = ale_sim::kernel::addr::BALL_LIVE;

pub fn joystick_rom() -> Vec<u8> {
    Cartridge::build(Kernel::Joystick, 3, 8, "Catch", &[0x00, 0x10, 0x20])
}

pub fn paddle_rom() -> Vec<u8> {
    Cartridge::build(Kernel::Paddle, 3, 8, "Bounce", &[0x90])
}

/// A different cartridge with the same kernel.
pub fn other_joystick_rom() -> Vec<u8> {
    Cartridge::build(Kernel::Joystick, 3, 8, "Catch II", &[0x02, 0x10, 0x20])
}

pub fn loaded(rom: &[u8]) -> SimInterface {
    let mut ale = SimInterface::new();
    ale.load_rom_bytes(rom).expect("rom loads");
    ale
}
