//! Caller-facing handle for foreign or buffer-oriented front ends.
//!
//! Everything crosses as integer action codes, string setting keys and
//! caller-owned byte buffers. A buffer that is too small is reported as
//! `BufferTooSmall` and left untouched; on success the callee writes the
//! leading bytes and returns how many it wrote.

use std::path::Path;

use crate::action::{Action, legal_action_set};
use crate::engine::Engine;
use crate::error::{AleError, Result};
use crate::interface::AleInterface;
use crate::state::AleState;

/// Sole owner of one environment.
pub struct AleHandle<E: Engine> {
    ale: AleInterface<E>,
}

impl<E: Engine> Default for AleHandle<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> AleHandle<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ale: AleInterface::new(),
        }
    }

    #[must_use]
    pub fn interface(&self) -> &AleInterface<E> {
        &self.ale
    }

    pub fn interface_mut(&mut self) -> &mut AleInterface<E> {
        &mut self.ale
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.ale.settings().get_string(key)
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.ale.settings().get_int(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.ale.settings().get_bool(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f32> {
        self.ale.settings().get_float(key)
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.ale.settings_mut().set_string(key, value)
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.ale.settings_mut().set_int(key, value)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.ale.settings_mut().set_bool(key, value)
    }

    pub fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        self.ale.settings_mut().set_float(key, value)
    }

    /// Load a ROM. The seed is forced to 0 first so every load through the
    /// handle is reproducible.
    pub fn load_rom(&mut self, path: &str) -> Result<()> {
        self.ale.settings_mut().random_seed = 0;
        self.ale.load_rom(Path::new(path))
    }

    /// Apply the action with integer code `code` and return the reward.
    pub fn act(&mut self, code: i32) -> Result<i32> {
        let action = Action::from_code(code).ok_or(AleError::InvalidAction(code))?;
        self.ale.act(action)
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.ale.game_over()
    }

    pub fn reset_game(&mut self) -> Result<()> {
        self.ale.reset_game()
    }

    #[must_use]
    pub fn legal_action_size(&self) -> usize {
        legal_action_set().len()
    }

    /// Write the legal action codes into `dst`.
    pub fn fill_legal_action_set(&self, dst: &mut [i32]) -> Result<usize> {
        let codes: Vec<i32> = legal_action_set().into_iter().map(Action::code).collect();
        fill(dst, &codes)
    }

    pub fn minimal_action_size(&self) -> Result<usize> {
        Ok(self.ale.minimal_action_set()?.len())
    }

    /// Write the minimal action codes into `dst`.
    pub fn fill_minimal_action_set(&self, dst: &mut [i32]) -> Result<usize> {
        let codes: Vec<i32> = self
            .ale
            .minimal_action_set()?
            .into_iter()
            .map(Action::code)
            .collect();
        fill(dst, &codes)
    }

    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.ale.frame_number()
    }

    #[must_use]
    pub fn episode_frame_number(&self) -> u64 {
        self.ale.episode_frame_number()
    }

    pub fn lives(&self) -> Result<i32> {
        self.ale.lives()
    }

    #[must_use]
    pub fn screen_width(&self) -> usize {
        self.ale.screen().width()
    }

    #[must_use]
    pub fn screen_height(&self) -> usize {
        self.ale.screen().height()
    }

    /// Raw palette codes, one byte per pixel.
    pub fn fill_screen(&self, dst: &mut [u8]) -> Result<usize> {
        fill(dst, self.ale.screen().as_slice())
    }

    /// Interleaved RGB, copied into `dst`.
    pub fn fill_screen_rgb(&self, dst: &mut [u8]) -> Result<usize> {
        self.ale.screen_rgb(dst)?;
        Ok(self.ale.screen().array_size() * 3)
    }

    pub fn fill_screen_grayscale(&self, dst: &mut [u8]) -> Result<usize> {
        self.ale.screen_grayscale(dst)?;
        Ok(self.ale.screen().array_size())
    }

    #[must_use]
    pub fn ram_size(&self) -> usize {
        self.ale.ram().size()
    }

    pub fn fill_ram(&self, dst: &mut [u8]) -> Result<usize> {
        fill(dst, self.ale.ram().as_slice())
    }

    pub fn clone_state(&self) -> Result<AleState> {
        self.ale.clone_state()
    }

    pub fn clone_system_state(&self) -> Result<AleState> {
        self.ale.clone_system_state()
    }

    pub fn restore_state(&mut self, state: &AleState) -> Result<()> {
        self.ale.restore_state(state)
    }

    pub fn restore_system_state(&mut self, state: &AleState) -> Result<()> {
        self.ale.restore_system_state(state)
    }

    pub fn save_state(&mut self) -> Result<()> {
        self.ale.save_state()
    }

    pub fn load_state(&mut self) -> Result<()> {
        self.ale.load_state()
    }

    pub fn save_screen_png(&self, path: &str) -> Result<()> {
        self.ale.save_screen_png(Path::new(path))
    }
}

/// Bytes needed by [`encode_state`].
#[must_use]
pub fn encode_state_len(state: &AleState) -> usize {
    state.serialized_len()
}

/// Serialize `state` into `dst`.
pub fn encode_state(state: &AleState, dst: &mut [u8]) -> Result<usize> {
    let required = state.serialized_len();
    if dst.len() < required {
        return Err(AleError::BufferTooSmall {
            required,
            provided: dst.len(),
        });
    }
    fill(dst, &state.serialize())
}

/// Rebuild a state from bytes written by [`encode_state`].
pub fn decode_state(src: &[u8]) -> Result<AleState> {
    AleState::deserialize(src)
}

fn fill<T: Copy>(dst: &mut [T], src: &[T]) -> Result<usize> {
    if dst.len() < src.len() {
        return Err(AleError::BufferTooSmall {
            required: src.len(),
            provided: dst.len(),
        });
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(src.len())
}
