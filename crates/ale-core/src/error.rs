//! Error taxonomy for the environment layer.

use std::path::PathBuf;

use crate::engine::EngineError;

/// Result returned from environment operations.
pub type Result<T> = std::result::Result<T, AleError>;

/// Errors the environment layer reports to callers.
///
/// None of these leave the engine half-modified: loads and restores validate
/// everything before committing.
#[derive(thiserror::Error, Debug)]
pub enum AleError {
    /// The snapshot cannot be applied to the currently loaded game.
    #[error("state is incompatible with the loaded game: {0}")]
    InvalidState(String),
    /// Serialized state bytes are malformed.
    #[error("corrupt serialized state: {0}")]
    CorruptState(String),
    /// A user palette table is malformed.
    #[error("invalid palette file: {0}")]
    PaletteFormat(String),
    /// Destination buffer is shorter than the data it must hold.
    #[error("buffer too small: {required} bytes required, {provided} provided")]
    BufferTooSmall { required: usize, provided: usize },
    /// Operation requires a loaded game.
    #[error("no rom is loaded")]
    NotLoaded,
    /// The engine refused the cartridge image.
    #[error("rom rejected: {0}")]
    Rom(String),
    /// Integer code does not name an action.
    #[error("unknown action code {0}")]
    InvalidAction(i32),
    /// `load_state` was called with nothing saved.
    #[error("no saved state to load")]
    EmptyStateStack,
    /// Unknown setting key or unparsable value.
    #[error("setting `{key}`: {reason}")]
    Setting { key: String, reason: String },
    /// PNG encoding failed.
    #[error("screen export failed: {0}")]
    Export(String),
    /// File access failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl AleError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            context: format!("{}", path.into().display()),
            source,
        }
    }

    pub(crate) fn setting(key: &str, reason: impl Into<String>) -> Self {
        Self::Setting {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<EngineError> for AleError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRom(msg) => Self::Rom(msg),
            EngineError::IncompatibleState(msg) => Self::InvalidState(msg),
            EngineError::CorruptDynamics(msg) => Self::CorruptState(msg),
        }
    }
}

impl From<png::EncodingError> for AleError {
    fn from(err: png::EncodingError) -> Self {
        Self::Export(err.to_string())
    }
}
