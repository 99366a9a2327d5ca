//! Cartridge image format.
//!
//! ```text
//! 0   4   magic "ACRT"
//! 4   1   kernel (0 joystick, 1 paddle)
//! 5   1   starting lives (1-9)
//! 6   1   ball speed in pixels per frame (1-8)
//! 7   32  title, UTF-8, NUL padded
//! 39  ..  payload
//! ```
//!
//! The payload is game data. Its first byte, if present, is the background
//! colour. A cartridge is identified by the SHA-1 of the whole image.

use ale_core::EngineError;
use sha1::{Digest, Sha1};

const CART_MAGIC: &[u8; 4] = b"ACRT";
const TITLE_LEN: usize = 32;
const HEADER_LEN: usize = 4 + 3 + TITLE_LEN;

/// How the player controls the catcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Joystick left/right moves the catcher; fire drops the ball faster.
    Joystick,
    /// Paddle position sets the catcher; fire serves each ball.
    Paddle,
}

impl Kernel {
    fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Joystick),
            1 => Some(Self::Paddle),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Joystick => 0,
            Self::Paddle => 1,
        }
    }
}

/// A parsed cartridge.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub kernel: Kernel,
    pub lives: u8,
    pub ball_speed: u8,
    pub title: String,
    pub payload: Vec<u8>,
    pub fingerprint: [u8; 20],
}

impl Cartridge {
    pub fn parse(image: &[u8]) -> Result<Self, EngineError> {
        if image.len() < HEADER_LEN {
            return Err(EngineError::InvalidRom(format!(
                "image is {} bytes, header needs {HEADER_LEN}",
                image.len()
            )));
        }
        if &image[0..4] != CART_MAGIC {
            return Err(EngineError::InvalidRom("missing ACRT magic".into()));
        }
        let kernel = Kernel::from_id(image[4])
            .ok_or_else(|| EngineError::InvalidRom(format!("unknown kernel {}", image[4])))?;
        let lives = image[5];
        if !(1..=9).contains(&lives) {
            return Err(EngineError::InvalidRom(format!("{lives} lives")));
        }
        let ball_speed = image[6];
        if !(1..=8).contains(&ball_speed) {
            return Err(EngineError::InvalidRom(format!("ball speed {ball_speed}")));
        }
        let raw_title = &image[7..HEADER_LEN];
        let end = raw_title.iter().position(|&b| b == 0).unwrap_or(TITLE_LEN);
        let title = std::str::from_utf8(&raw_title[..end])
            .map_err(|_| EngineError::InvalidRom("title is not UTF-8".into()))?
            .to_string();

        Ok(Self {
            kernel,
            lives,
            ball_speed,
            title,
            payload: image[HEADER_LEN..].to_vec(),
            fingerprint: Sha1::digest(image).into(),
        })
    }

    /// Assemble a cartridge image. Titles longer than 32 bytes are cut.
    #[must_use]
    pub fn build(kernel: Kernel, lives: u8, ball_speed: u8, title: &str, payload: &[u8]) -> Vec<u8> {
        let mut image = Vec::with_capacity(HEADER_LEN + payload.len());
        image.extend_from_slice(CART_MAGIC);
        image.push(kernel.id());
        image.push(lives);
        image.push(ball_speed);
        let mut raw_title = [0u8; TITLE_LEN];
        let len = title.len().min(TITLE_LEN);
        raw_title[..len].copy_from_slice(&title.as_bytes()[..len]);
        image.extend_from_slice(&raw_title);
        image.extend_from_slice(payload);
        image
    }

    /// Background colour code.
    #[must_use]
    pub fn background(&self) -> u8 {
        self.payload.first().copied().unwrap_or(0) & 0xFE
    }
}
