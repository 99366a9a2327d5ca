//! Byte layout of a serialized [`AleState`].
//!
//! All integers are little-endian.
//!
//! ```text
//! 0   4  magic "ALES"
//! 4   1  version
//! 5   1  mode (0 planning, 1 system)
//! 6   8  frame number
//! 14  8  episode frame number
//! 22  4  left paddle resistance
//! 26  4  right paddle resistance
//! 30  1  last controller A action code
//! 31  1  last controller B action code
//! 32  4  lives at the start of the episode
//! 36  4  engine blob length N
//! 40  N  engine blob
//! system only:
//! +0  4  rng length M
//! +4  M  rng state
//! ```

use crate::action::Action;
use crate::error::{AleError, Result};
use crate::input::{PADDLE_MAX, PADDLE_MIN};

use super::{AleState, Dynamics};

/// Magic bytes for serialized state identification.
pub const STATE_MAGIC: &[u8; 4] = b"ALES";

/// Current serialized state version.
pub const STATE_VERSION: u8 = 1;

const MODE_PLANNING: u8 = 0;
const MODE_SYSTEM: u8 = 1;

const HEADER_LEN: usize = 40;

pub(super) fn encoded_len(state: &AleState) -> usize {
    let base = HEADER_LEN + state.dynamics().engine.len();
    match state {
        AleState::Planning(_) => base,
        AleState::System { rng, .. } => base + 4 + rng.len(),
    }
}

pub(super) fn encode(state: &AleState) -> Vec<u8> {
    let mut data = Vec::with_capacity(encoded_len(state));
    let dynamics = state.dynamics();

    data.extend_from_slice(STATE_MAGIC);
    data.push(STATE_VERSION);
    data.push(if state.is_system() {
        MODE_SYSTEM
    } else {
        MODE_PLANNING
    });
    data.extend_from_slice(&dynamics.frame_number.to_le_bytes());
    data.extend_from_slice(&dynamics.episode_frame_number.to_le_bytes());
    for paddle in dynamics.paddles {
        data.extend_from_slice(&paddle.to_le_bytes());
    }
    for action in dynamics.last_actions {
        data.push(action as u8);
    }
    data.extend_from_slice(&dynamics.episode_start_lives.to_le_bytes());
    write_blob(&mut data, &dynamics.engine);

    if let AleState::System { rng, .. } = state {
        write_blob(&mut data, rng);
    }
    data
}

pub(super) fn decode(data: &[u8]) -> Result<AleState> {
    let mut r = Reader { data, pos: 0 };

    if r.take(4, "magic")? != STATE_MAGIC {
        return Err(corrupt("bad magic"));
    }
    let version = r.u8("version")?;
    if version != STATE_VERSION {
        return Err(corrupt(format!("unsupported version {version}")));
    }
    let mode = r.u8("mode")?;
    if mode != MODE_PLANNING && mode != MODE_SYSTEM {
        return Err(corrupt(format!("unknown mode tag {mode}")));
    }

    let frame_number = r.u64("frame number")?;
    let episode_frame_number = r.u64("episode frame number")?;
    let paddles = [r.paddle("left paddle")?, r.paddle("right paddle")?];
    let last_actions = [r.action()?, r.action()?];
    let episode_start_lives = r.i32("episode start lives")?;
    let engine = r.blob("engine blob")?.to_vec();

    let dynamics = Dynamics {
        frame_number,
        episode_frame_number,
        paddles,
        last_actions,
        episode_start_lives,
        engine,
    };
    let state = if mode == MODE_SYSTEM {
        let rng = r.blob("rng state")?.to_vec();
        AleState::System { dynamics, rng }
    } else {
        AleState::Planning(dynamics)
    };

    if r.pos != data.len() {
        return Err(corrupt(format!(
            "{} trailing bytes",
            data.len() - r.pos
        )));
    }
    Ok(state)
}

fn write_blob(data: &mut Vec<u8>, blob: &[u8]) {
    data.extend_from_slice(&(blob.len() as u32).to_le_bytes());
    data.extend_from_slice(blob);
}

fn corrupt(msg: impl Into<String>) -> AleError {
    AleError::CorruptState(msg.into())
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| corrupt(format!("truncated ({what})")))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        self.array(what).map(u32::from_le_bytes)
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        self.array(what).map(u64::from_le_bytes)
    }

    fn i32(&mut self, what: &str) -> Result<i32> {
        self.array(what).map(i32::from_le_bytes)
    }

    /// A resistance `PaddleState::nudge` can reach.
    fn paddle(&mut self, what: &str) -> Result<i32> {
        let value = self.i32(what)?;
        if !(PADDLE_MIN..=PADDLE_MAX).contains(&value) {
            return Err(corrupt(format!("{what} resistance {value} out of range")));
        }
        Ok(value)
    }

    fn action(&mut self) -> Result<Action> {
        let code = self.u8("last action")?;
        Action::from_code(i32::from(code))
            .ok_or_else(|| corrupt(format!("unknown action code {code}")))
    }

    fn blob(&mut self, what: &str) -> Result<&'a [u8]> {
        let len = self.u32(what)? as usize;
        self.take(len, what)
    }
}
