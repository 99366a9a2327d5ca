//! Environment snapshots.
//!
//! A snapshot is an immutable value: the engine's dynamics blob plus the
//! environment-side counters and controller state needed to continue exactly.
//! Two fidelities exist:
//!
//! - `Planning` omits the RNG, so stochastic behaviour after a restore may
//!   diverge from the original run. Used for look-ahead search.
//! - `System` carries the RNG too, so a restore replays byte-identically.

mod codec;

use crate::action::{Action, Player};
use crate::input::PADDLE_DEFAULT_VALUE;

pub use codec::{STATE_MAGIC, STATE_VERSION};

/// Everything except the RNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dynamics {
    /// Frames emulated since the ROM was loaded.
    pub frame_number: u64,
    /// Frames emulated since the episode began.
    pub episode_frame_number: u64,
    /// Paddle resistances, left then right.
    pub paddles: [i32; 2],
    /// Last action applied to each controller.
    pub last_actions: [Action; 2],
    /// Lives the current episode started with.
    pub episode_start_lives: i32,
    /// Opaque engine state.
    pub engine: Vec<u8>,
}

impl Dynamics {
    /// Dynamics wrapping an engine blob with fresh environment state.
    #[must_use]
    pub fn from_engine(engine: Vec<u8>) -> Self {
        Self {
            frame_number: 0,
            episode_frame_number: 0,
            paddles: [PADDLE_DEFAULT_VALUE; 2],
            last_actions: [Action::noop(Player::A), Action::noop(Player::B)],
            episode_start_lives: 0,
            engine,
        }
    }
}

/// A captured environment state.
///
/// Equality is mode-aware: a planning snapshot never equals a system
/// snapshot, even when their dynamics match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AleState {
    Planning(Dynamics),
    System { dynamics: Dynamics, rng: Vec<u8> },
}

impl AleState {
    #[must_use]
    pub fn dynamics(&self) -> &Dynamics {
        match self {
            Self::Planning(dynamics) | Self::System { dynamics, .. } => dynamics,
        }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    #[must_use]
    pub fn frame_number(&self) -> u64 {
        self.dynamics().frame_number
    }

    #[must_use]
    pub fn episode_frame_number(&self) -> u64 {
        self.dynamics().episode_frame_number
    }

    /// Drop the RNG state. A planning snapshot is returned unchanged.
    #[must_use]
    pub fn to_planning(&self) -> AleState {
        AleState::Planning(self.dynamics().clone())
    }

    /// Self-describing byte encoding; see [`AleState::deserialize`].
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Decode bytes produced by [`AleState::serialize`].
    ///
    /// Anything other than an exact, complete encoding is `CorruptState`.
    pub fn deserialize(bytes: &[u8]) -> crate::Result<Self> {
        codec::decode(bytes)
    }

    /// Length of [`AleState::serialize`] output without building it.
    #[must_use]
    pub fn serialized_len(&self) -> usize {
        codec::encoded_len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamics() -> Dynamics {
        Dynamics {
            frame_number: 120,
            episode_frame_number: 55,
            paddles: [30_000, 700_000],
            last_actions: [Action::PlayerAUpFire, Action::PlayerBLeft],
            episode_start_lives: 3,
            engine: vec![9, 8, 7, 6],
        }
    }

    #[test]
    fn system_projects_to_planning() {
        let system = AleState::System {
            dynamics: dynamics(),
            rng: vec![1, 2, 3],
        };
        let planning = system.to_planning();
        assert_eq!(planning, AleState::Planning(dynamics()));
        assert_eq!(planning.to_planning(), planning);
    }

    #[test]
    fn modes_never_compare_equal() {
        let planning = AleState::Planning(dynamics());
        let system = AleState::System {
            dynamics: dynamics(),
            rng: Vec::new(),
        };
        assert_ne!(planning, system);
        assert_eq!(planning.frame_number(), system.frame_number());
    }

    #[test]
    fn serialized_len_matches() {
        let system = AleState::System {
            dynamics: dynamics(),
            rng: vec![0; 17],
        };
        assert_eq!(system.serialized_len(), system.serialize().len());
        let planning = system.to_planning();
        assert_eq!(planning.serialized_len(), planning.serialize().len());
    }
}
