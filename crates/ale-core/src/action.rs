//! The closed action set.
//!
//! Codes are stable across the boundary: 0–17 drive controller A, 18–35
//! drive controller B, 40–45 are reserved system actions. Each controller
//! block follows the same layout (no-op, fire, four directions, four
//! diagonals, then the fire combinations in the same order).

use std::fmt;

use crate::input::JoystickState;

/// Which controller port an action drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

/// A legal environment action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    PlayerANoop = 0,
    PlayerAFire = 1,
    PlayerAUp = 2,
    PlayerARight = 3,
    PlayerALeft = 4,
    PlayerADown = 5,
    PlayerAUpRight = 6,
    PlayerAUpLeft = 7,
    PlayerADownRight = 8,
    PlayerADownLeft = 9,
    PlayerAUpFire = 10,
    PlayerARightFire = 11,
    PlayerALeftFire = 12,
    PlayerADownFire = 13,
    PlayerAUpRightFire = 14,
    PlayerAUpLeftFire = 15,
    PlayerADownRightFire = 16,
    PlayerADownLeftFire = 17,
    PlayerBNoop = 18,
    PlayerBFire = 19,
    PlayerBUp = 20,
    PlayerBRight = 21,
    PlayerBLeft = 22,
    PlayerBDown = 23,
    PlayerBUpRight = 24,
    PlayerBUpLeft = 25,
    PlayerBDownRight = 26,
    PlayerBDownLeft = 27,
    PlayerBUpFire = 28,
    PlayerBRightFire = 29,
    PlayerBLeftFire = 30,
    PlayerBDownFire = 31,
    PlayerBUpRightFire = 32,
    PlayerBUpLeftFire = 33,
    PlayerBDownRightFire = 34,
    PlayerBDownLeftFire = 35,
    /// Console reset switch. Kept for compatibility; prefer `SystemReset`.
    Reset = 40,
    Undefined = 41,
    Random = 42,
    SaveState = 43,
    LoadState = 44,
    SystemReset = 45,
}

/// Number of actions in one controller block.
pub const ACTIONS_PER_PLAYER: usize = 18;

/// Upper bound on the action codes, exclusive.
pub const LAST_ACTION_INDEX: i32 = 50;

/// Controller A actions, in code order. This is the legal action set.
pub const PLAYER_A_ACTIONS: [Action; ACTIONS_PER_PLAYER] = [
    Action::PlayerANoop,
    Action::PlayerAFire,
    Action::PlayerAUp,
    Action::PlayerARight,
    Action::PlayerALeft,
    Action::PlayerADown,
    Action::PlayerAUpRight,
    Action::PlayerAUpLeft,
    Action::PlayerADownRight,
    Action::PlayerADownLeft,
    Action::PlayerAUpFire,
    Action::PlayerARightFire,
    Action::PlayerALeftFire,
    Action::PlayerADownFire,
    Action::PlayerAUpRightFire,
    Action::PlayerAUpLeftFire,
    Action::PlayerADownRightFire,
    Action::PlayerADownLeftFire,
];

/// Controller B actions, in code order.
pub const PLAYER_B_ACTIONS: [Action; ACTIONS_PER_PLAYER] = [
    Action::PlayerBNoop,
    Action::PlayerBFire,
    Action::PlayerBUp,
    Action::PlayerBRight,
    Action::PlayerBLeft,
    Action::PlayerBDown,
    Action::PlayerBUpRight,
    Action::PlayerBUpLeft,
    Action::PlayerBDownRight,
    Action::PlayerBDownLeft,
    Action::PlayerBUpFire,
    Action::PlayerBRightFire,
    Action::PlayerBLeftFire,
    Action::PlayerBDownFire,
    Action::PlayerBUpRightFire,
    Action::PlayerBUpLeftFire,
    Action::PlayerBDownRightFire,
    Action::PlayerBDownLeftFire,
];

const SYSTEM_ACTIONS: [Action; 6] = [
    Action::Reset,
    Action::Undefined,
    Action::Random,
    Action::SaveState,
    Action::LoadState,
    Action::SystemReset,
];

/// Joystick bits for slot `i` of a controller block: (up, down, left, right, fire).
const BLOCK_BITS: [(bool, bool, bool, bool, bool); ACTIONS_PER_PLAYER] = [
    (false, false, false, false, false),
    (false, false, false, false, true),
    (true, false, false, false, false),
    (false, false, false, true, false),
    (false, false, true, false, false),
    (false, true, false, false, false),
    (true, false, false, true, false),
    (true, false, true, false, false),
    (false, true, false, true, false),
    (false, true, true, false, false),
    (true, false, false, false, true),
    (false, false, false, true, true),
    (false, false, true, false, true),
    (false, true, false, false, true),
    (true, false, false, true, true),
    (true, false, true, false, true),
    (false, true, false, true, true),
    (false, true, true, false, true),
];

const BLOCK_NAMES: [&str; ACTIONS_PER_PLAYER] = [
    "NOOP",
    "FIRE",
    "UP",
    "RIGHT",
    "LEFT",
    "DOWN",
    "UPRIGHT",
    "UPLEFT",
    "DOWNRIGHT",
    "DOWNLEFT",
    "UPFIRE",
    "RIGHTFIRE",
    "LEFTFIRE",
    "DOWNFIRE",
    "UPRIGHTFIRE",
    "UPLEFTFIRE",
    "DOWNRIGHTFIRE",
    "DOWNLEFTFIRE",
];

impl Action {
    /// Stable integer code used at the boundary.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Inverse of [`Action::code`]. Codes 36–39 and 46+ are unassigned.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0..=17 => Some(PLAYER_A_ACTIONS[code as usize]),
            18..=35 => Some(PLAYER_B_ACTIONS[code as usize - ACTIONS_PER_PLAYER]),
            40..=45 => Some(SYSTEM_ACTIONS[code as usize - 40]),
            _ => None,
        }
    }

    /// The controller this action drives, or `None` for system actions.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self as u8 {
            0..=17 => Some(Player::A),
            18..=35 => Some(Player::B),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_system(self) -> bool {
        self.player().is_none()
    }

    /// Position within the controller block, for gameplay actions.
    const fn slot(self) -> Option<usize> {
        match self as u8 {
            code @ 0..=35 => Some(code as usize % ACTIONS_PER_PLAYER),
            _ => None,
        }
    }

    /// Direction and fire bits this action presses. System actions press nothing.
    #[must_use]
    pub fn joystick(self) -> JoystickState {
        let Some(slot) = self.slot() else {
            return JoystickState::default();
        };
        let (up, down, left, right, fire) = BLOCK_BITS[slot];
        JoystickState {
            up,
            down,
            left,
            right,
            fire,
        }
    }

    /// The idle action for the given controller.
    #[must_use]
    pub const fn noop(player: Player) -> Self {
        match player {
            Player::A => Action::PlayerANoop,
            Player::B => Action::PlayerBNoop,
        }
    }

    /// Same direction/fire combination on the other controller block.
    #[must_use]
    pub fn for_player(self, player: Player) -> Self {
        match (self.slot(), player) {
            (Some(slot), Player::A) => PLAYER_A_ACTIONS[slot],
            (Some(slot), Player::B) => PLAYER_B_ACTIONS[slot],
            (None, _) => self,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.player(), self.slot()) {
            (Some(Player::A), Some(slot)) => write!(f, "PLAYER_A_{}", BLOCK_NAMES[slot]),
            (Some(Player::B), Some(slot)) => write!(f, "PLAYER_B_{}", BLOCK_NAMES[slot]),
            _ => f.write_str(match self {
                Action::Reset => "RESET",
                Action::Undefined => "UNDEFINED",
                Action::Random => "RANDOM",
                Action::SaveState => "SAVE_STATE",
                Action::LoadState => "LOAD_STATE",
                _ => "SYSTEM_RESET",
            }),
        }
    }
}

/// The legal action set: every controller A action.
///
/// Games read controller A only through these; the minimal set is a
/// per-game subset reported by the engine.
#[must_use]
pub fn legal_action_set() -> Vec<Action> {
    PLAYER_A_ACTIONS.to_vec()
}
