//! The reference console as an [`Engine`].

use ale_core::{
    Action, Engine, EngineError, FrameOutcome, GameInfo, InputFrame, RAM_SIZE, Random,
};
use serde::{Deserialize, Serialize};

use crate::cartridge::{Cartridge, Kernel};
use crate::kernel::{self, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render::render;

/// Dynamics record format version.
const DYNAMICS_VERSION: u8 = 1;

/// Serialized engine dynamics. Everything else is derived from RAM and the
/// cartridge.
#[derive(Serialize, Deserialize)]
struct DynamicsRecord {
    version: u8,
    fingerprint: [u8; 20],
    ram: Vec<u8>,
    terminal: bool,
}

pub struct SimEngine {
    cart: Cartridge,
    game: GameInfo,
    ram: [u8; RAM_SIZE],
    framebuffer: Vec<u8>,
    terminal: bool,
}

impl SimEngine {
    #[must_use]
    pub fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    /// Current score as held in RAM.
    #[must_use]
    pub fn score(&self) -> u16 {
        kernel::score(&self.ram)
    }

    fn redraw(&mut self) {
        render(&mut self.framebuffer, &self.ram, &self.cart);
    }
}

fn game_info(cart: &Cartridge) -> GameInfo {
    let minimal_actions = vec![
        Action::PlayerANoop,
        Action::PlayerAFire,
        Action::PlayerARight,
        Action::PlayerALeft,
        Action::PlayerARightFire,
        Action::PlayerALeftFire,
    ];
    let (uses_paddles, starting_actions) = match cart.kernel {
        Kernel::Joystick => (false, Vec::new()),
        Kernel::Paddle => (true, vec![Action::PlayerAFire]),
    };
    GameInfo {
        name: cart.title.clone(),
        minimal_actions,
        uses_paddles,
        starting_actions,
    }
}

impl Engine for SimEngine {
    fn boot(rom: &[u8]) -> Result<Self, EngineError> {
        let cart = Cartridge::parse(rom)?;
        let mut engine = Self {
            game: game_info(&cart),
            ram: kernel::power_on(&cart),
            framebuffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            terminal: false,
            cart,
        };
        engine.redraw();
        Ok(engine)
    }

    fn game(&self) -> &GameInfo {
        &self.game
    }

    fn power_cycle(&mut self) {
        self.ram = kernel::power_on(&self.cart);
        self.terminal = false;
        self.redraw();
    }

    fn step(&mut self, input: &InputFrame, rng: &mut Random) -> FrameOutcome {
        let outcome = kernel::step(&mut self.ram, &self.cart, input, rng);
        self.terminal = outcome.terminal;
        self.redraw();
        outcome
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn lives(&self) -> i32 {
        i32::from(self.ram[kernel::addr::LIVES])
    }

    fn ram(&self) -> &[u8; RAM_SIZE] {
        &self.ram
    }

    fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    fn screen_size(&self) -> (usize, usize) {
        (SCREEN_HEIGHT, SCREEN_WIDTH)
    }

    fn save_dynamics(&self) -> Vec<u8> {
        let record = DynamicsRecord {
            version: DYNAMICS_VERSION,
            fingerprint: self.cart.fingerprint,
            ram: self.ram.to_vec(),
            terminal: self.terminal,
        };
        // A record of plain integers and byte vectors always encodes.
        bincode::serde::encode_to_vec(&record, bincode::config::standard()).unwrap_or_default()
    }

    fn load_dynamics(&mut self, blob: &[u8]) -> Result<(), EngineError> {
        let (record, read): (DynamicsRecord, usize) =
            bincode::serde::decode_from_slice(blob, bincode::config::standard())
                .map_err(|e| EngineError::CorruptDynamics(e.to_string()))?;
        if read != blob.len() {
            return Err(EngineError::CorruptDynamics(format!(
                "{} trailing bytes",
                blob.len() - read
            )));
        }
        if record.version != DYNAMICS_VERSION {
            return Err(EngineError::CorruptDynamics(format!(
                "dynamics version {}",
                record.version
            )));
        }
        if record.fingerprint != self.cart.fingerprint {
            return Err(EngineError::IncompatibleState(
                "state was captured from a different cartridge".into(),
            ));
        }
        let ram: [u8; RAM_SIZE] = record.ram.as_slice().try_into().map_err(|_| {
            EngineError::CorruptDynamics(format!("ram is {} bytes", record.ram.len()))
        })?;
        kernel::check_ram(&ram, &self.cart).map_err(EngineError::CorruptDynamics)?;

        self.ram = ram;
        self.terminal = record.terminal;
        self.redraw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boot(payload: &[u8]) -> SimEngine {
        SimEngine::boot(&Cartridge::build(Kernel::Joystick, 3, 4, "Catch", payload))
            .expect("valid")
    }

    #[test]
    fn dynamics_restore_ram_and_screen() {
        let mut engine = boot(&[]);
        let mut rng = Random::new(0);
        let reset = InputFrame {
            console_reset: true,
            ..InputFrame::default()
        };
        engine.step(&reset, &mut rng);
        let blob = engine.save_dynamics();
        let ram = *engine.ram();
        let frame = engine.framebuffer().to_vec();

        for _ in 0..20 {
            engine.step(&InputFrame::default(), &mut rng);
        }
        assert_ne!(engine.framebuffer(), frame.as_slice());

        engine.load_dynamics(&blob).expect("valid");
        assert_eq!(*engine.ram(), ram);
        assert_eq!(engine.framebuffer(), frame.as_slice());
    }

    #[test]
    fn foreign_dynamics_are_incompatible() {
        let a = boot(&[1]);
        let mut b = boot(&[2]);
        let before = *b.ram();
        let err = b.load_dynamics(&a.save_dynamics()).expect_err("foreign");
        assert!(matches!(err, EngineError::IncompatibleState(_)));
        assert_eq!(*b.ram(), before);
    }

    #[test]
    fn damaged_dynamics_are_corrupt() {
        let mut engine = boot(&[]);
        let mut blob = engine.save_dynamics();
        blob.truncate(blob.len() - 1);
        assert!(matches!(
            engine.load_dynamics(&blob),
            Err(EngineError::CorruptDynamics(_))
        ));
        assert!(matches!(
            engine.load_dynamics(&[]),
            Err(EngineError::CorruptDynamics(_))
        ));
    }

    #[test]
    fn unreachable_ram_is_corrupt() {
        let mut engine = boot(&[]);
        let before = *engine.ram();
        let frame = engine.framebuffer().to_vec();
        for (address, value) in [
            (kernel::addr::LIVES, 40),
            (kernel::addr::LIVES, 4),
            (kernel::addr::BALL_X, 252),
            (kernel::addr::CATCHER_X, 145),
            (kernel::addr::MODE, 3),
            (kernel::addr::BALL_LIVE, 2),
        ] {
            let mut ram = before;
            ram[address] = value;
            let record = DynamicsRecord {
                version: DYNAMICS_VERSION,
                fingerprint: engine.cartridge().fingerprint,
                ram: ram.to_vec(),
                terminal: false,
            };
            let blob = bincode::serde::encode_to_vec(&record, bincode::config::standard())
                .expect("encode");
            assert!(
                matches!(
                    engine.load_dynamics(&blob),
                    Err(EngineError::CorruptDynamics(_))
                ),
                "ram[{address}] = {value} accepted"
            );
            assert_eq!(*engine.ram(), before);
            assert_eq!(engine.framebuffer(), frame.as_slice());
        }
    }

    #[test]
    fn paddle_cartridge_reports_paddles() {
        let engine = SimEngine::boot(&Cartridge::build(Kernel::Paddle, 3, 4, "Bounce", &[]))
            .expect("valid");
        assert!(engine.game().uses_paddles);
        assert_eq!(engine.game().starting_actions, vec![Action::PlayerAFire]);
        assert_eq!(engine.game().name, "Bounce");
    }
}
