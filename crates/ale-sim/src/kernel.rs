//! Game logic. All state lives in the 128 bytes of RAM.

use ale_core::{FrameOutcome, InputFrame, RAM_SIZE, Random};

use crate::cartridge::{Cartridge, Kernel};

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 210;

pub const CATCHER_WIDTH: u8 = 16;
pub const CATCHER_ROW: u8 = 192;
pub const BALL_SIZE: u8 = 4;
const CATCHER_MAX_X: u8 = SCREEN_WIDTH as u8 - CATCHER_WIDTH;
const BALL_MAX_X: u8 = SCREEN_WIDTH as u8 - BALL_SIZE;
const CATCHER_SPEED: u8 = 4;

/// RAM addresses.
pub mod addr {
    pub const MODE: usize = 0x00;
    pub const CATCHER_X: usize = 0x01;
    pub const BALL_X: usize = 0x02;
    pub const BALL_Y: usize = 0x03;
    pub const LIVES: usize = 0x04;
    pub const SCORE_LO: usize = 0x05;
    pub const SCORE_HI: usize = 0x06;
    pub const FRAME: usize = 0x07;
    pub const BALL_LIVE: usize = 0x08;
    pub const BALLS_SERVED: usize = 0x09;
}

/// Values of `addr::MODE`.
pub mod mode {
    /// Title screen until the console reset switch is pressed.
    pub const ATTRACT: u8 = 0;
    pub const PLAYING: u8 = 1;
    pub const GAME_OVER: u8 = 2;
}

/// Power-on RAM contents.
#[must_use]
pub fn power_on(cart: &Cartridge) -> [u8; RAM_SIZE] {
    let mut ram = [0u8; RAM_SIZE];
    ram[addr::MODE] = mode::ATTRACT;
    ram[addr::CATCHER_X] = CATCHER_MAX_X / 2;
    ram[addr::LIVES] = cart.lives;
    ram
}

/// Reject RAM images the game rules can never produce.
pub fn check_ram(ram: &[u8; RAM_SIZE], cart: &Cartridge) -> Result<(), String> {
    let limits = [
        (addr::MODE, mode::GAME_OVER),
        (addr::LIVES, cart.lives),
        (addr::CATCHER_X, CATCHER_MAX_X),
        (addr::BALL_X, BALL_MAX_X),
        (addr::BALL_LIVE, 1),
    ];
    for (address, max) in limits {
        if ram[address] > max {
            return Err(format!(
                "ram[{address:#04x}] is {}, limit {max}",
                ram[address]
            ));
        }
    }
    Ok(())
}

#[must_use]
pub fn score(ram: &[u8; RAM_SIZE]) -> u16 {
    u16::from_le_bytes([ram[addr::SCORE_LO], ram[addr::SCORE_HI]])
}

fn set_score(ram: &mut [u8; RAM_SIZE], score: u16) {
    let [lo, hi] = score.to_le_bytes();
    ram[addr::SCORE_LO] = lo;
    ram[addr::SCORE_HI] = hi;
}

fn new_game(ram: &mut [u8; RAM_SIZE], cart: &Cartridge) {
    ram[addr::MODE] = mode::PLAYING;
    ram[addr::CATCHER_X] = CATCHER_MAX_X / 2;
    ram[addr::LIVES] = cart.lives;
    ram[addr::BALL_LIVE] = 0;
    ram[addr::BALLS_SERVED] = 0;
    set_score(ram, 0);
}

fn serve(ram: &mut [u8; RAM_SIZE], rng: &mut Random) {
    ram[addr::BALL_X] = rng.below(u32::from(BALL_MAX_X) + 1) as u8;
    ram[addr::BALL_Y] = 0;
    ram[addr::BALL_LIVE] = 1;
    ram[addr::BALLS_SERVED] = ram[addr::BALLS_SERVED].wrapping_add(1);
}

/// Run one frame of game logic.
pub fn step(
    ram: &mut [u8; RAM_SIZE],
    cart: &Cartridge,
    input: &InputFrame,
    rng: &mut Random,
) -> FrameOutcome {
    ram[addr::FRAME] = ram[addr::FRAME].wrapping_add(1);

    if input.console_reset {
        new_game(ram, cart);
        return FrameOutcome::default();
    }
    if ram[addr::MODE] != mode::PLAYING {
        return FrameOutcome {
            reward: 0,
            terminal: ram[addr::MODE] == mode::GAME_OVER,
        };
    }

    let fire = match cart.kernel {
        Kernel::Joystick => {
            let js = input.joysticks[0];
            let x = ram[addr::CATCHER_X];
            ram[addr::CATCHER_X] = if js.left {
                x.saturating_sub(CATCHER_SPEED)
            } else if js.right {
                x.saturating_add(CATCHER_SPEED).min(CATCHER_MAX_X)
            } else {
                x
            };
            js.fire
        }
        Kernel::Paddle => {
            let paddle = input.paddles[0];
            ram[addr::CATCHER_X] = (paddle.position() * f64::from(CATCHER_MAX_X)).round() as u8;
            paddle.fire
        }
    };

    if ram[addr::BALL_LIVE] == 0 {
        if cart.kernel == Kernel::Joystick || fire {
            serve(ram, rng);
        }
        return FrameOutcome::default();
    }

    let mut speed = cart.ball_speed;
    if fire && cart.kernel == Kernel::Joystick {
        speed *= 2;
    }
    ram[addr::BALL_Y] = ram[addr::BALL_Y].saturating_add(speed);
    if ram[addr::BALL_Y] < CATCHER_ROW {
        return FrameOutcome::default();
    }

    ram[addr::BALL_LIVE] = 0;
    let ball_x = ram[addr::BALL_X];
    let catcher_x = ram[addr::CATCHER_X];
    if ball_x + BALL_SIZE > catcher_x && ball_x < catcher_x + CATCHER_WIDTH {
        set_score(ram, score(ram).saturating_add(1));
        return FrameOutcome {
            reward: 1,
            terminal: false,
        };
    }

    ram[addr::LIVES] = ram[addr::LIVES].saturating_sub(1);
    let terminal = ram[addr::LIVES] == 0;
    if terminal {
        ram[addr::MODE] = mode::GAME_OVER;
        log::debug!("Game over with score {}", score(ram));
    }
    FrameOutcome {
        reward: -1,
        terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(kernel: Kernel) -> Cartridge {
        Cartridge::parse(&Cartridge::build(kernel, 2, 8, "Catch", &[])).expect("valid")
    }

    fn reset_input() -> InputFrame {
        InputFrame {
            console_reset: true,
            ..InputFrame::default()
        }
    }

    #[test]
    fn reachable_ram_passes_check() {
        let cartridge = cart(Kernel::Joystick);
        let mut ram = power_on(&cartridge);
        assert_eq!(check_ram(&ram, &cartridge), Ok(()));
        let mut rng = Random::new(3);
        step(&mut ram, &cartridge, &reset_input(), &mut rng);
        for _ in 0..200 {
            step(&mut ram, &cartridge, &InputFrame::default(), &mut rng);
            assert_eq!(check_ram(&ram, &cartridge), Ok(()));
        }

        ram[addr::BALL_X] = BALL_MAX_X + 1;
        assert!(check_ram(&ram, &cartridge).is_err());
    }

    #[test]
    fn attract_mode_ignores_input_until_reset() {
        let cart = cart(Kernel::Joystick);
        let mut ram = power_on(&cart);
        let mut rng = Random::new(0);
        let mut input = InputFrame::default();
        input.joysticks[0].left = true;
        step(&mut ram, &cart, &input, &mut rng);
        assert_eq!(ram[addr::MODE], mode::ATTRACT);
        assert_eq!(ram[addr::CATCHER_X], CATCHER_MAX_X / 2);

        step(&mut ram, &cart, &reset_input(), &mut rng);
        assert_eq!(ram[addr::MODE], mode::PLAYING);
    }

    #[test]
    fn joystick_serves_and_moves() {
        let cart = cart(Kernel::Joystick);
        let mut ram = power_on(&cart);
        let mut rng = Random::new(0);
        step(&mut ram, &cart, &reset_input(), &mut rng);
        step(&mut ram, &cart, &InputFrame::default(), &mut rng);
        assert_eq!(ram[addr::BALL_LIVE], 1);

        let mut input = InputFrame::default();
        input.joysticks[0].right = true;
        let before = ram[addr::CATCHER_X];
        step(&mut ram, &cart, &input, &mut rng);
        assert_eq!(ram[addr::CATCHER_X], before + CATCHER_SPEED);
    }

    #[test]
    fn paddle_kernel_waits_for_fire() {
        let cart = cart(Kernel::Paddle);
        let mut ram = power_on(&cart);
        let mut rng = Random::new(0);
        step(&mut ram, &cart, &reset_input(), &mut rng);
        step(&mut ram, &cart, &InputFrame::default(), &mut rng);
        assert_eq!(ram[addr::BALL_LIVE], 0);

        let mut input = InputFrame::default();
        input.paddles[0].fire = true;
        step(&mut ram, &cart, &input, &mut rng);
        assert_eq!(ram[addr::BALL_LIVE], 1);
    }

    #[test]
    fn catch_and_miss() {
        let cart = cart(Kernel::Joystick);
        let mut ram = power_on(&cart);
        let mut rng = Random::new(0);
        step(&mut ram, &cart, &reset_input(), &mut rng);

        ram[addr::BALL_LIVE] = 1;
        ram[addr::BALL_Y] = CATCHER_ROW - 1;
        ram[addr::BALL_X] = ram[addr::CATCHER_X];
        let out = step(&mut ram, &cart, &InputFrame::default(), &mut rng);
        assert_eq!(out.reward, 1);
        assert_eq!(score(&ram), 1);

        for expected_lives in [1, 0] {
            ram[addr::BALL_LIVE] = 1;
            ram[addr::BALL_Y] = CATCHER_ROW - 1;
            ram[addr::CATCHER_X] = 0;
            ram[addr::BALL_X] = BALL_MAX_X;
            let out = step(&mut ram, &cart, &InputFrame::default(), &mut rng);
            assert_eq!(out.reward, -1);
            assert_eq!(ram[addr::LIVES], expected_lives);
            assert_eq!(out.terminal, expected_lives == 0);
        }
        assert_eq!(ram[addr::MODE], mode::GAME_OVER);
        let out = step(&mut ram, &cart, &InputFrame::default(), &mut rng);
        assert!(out.terminal);
    }
}
