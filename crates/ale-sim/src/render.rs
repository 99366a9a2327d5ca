//! Draws the framebuffer from RAM.

use ale_core::RAM_SIZE;

use crate::cartridge::Cartridge;
use crate::kernel::{
    BALL_SIZE, CATCHER_ROW, CATCHER_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, addr, mode, score,
};

const SCORE_COLOUR: u8 = 0x1E;
const LIVES_COLOUR: u8 = 0xC8;
const BALL_COLOUR: u8 = 0x44;
const CATCHER_COLOUR: u8 = 0x86;
const BANNER_COLOUR: u8 = 0x0E;
const GAME_OVER_COLOUR: u8 = 0x36;

const STATUS_ROWS: usize = 8;
const CATCHER_HEIGHT: usize = 4;

pub fn render(frame: &mut [u8], ram: &[u8; RAM_SIZE], cart: &Cartridge) {
    frame.fill(cart.background());

    // Score bar along the top left, lives as blocks on the top right.
    let score_width = usize::from(score(ram)).min(SCREEN_WIDTH / 2);
    fill_rect(frame, 0, 0, score_width, STATUS_ROWS, SCORE_COLOUR);
    for life in 0..usize::from(ram[addr::LIVES]) {
        let x = SCREEN_WIDTH - (life + 1) * 8;
        fill_rect(frame, x, 0, 6, STATUS_ROWS, LIVES_COLOUR);
    }

    match ram[addr::MODE] {
        mode::ATTRACT => {
            // Banner stripes whose phase follows the frame counter.
            let phase = usize::from(ram[addr::FRAME] / 8) % 2;
            for band in 0..5 {
                if band % 2 == phase {
                    fill_rect(frame, 16, 90 + band * 6, SCREEN_WIDTH - 32, 6, BANNER_COLOUR);
                }
            }
        }
        mode::GAME_OVER => {
            fill_rect(frame, 0, 96, SCREEN_WIDTH, 18, GAME_OVER_COLOUR);
        }
        _ => {
            if ram[addr::BALL_LIVE] != 0 {
                let size = usize::from(BALL_SIZE);
                let y = usize::from(ram[addr::BALL_Y]) + STATUS_ROWS;
                fill_rect(frame, usize::from(ram[addr::BALL_X]), y, size, size, BALL_COLOUR);
            }
            fill_rect(
                frame,
                usize::from(ram[addr::CATCHER_X]),
                usize::from(CATCHER_ROW) + STATUS_ROWS,
                usize::from(CATCHER_WIDTH),
                CATCHER_HEIGHT,
                CATCHER_COLOUR,
            );
        }
    }
}

/// Fill a rectangle, clipped to the screen.
fn fill_rect(frame: &mut [u8], x: usize, y: usize, w: usize, h: usize, colour: u8) {
    let x_end = (x + w).min(SCREEN_WIDTH);
    let y_end = (y + h).min(SCREEN_HEIGHT);
    for row in y.min(y_end)..y_end {
        let start = row * SCREEN_WIDTH;
        frame[start + x.min(x_end)..start + x_end].fill(colour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Kernel;
    use crate::kernel::power_on;

    #[test]
    fn playing_frame_shows_catcher() {
        let cart = Cartridge::parse(&Cartridge::build(Kernel::Joystick, 3, 2, "Catch", &[0x02]))
            .expect("valid");
        let mut ram = power_on(&cart);
        ram[addr::MODE] = mode::PLAYING;
        ram[addr::CATCHER_X] = 10;
        let mut frame = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT];
        render(&mut frame, &ram, &cart);

        let row = (usize::from(CATCHER_ROW) + STATUS_ROWS) * SCREEN_WIDTH;
        assert_eq!(frame[row + 10], CATCHER_COLOUR);
        assert_eq!(frame[row + 9], 0x02);
        // Three lives drawn at the top right.
        assert_eq!(frame[SCREEN_WIDTH - 8], LIVES_COLOUR);
        assert_eq!(frame[SCREEN_WIDTH - 24], LIVES_COLOUR);
        assert_eq!(frame[SCREEN_WIDTH - 32], 0x02);
    }

    #[test]
    fn clipped_rect_stays_in_bounds() {
        let mut frame = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT];
        fill_rect(&mut frame, 158, 208, 8, 8, 1);
        assert_eq!(frame.iter().filter(|&&p| p == 1).count(), 4);
    }
}
