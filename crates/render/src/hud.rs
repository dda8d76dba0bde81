//! Score/lives overlay and the game-over screen.
//!
//! Digits use a 3x5 bitmap font on a 4-pixel pitch. Lives are drawn at the
//! top-left, the score right-aligned at the top-right.

use crate::palette::{Palette, PaletteSlot};
use crate::types::FrameBuffer;

pub const GLYPH_WIDTH: i32 = 3;
pub const GLYPH_HEIGHT: i32 = 5;
pub const GLYPH_PITCH: i32 = 4;

/// Row bitmaps, most significant of the low three bits is the left column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Decimal digits of `value`, most significant first, without allocating.
fn digits(mut value: u32, buf: &mut [u8; 10]) -> &[u8] {
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[i..]
}

/// Width in pixels taken by `value` at the font pitch.
pub fn number_width(value: u32) -> i32 {
    let mut buf = [0u8; 10];
    digits(value, &mut buf).len() as i32 * GLYPH_PITCH
}

pub fn draw_digit(
    fb: &mut FrameBuffer,
    digit: u8,
    x: i32,
    y: i32,
    slot: PaletteSlot,
    palette: &Palette,
) {
    let Some(rows) = DIGITS.get(digit as usize) else {
        return;
    };
    let color = palette.get(slot);
    for (dy, bits) in rows.iter().enumerate() {
        for dx in 0..GLYPH_WIDTH {
            if bits & (0b100 >> dx) != 0 {
                fb.set(x + dx, y + dy as i32, color);
            }
        }
    }
}

pub fn draw_number(
    fb: &mut FrameBuffer,
    value: u32,
    x: i32,
    y: i32,
    slot: PaletteSlot,
    palette: &Palette,
) {
    let mut buf = [0u8; 10];
    for (i, &d) in digits(value, &mut buf).iter().enumerate() {
        draw_digit(fb, d, x + i as i32 * GLYPH_PITCH, y, slot, palette);
    }
}

pub fn draw_hud(fb: &mut FrameBuffer, score: u32, lives: u32, palette: &Palette) {
    draw_number(fb, lives, 1, 1, PaletteSlot::HudLives, palette);
    let x = fb.width() as i32 - number_width(score);
    draw_number(fb, score, x, 1, PaletteSlot::HudScore, palette);
}

/// Dark fill with a 7-pixel X through the center.
pub fn draw_game_over(fb: &mut FrameBuffer, palette: &Palette) {
    fb.fill(palette.get(PaletteSlot::GameOver));
    let mark = palette.get(PaletteSlot::GameOverMark);
    let cx = fb.width() as i32 / 2;
    let cy = fb.height() as i32 / 2;
    for i in -3..=3 {
        fb.set(cx + i, cy + i, mark);
        fb.set(cx + i, cy - i, mark);
    }
}
