//! 8x8 bitmap font: digits, upper-case letters, `.`, `!`, `:` and the menu
//! selector arrow. Bit 7 of each row byte is the leftmost pixel.

use core::fmt;

use super::Framebuffer;
use crate::constants::{CHAR_PIX_SIZE, SCREEN_WIDTH};

pub type Glyph = [u8; 8];

const DIGITS: [Glyph; 10] = [
    [0x38, 0x44, 0x4C, 0x54, 0x64, 0x44, 0x38, 0x00],
    [0x10, 0x30, 0x10, 0x10, 0x10, 0x10, 0x38, 0x00],
    [0x38, 0x44, 0x04, 0x08, 0x10, 0x20, 0x7C, 0x00],
    [0x7C, 0x08, 0x10, 0x08, 0x04, 0x44, 0x38, 0x00],
    [0x08, 0x18, 0x28, 0x48, 0x7C, 0x08, 0x08, 0x00],
    [0x7C, 0x40, 0x78, 0x04, 0x04, 0x44, 0x38, 0x00],
    [0x18, 0x20, 0x40, 0x78, 0x44, 0x44, 0x38, 0x00],
    [0x7C, 0x04, 0x08, 0x10, 0x20, 0x20, 0x20, 0x00],
    [0x38, 0x44, 0x44, 0x38, 0x44, 0x44, 0x38, 0x00],
    [0x38, 0x44, 0x44, 0x3C, 0x04, 0x08, 0x30, 0x00],
];

const LETTERS: [Glyph; 26] = [
    [0x38, 0x44, 0x44, 0x7C, 0x44, 0x44, 0x44, 0x00], // A
    [0x78, 0x44, 0x44, 0x78, 0x44, 0x44, 0x78, 0x00],
    [0x38, 0x44, 0x40, 0x40, 0x40, 0x44, 0x38, 0x00],
    [0x70, 0x48, 0x44, 0x44, 0x44, 0x48, 0x70, 0x00],
    [0x7C, 0x40, 0x40, 0x78, 0x40, 0x40, 0x7C, 0x00], // E
    [0x7C, 0x40, 0x40, 0x78, 0x40, 0x40, 0x40, 0x00],
    [0x38, 0x44, 0x40, 0x5C, 0x44, 0x44, 0x3C, 0x00],
    [0x44, 0x44, 0x44, 0x7C, 0x44, 0x44, 0x44, 0x00],
    [0x38, 0x10, 0x10, 0x10, 0x10, 0x10, 0x38, 0x00], // I
    [0x1C, 0x08, 0x08, 0x08, 0x08, 0x48, 0x30, 0x00],
    [0x44, 0x48, 0x50, 0x60, 0x50, 0x48, 0x44, 0x00],
    [0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x7C, 0x00],
    [0x44, 0x6C, 0x54, 0x54, 0x44, 0x44, 0x44, 0x00], // M
    [0x44, 0x44, 0x64, 0x54, 0x4C, 0x44, 0x44, 0x00],
    [0x38, 0x44, 0x44, 0x44, 0x44, 0x44, 0x38, 0x00],
    [0x78, 0x44, 0x44, 0x78, 0x40, 0x40, 0x40, 0x00],
    [0x38, 0x44, 0x44, 0x44, 0x54, 0x48, 0x34, 0x00], // Q
    [0x78, 0x44, 0x44, 0x78, 0x50, 0x48, 0x44, 0x00],
    [0x3C, 0x40, 0x40, 0x38, 0x04, 0x04, 0x78, 0x00],
    [0x7C, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x00],
    [0x44, 0x44, 0x44, 0x44, 0x44, 0x44, 0x38, 0x00], // U
    [0x44, 0x44, 0x44, 0x44, 0x44, 0x28, 0x10, 0x00],
    [0x44, 0x44, 0x44, 0x54, 0x54, 0x54, 0x28, 0x00],
    [0x44, 0x44, 0x28, 0x10, 0x28, 0x44, 0x44, 0x00],
    [0x44, 0x44, 0x44, 0x28, 0x10, 0x10, 0x10, 0x00], // Y
    [0x7C, 0x04, 0x08, 0x10, 0x20, 0x40, 0x7C, 0x00],
];

const PERIOD: Glyph = [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00];
const EXCLAMATION: Glyph = [0x10, 0x10, 0x10, 0x10, 0x10, 0x00, 0x10, 0x00];
const COLON: Glyph = [0x00, 0x30, 0x30, 0x00, 0x30, 0x30, 0x00, 0x00];
const BLANK: Glyph = [0; 8];

/// Right-pointing menu cursor.
pub const SELECTOR: Glyph = [0x20, 0x30, 0x38, 0x3C, 0x38, 0x30, 0x20, 0x00];

pub fn glyph(c: char) -> Option<&'static Glyph> {
    match c {
        '0'..='9' => Some(&DIGITS[c as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[c as usize - 'A' as usize]),
        ' ' => Some(&BLANK),
        '.' => Some(&PERIOD),
        '!' => Some(&EXCLAMATION),
        ':' => Some(&COLON),
        _ => None,
    }
}

/// Draw the set bits of `glyph`; unset bits leave the background alone.
pub fn draw_glyph(fb: &mut Framebuffer, glyph: &Glyph, x: i32, y: i32, color: u16) {
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            if bits & (0x80 >> col) != 0 {
                fb.set_pixel(x + col, y + row as i32, color);
            }
        }
    }
}

/// Draw `text` one cell per character. Characters without a glyph are
/// skipped but still advance the pen.
pub fn draw_text(fb: &mut Framebuffer, text: &str, x: i32, y: i32, color: u16) {
    for (i, c) in text.chars().enumerate() {
        if let Some(g) = glyph(c) {
            draw_glyph(fb, g, x + i as i32 * CHAR_PIX_SIZE, y, color);
        }
    }
}

pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * CHAR_PIX_SIZE
}

/// Left edge that centres `text` on the screen.
pub fn centered_x(text: &str) -> i32 {
    (SCREEN_WIDTH - text_width(text)) / 2
}

/// Left edge of a cursor + text pair centred on the screen.
pub fn centered_pair_x(text: &str) -> i32 {
    (SCREEN_WIDTH - (CHAR_PIX_SIZE + text_width(text))) / 2
}

/// Fixed-capacity text line for formatting scores without allocating.
/// Output past the capacity is dropped.
pub struct TextBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> TextBuf<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        let _ = fmt::Write::write_fmt(&mut buf, args);
        buf
    }

    pub fn as_str(&self) -> &str {
        // Only whole ASCII characters are ever stored
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }
}

impl<const N: usize> Default for TextBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for TextBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars().filter(char::is_ascii) {
            if self.len == N {
                break;
            }
            self.bytes[self.len] = c as u8;
            self.len += 1;
        }
        Ok(())
    }
}
