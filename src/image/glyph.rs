//! Digit glyph rasterization
//!
//! Digits come from a 5x7 bitmap font scaled up to fill most of the
//! indicator surface height.

/// Bitmap font columns
const FONT_WIDTH: u32 = 5;

/// Bitmap font rows
const FONT_HEIGHT: u32 = 7;

/// Each font cell becomes a SCALE x SCALE block of pixels
pub const SCALE: u32 = 8;

/// Rendered glyph width in pixels
pub const GLYPH_WIDTH: u32 = FONT_WIDTH * SCALE;

/// Rendered glyph height in pixels
pub const GLYPH_HEIGHT: u32 = FONT_HEIGHT * SCALE;

/// Distance from the slot origin to the top of the glyph, centering it
/// vertically on a 120 pixel surface
pub const TOP_INSET: u32 = (120 - GLYPH_HEIGHT) / 2;

/// 5x7 digits, one byte per row, bit 4 is the leftmost column
static DIGITS: [[u8; 7]; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
];

/// Get the bitmap rows for a digit, if it has a glyph
pub fn bitmap(digit: i32) -> Option<&'static [u8; 7]> {
    usize::try_from(digit).ok().and_then(|d| DIGITS.get(d))
}

/// Iterate over the lit pixels of a digit, relative to the slot origin
///
/// Yields nothing for values without a glyph.
pub fn pixels(digit: i32) -> impl Iterator<Item = (u32, u32)> {
    let rows = bitmap(digit);
    (0..GLYPH_HEIGHT)
        .flat_map(|py| (0..GLYPH_WIDTH).map(move |px| (px, py)))
        .filter(move |&(px, py)| {
            rows.is_some_and(|rows| {
                let row = rows[(py / SCALE) as usize];
                let column = px / SCALE;
                row & (1 << (FONT_WIDTH - 1 - column)) != 0
            })
        })
        .map(|(px, py)| (px, py + TOP_INSET))
}
