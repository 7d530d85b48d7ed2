//! Team color resolution and the text contrast rule.
//!
//! Relative luminance uses the Rec. 709 weights (`0.2126 R + 0.7152 G +
//! 0.0722 B`). The weights are kept as integers scaled by 10 000 so the
//! threshold comparison is exact: a luminance of exactly 160 selects black.

use scorebug_types::Side;

/// Text color drawn on light backgrounds.
pub const DARK_TEXT: &str = "#000000";

/// Text color drawn on dark backgrounds.
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// Luminance at or above which text is drawn dark, scaled by 10 000.
const DARK_TEXT_THRESHOLD: u32 = 1_600_000;

const WEIGHT_RED: u32 = 2126;
const WEIGHT_GREEN: u32 = 7152;
const WEIGHT_BLUE: u32 = 722;

/// Parse `#RRGGBB` (the `#` is optional) into its channels.
pub fn parse_hex(input: &str) -> Option<(u8, u8, u8)> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: core::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Luminance of a color scaled by 10 000 (0 to 2 550 000).
pub fn scaled_luminance(red: u8, green: u8, blue: u8) -> u32 {
    u32::from(red)
        .saturating_mul(WEIGHT_RED)
        .saturating_add(u32::from(green).saturating_mul(WEIGHT_GREEN))
        .saturating_add(u32::from(blue).saturating_mul(WEIGHT_BLUE))
}

/// Background color for `side`: the team's own color when it parses,
/// otherwise the side default. Always returned as upper-case `#RRGGBB`.
pub fn resolve_background(color: &str, side: Side) -> String {
    let (red, green, blue) = parse_hex(color)
        .or_else(|| parse_hex(side.default_color()))
        .unwrap_or_default();
    format!("#{red:02X}{green:02X}{blue:02X}")
}

/// Text color readable on `background`.
///
/// Unparseable input is treated as black, so the answer is white.
pub fn contrast_text(background: &str) -> &'static str {
    let (red, green, blue) = parse_hex(background).unwrap_or_default();
    if scaled_luminance(red, green, blue) >= DARK_TEXT_THRESHOLD {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}
