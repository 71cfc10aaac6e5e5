/// Width of one glyph cell at 100% scale, in pixels.
pub const CHAR_W: i32 = 9;
/// Height of one glyph cell at 100% scale, in pixels.
pub const CHAR_H: i32 = 14;
/// Gap between a fraction bar and its numerator/denominator.
pub const FRAC_PAD: i32 = 4;
/// Thickness of the fraction bar.
pub const FRAC_BAR_H: i32 = 2;
/// Percentage applied to the font scale inside exponents and subscripts.
pub const EXP_SCALE: i32 = 70;
/// Floor for the exponent scale so deeply nested powers stay legible.
pub const MIN_EXP_SCALE: i32 = 60;

/// Pixel box of one node: total width and height, plus the distance from
/// the top of the box to the baseline glyphs sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics {
    pub width: i32,
    pub height: i32,
    pub baseline: i32,
}

/// Scale a dimension by a percentage, truncating like the draw pass does.
pub(crate) fn scale(val: i32, percent: i32) -> i32 {
    val * percent / 100
}

pub(crate) fn text_width(text: &str, font_scale: i32) -> i32 {
    scale(CHAR_W * text.chars().count() as i32, font_scale)
}

pub(crate) fn text_height(font_scale: i32) -> i32 {
    scale(CHAR_H, font_scale)
}

/// Reduced scale used for exponent powers, with the legibility floor.
pub(crate) fn exponent_scale(font_scale: i32) -> i32 {
    scale(font_scale, EXP_SCALE).max(MIN_EXP_SCALE)
}
