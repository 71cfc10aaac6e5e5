//! The draw pass. Walks the tree in the same order as the measure pass
//! and re-measures every subtree to place it, so positions always agree
//! with the reported metrics. All cross-node draw state (paren nesting
//! depth, cursor visibility, bracket coloring) lives in the pass object
//! and dies with it; a fresh top-level draw always starts at depth 0.

use crate::editing::expr::Expression;
use crate::editing::node::{NodeId, NodeKind, TextKind};
use crate::render::measure::measure;
use crate::render::metrics::{
    CHAR_H, EXP_SCALE, FRAC_BAR_H, FRAC_PAD, exponent_scale, scale, text_width,
};
use crate::render::surface::{
    COLOR_BACKGROUND, COLOR_CURSOR, COLOR_FRAC_BAR, COLOR_PLACEHOLDER, COLOR_TEXT, DrawSurface,
    PAREN_PALETTE, Rgb,
};

/// Flags the rendering host controls per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Cursor flash state; the host toggles this on a timer.
    pub cursor_visible: bool,
    /// Color nested brackets by depth instead of drawing them all black.
    pub color_brackets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            cursor_visible: true,
            color_brackets: true,
        }
    }
}

/// Draw the whole expression with its top-left corner at `(x, y)`,
/// at 100% scale.
pub fn draw<S: DrawSurface>(
    expr: &Expression,
    surface: &mut S,
    x: i32,
    y: i32,
    options: RenderOptions,
) {
    let m = measure(expr.pool(), expr.root(), 100);
    let mut pass = DrawPass {
        expr,
        surface,
        options,
        paren_depth: 0,
    };
    pass.draw_sequence(expr.root(), x, y + m.baseline, 100);
}

struct DrawPass<'a, S: DrawSurface> {
    expr: &'a Expression,
    surface: &'a mut S,
    options: RenderOptions,
    paren_depth: usize,
}

impl<S: DrawSurface> DrawPass<'_, S> {
    /// Fill the inclusive pixel rectangle (x1,y1)..(x2,y2).
    fn rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgb) {
        self.surface.fill_rect(x1, y1, x2 - x1 + 1, y2 - y1 + 1, color);
    }

    fn cursor_in(&self, seq: NodeId) -> bool {
        self.expr.cursor().sequence == seq
    }

    fn is_empty(&self, seq: NodeId) -> bool {
        self.expr.pool().is_empty(seq)
    }

    /// Empty slots always show a box: filled when the cursor sits in
    /// them (and is in its visible flash phase), bordered otherwise.
    fn placeholder(&mut self, x: i32, y: i32, w: i32, h: i32, slot: NodeId) {
        if self.cursor_in(slot) && self.options.cursor_visible {
            self.rect(x, y, x + w - 1, y + h - 1, COLOR_CURSOR);
        } else {
            self.surface.fill_rect(x, y, w, h, COLOR_BACKGROUND);
            let (x2, y2) = (x + w - 1, y + h - 1);
            self.surface.draw_line(x, y, x2, y, COLOR_PLACEHOLDER);
            self.surface.draw_line(x, y2, x2, y2, COLOR_PLACEHOLDER);
            self.surface.draw_line(x, y, x, y2, COLOR_PLACEHOLDER);
            self.surface.draw_line(x2, y, x2, y2, COLOR_PLACEHOLDER);
        }
    }

    fn cursor_line(&mut self, x: i32, y: i32, h: i32) {
        if !self.options.cursor_visible {
            return;
        }
        self.surface.draw_line(x, y, x, y + h - 1, COLOR_CURSOR);
        self.surface.draw_line(x + 1, y, x + 1, y + h - 1, COLOR_CURSOR);
    }

    fn draw_sequence(&mut self, seq: NodeId, x: i32, y_baseline: i32, font_scale: i32) {
        let cursor_here = self.cursor_in(seq);
        let cursor_after = self.expr.cursor().after;
        let cursor_h = CHAR_H * font_scale / 100 + 4;
        let cursor_offset = cursor_h / 2;
        let mut cx = x;

        if cursor_here && cursor_after.is_none() {
            self.cursor_line(cx, y_baseline - cursor_offset, cursor_h);
            cx += 3;
        }

        let mut child = self.expr.pool().first_child(seq);
        while let Some(c) = child {
            let cm = measure(self.expr.pool(), c, font_scale);
            self.draw_node(c, cx, y_baseline, font_scale);
            cx += cm.width;

            if cursor_here && cursor_after == Some(c) {
                self.cursor_line(cx, y_baseline - cursor_offset, cursor_h);
                cx += 3;
            }

            child = self.expr.pool().node(c).next;
        }
    }

    fn draw_node(&mut self, id: NodeId, x: i32, y_baseline: i32, font_scale: i32) {
        let m = measure(self.expr.pool(), id, font_scale);
        let y_top = y_baseline - m.baseline;
        let kind = self.expr.pool().node(id).kind.clone();

        match kind {
            NodeKind::Empty => {}

            NodeKind::Sequence { .. } => self.draw_sequence(id, x, y_baseline, font_scale),

            NodeKind::Text { kind, text } => match kind {
                TextKind::Pi => {
                    // Hand-drawn π, roughly 8x10: the font has no glyph.
                    self.rect(x, y_top, x + 7, y_top + 1, COLOR_TEXT);
                    self.rect(x + 1, y_top + 1, x + 2, y_top + 9, COLOR_TEXT);
                    self.rect(x + 5, y_top + 1, x + 6, y_top + 9, COLOR_TEXT);
                }
                TextKind::Operator => {
                    let shown = match text.as_str() {
                        "×" => "*",
                        "÷" => "/",
                        other => other,
                    };
                    self.surface.draw_text(x, y_top, shown, COLOR_TEXT);
                }
                _ => self.surface.draw_text(x, y_top, &text, COLOR_TEXT),
            },

            NodeKind::Fraction { numer, denom } => {
                let num = measure(self.expr.pool(), numer, font_scale);
                let den = measure(self.expr.pool(), denom, font_scale);

                let bar_y = y_baseline;
                let num_y = bar_y - FRAC_PAD - num.height + num.baseline;
                let den_y = bar_y + FRAC_PAD + FRAC_BAR_H + den.baseline;
                let num_x = x + (m.width - num.width) / 2;
                let den_x = x + (m.width - den.width) / 2;

                if self.is_empty(numer) {
                    self.placeholder(num_x, bar_y - FRAC_PAD - 10, num.width, 10, numer);
                } else {
                    self.draw_sequence(numer, num_x, num_y, font_scale);
                }

                self.rect(x + 1, bar_y, x + m.width - 2, bar_y + FRAC_BAR_H - 1, COLOR_FRAC_BAR);

                if self.is_empty(denom) {
                    self.placeholder(den_x, bar_y + FRAC_PAD + FRAC_BAR_H, den.width, 10, denom);
                } else {
                    self.draw_sequence(denom, den_x, den_y, font_scale);
                }
            }

            NodeKind::Exponent { base, power } => {
                let base_m = measure(self.expr.pool(), base, font_scale);
                let exp_scale = exponent_scale(font_scale);
                let power_m = measure(self.expr.pool(), power, exp_scale);

                if self.is_empty(base) {
                    self.placeholder(x, y_top, 8, m.height, base);
                } else {
                    self.draw_sequence(base, x, y_baseline, font_scale);
                }

                let power_x = x + base_m.width + 3;
                let power_y = y_top + power_m.baseline;
                if self.is_empty(power) {
                    self.placeholder(power_x, y_top, power_m.width, power_m.height, power);
                } else {
                    self.draw_sequence(power, power_x, power_y, exp_scale);
                }
            }

            NodeKind::Subscript { base, sub } => {
                let base_m = measure(self.expr.pool(), base, font_scale);
                let sub_scale = scale(font_scale, EXP_SCALE);
                let sub_m = measure(self.expr.pool(), sub, sub_scale);

                if self.is_empty(base) {
                    self.placeholder(x, y_top, 8, base_m.height, base);
                } else {
                    self.draw_sequence(base, x, y_baseline, font_scale);
                }

                let sub_x = x + base_m.width;
                let sub_y = y_baseline + sub_m.baseline;
                if self.is_empty(sub) {
                    self.placeholder(sub_x, y_baseline, sub_m.width, sub_m.height, sub);
                } else {
                    self.draw_sequence(sub, sub_x, sub_y, sub_scale);
                }
            }

            NodeKind::Root { index, content } => {
                let content_m = measure(self.expr.pool(), content, font_scale);
                let radical_w = scale(10, font_scale);
                let (index_w, index_h) = if index != 2 {
                    self.surface.draw_text(x, y_top, &index.to_string(), COLOR_TEXT);
                    (8, 8)
                } else {
                    (0, 0)
                };

                let rx = x + index_w;
                let ry = y_top + index_h / 2;
                let rh = m.height - index_h / 2;
                self.radical(rx, ry, rh, radical_w, x + m.width - 1, y_baseline);

                let cx = rx + radical_w;
                if self.is_empty(content) {
                    self.placeholder(cx, ry + 2, content_m.width, content_m.height, content);
                } else {
                    self.draw_sequence(content, cx, y_baseline, font_scale);
                }
            }

            NodeKind::NthRoot { index, content } => {
                let idx_scale = scale(font_scale, 60);
                let mut idx_m = measure(self.expr.pool(), index, idx_scale);
                let content_m = measure(self.expr.pool(), content, font_scale);
                let radical_w = scale(10, font_scale);
                idx_m.width = idx_m.width.max(8);
                idx_m.height = idx_m.height.max(8);

                if self.is_empty(index) {
                    self.placeholder(x, y_top, idx_m.width, idx_m.height, index);
                } else {
                    self.draw_sequence(index, x, y_top + idx_m.baseline, idx_scale);
                }

                let rx = x + idx_m.width;
                let ry = y_top + idx_m.height / 2;
                let rh = m.height - idx_m.height / 2;
                self.radical(rx, ry, rh, radical_w, x + m.width - 1, y_baseline);

                let cx = rx + radical_w;
                if self.is_empty(content) {
                    self.placeholder(cx, ry + 2, content_m.width, content_m.height, content);
                } else {
                    self.draw_sequence(content, cx, y_baseline, font_scale);
                }
            }

            NodeKind::MixedFraction {
                whole,
                numer,
                denom,
            } => {
                let mut whole_m = measure(self.expr.pool(), whole, font_scale);
                let mut num = measure(self.expr.pool(), numer, font_scale);
                let mut den = measure(self.expr.pool(), denom, font_scale);
                whole_m.width = whole_m.width.max(8);
                num.width = num.width.max(10);
                den.width = den.width.max(10);

                let frac_w = num.width.max(den.width) + 4;

                if self.is_empty(whole) {
                    let wy = y_top + (m.height - whole_m.height) / 2;
                    self.placeholder(x, wy, whole_m.width, whole_m.height, whole);
                } else {
                    self.draw_sequence(whole, x, y_baseline, font_scale);
                }

                let fx = x + whole_m.width + 4;
                let bar_y = y_baseline - FRAC_BAR_H / 2;

                let num_x = fx + (frac_w - num.width) / 2;
                let num_y = bar_y - FRAC_PAD - num.height + num.baseline;
                if self.is_empty(numer) {
                    self.placeholder(num_x, bar_y - FRAC_PAD - num.height, num.width, num.height, numer);
                } else {
                    self.draw_sequence(numer, num_x, num_y, font_scale);
                }

                self.rect(fx, bar_y, fx + frac_w - 1, bar_y + FRAC_BAR_H - 1, COLOR_FRAC_BAR);

                let den_x = fx + (frac_w - den.width) / 2;
                let den_y = bar_y + FRAC_BAR_H + FRAC_PAD + den.baseline;
                if self.is_empty(denom) {
                    self.placeholder(den_x, bar_y + FRAC_BAR_H + FRAC_PAD, den.width, den.height, denom);
                } else {
                    self.draw_sequence(denom, den_x, den_y, font_scale);
                }
            }

            NodeKind::Abs { content } => {
                let content_m = measure(self.expr.pool(), content, font_scale);

                self.surface
                    .draw_line(x + 2, y_top, x + 2, y_top + m.height - 1, COLOR_TEXT);
                self.surface.draw_line(
                    x + m.width - 3,
                    y_top,
                    x + m.width - 3,
                    y_top + m.height - 1,
                    COLOR_TEXT,
                );

                let cx = x + 4;
                if self.is_empty(content) {
                    self.placeholder(cx, y_top + 2, content_m.width, content_m.height, content);
                } else {
                    self.draw_sequence(content, cx, y_baseline, font_scale);
                }
            }

            NodeKind::Paren { content } => {
                let content_m = measure(self.expr.pool(), content, font_scale);
                let color = if self.options.color_brackets {
                    PAREN_PALETTE[self.paren_depth % PAREN_PALETTE.len()]
                } else {
                    COLOR_TEXT
                };
                self.paren_depth += 1;

                let paren_w = 6 + if m.height > 24 { 2 } else { 0 };

                if m.height <= 20 {
                    // Short content: plain glyph parens.
                    let ty = y_top + (m.height - 14) / 2;
                    self.surface.draw_text(x + 2, ty, "(", color);
                    self.surface.draw_text(x + m.width - paren_w - 2, ty, ")", color);
                } else {
                    // Tall content: hand-drawn parabolic curves, deepest
                    // at mid-height, doubled in thickness when tall.
                    let h = m.height - 4;
                    let left_x = x + 5;
                    let right_x = x + m.width - 6;
                    let top_y = y_top + 2;
                    let curve = if h > 40 { 4 } else { 3 };

                    for i in 0..=h {
                        let d = i - h / 2;
                        let offset = curve - (curve * d * d * 4) / (h * h);
                        self.surface.plot_pixel(left_x - offset, top_y + i, color);
                        if h > 30 {
                            self.surface.plot_pixel(left_x - offset - 1, top_y + i, color);
                        }
                    }
                    for i in 0..=h {
                        let d = i - h / 2;
                        let offset = curve - (curve * d * d * 4) / (h * h);
                        self.surface.plot_pixel(right_x + offset, top_y + i, color);
                        if h > 30 {
                            self.surface.plot_pixel(right_x + offset + 1, top_y + i, color);
                        }
                    }
                }

                let cx = x + paren_w + 2;
                if self.is_empty(content) {
                    self.placeholder(cx, y_top + 2, content_m.width, content_m.height, content);
                } else {
                    self.draw_sequence(content, cx, y_baseline, font_scale);
                }

                self.paren_depth -= 1;
            }

            NodeKind::Function { name, arg } => {
                let name_w = text_width(&name, font_scale);

                self.surface.draw_text(x, y_top, &name, COLOR_TEXT);
                self.surface.draw_text(x + name_w, y_top, "(", COLOR_TEXT);

                let ax = x + name_w + 6;
                if self.is_empty(arg) {
                    self.placeholder(ax, y_top, 8, m.height, arg);
                } else {
                    self.draw_sequence(arg, ax, y_baseline, font_scale);
                }

                self.surface.draw_text(x + m.width - 6, y_top, ")", COLOR_TEXT);
            }
        }
    }

    /// Radical glyph: short down-stroke, up-stroke, then the horizontal
    /// bar across the content.
    fn radical(&mut self, rx: i32, ry: i32, rh: i32, radical_w: i32, bar_end_x: i32, y_baseline: i32) {
        self.surface
            .draw_line(rx, y_baseline, rx + 3, ry + rh - 1, COLOR_TEXT);
        self.surface
            .draw_line(rx + 3, ry + rh - 1, rx + radical_w - 2, ry, COLOR_TEXT);
        self.surface
            .draw_line(rx + radical_w - 2, ry, bar_end_x, ry, COLOR_TEXT);
    }
}
