//! The measure pass: pure bottom-up geometry. Integer math throughout;
//! the draw pass re-runs these exact formulas, so any change here is a
//! change to what gets drawn.

use crate::editing::node::{NodeId, NodeKind, TextKind};
use crate::editing::pool::NodePool;
use crate::render::metrics::{
    FRAC_BAR_H, FRAC_PAD, EXP_SCALE, Metrics, exponent_scale, scale, text_height, text_width,
};

/// Measure one node at the given font scale (percent of the base glyph
/// cell). Empty child slots are padded up to minimum placeholder boxes
/// so there is always something to point the cursor at.
pub fn measure(pool: &NodePool, node: NodeId, font_scale: i32) -> Metrics {
    match &pool.node(node).kind {
        NodeKind::Sequence { .. } => measure_sequence(pool, node, font_scale),

        NodeKind::Text { kind, text } => {
            let height = text_height(font_scale);
            let width = if *kind == TextKind::Pi {
                // The π glyph is hand-drawn at a fixed size.
                10
            } else {
                text_width(text, font_scale)
            };
            Metrics {
                width,
                height,
                baseline: height / 2,
            }
        }

        NodeKind::Fraction { numer, denom } => {
            let mut num = measure(pool, *numer, font_scale);
            let mut den = measure(pool, *denom, font_scale);
            num.width = num.width.max(12);
            den.width = den.width.max(12);
            num.height = num.height.max(10);
            den.height = den.height.max(10);

            Metrics {
                width: num.width.max(den.width) + 4,
                height: num.height + FRAC_PAD + FRAC_BAR_H + FRAC_PAD + den.height,
                baseline: num.height + FRAC_PAD,
            }
        }

        NodeKind::Exponent { base, power } => {
            let base_m = measure(pool, *base, font_scale);
            let mut power_m = measure(pool, *power, exponent_scale(font_scale));
            power_m.width = power_m.width.max(8);
            power_m.height = power_m.height.max(10);

            // Small overlap so the power hugs the base's top corner.
            Metrics {
                width: base_m.width + power_m.width + 4,
                height: base_m.height + power_m.height - 4,
                baseline: base_m.baseline + power_m.height - 4,
            }
        }

        NodeKind::Subscript { base, sub } => {
            let base_m = measure(pool, *base, font_scale);
            let mut sub_m = measure(pool, *sub, scale(font_scale, EXP_SCALE));
            sub_m.width = sub_m.width.max(8);
            sub_m.height = sub_m.height.max(8);

            Metrics {
                width: base_m.width + sub_m.width,
                height: base_m.height + sub_m.height / 2,
                baseline: base_m.baseline,
            }
        }

        NodeKind::Root { index, content } => {
            let mut c = measure(pool, *content, font_scale);
            c.width = c.width.max(12);
            c.height = c.height.max(10);

            let radical_w = scale(10, font_scale);
            let (index_w, index_h) = if *index != 2 { (8, 8) } else { (0, 0) };

            Metrics {
                width: index_w + radical_w + c.width + 2,
                height: c.height + 4 + index_h / 2,
                baseline: c.baseline + 2 + index_h / 2,
            }
        }

        NodeKind::NthRoot { index, content } => {
            let mut idx = measure(pool, *index, scale(font_scale, 60));
            let mut c = measure(pool, *content, font_scale);
            idx.width = idx.width.max(8);
            idx.height = idx.height.max(8);
            c.width = c.width.max(12);
            c.height = c.height.max(10);

            let radical_w = scale(10, font_scale);
            Metrics {
                width: idx.width + radical_w + c.width + 2,
                height: c.height + 4 + idx.height / 2,
                baseline: c.baseline + 2 + idx.height / 2,
            }
        }

        NodeKind::MixedFraction {
            whole,
            numer,
            denom,
        } => {
            let mut whole_m = measure(pool, *whole, font_scale);
            let mut num = measure(pool, *numer, font_scale);
            let mut den = measure(pool, *denom, font_scale);
            whole_m.width = whole_m.width.max(8);
            whole_m.height = whole_m.height.max(10);
            num.width = num.width.max(10);
            den.width = den.width.max(10);
            num.height = num.height.max(8);
            den.height = den.height.max(8);

            let frac_w = num.width.max(den.width) + 4;
            let frac_h = num.height + FRAC_PAD + FRAC_BAR_H + FRAC_PAD + den.height;

            Metrics {
                width: whole_m.width + 4 + frac_w,
                height: frac_h.max(whole_m.height),
                baseline: num.height + FRAC_PAD,
            }
        }

        NodeKind::Abs { content } => {
            let mut c = measure(pool, *content, font_scale);
            c.width = c.width.max(8);
            c.height = c.height.max(10);

            Metrics {
                width: c.width + 8,
                height: c.height + 4,
                baseline: c.baseline + 2,
            }
        }

        NodeKind::Paren { content } => {
            let mut c = measure(pool, *content, font_scale);
            c.width = c.width.max(8);
            c.height = c.height.max(10);

            // Parens widen slightly once the content gets tall.
            let paren_w = 6 + if c.height > 20 { 2 } else { 0 };
            Metrics {
                width: c.width + paren_w * 2 + 4,
                height: c.height + 4,
                baseline: c.baseline + 2,
            }
        }

        NodeKind::Function { name, arg } => {
            let name_w = text_width(name, font_scale);
            let mut a = measure(pool, *arg, font_scale);
            a.width = a.width.max(8);
            a.height = a.height.max(10);

            let height = a.height.max(text_height(font_scale));
            Metrics {
                width: name_w + 6 + a.width + 6,
                height,
                baseline: height / 2,
            }
        }

        NodeKind::Empty => Metrics {
            width: 8,
            height: 10,
            baseline: 5,
        },
    }
}

fn measure_sequence(pool: &NodePool, seq: NodeId, font_scale: i32) -> Metrics {
    let mut width = 0;
    let mut max_above = 0;
    let mut max_below = 0;

    for child in pool.children(seq) {
        let cm = measure(pool, child, font_scale);
        width += cm.width;
        max_above = max_above.max(cm.baseline);
        max_below = max_below.max(cm.height - cm.baseline);
    }

    let mut m = Metrics {
        width,
        height: max_above + max_below,
        baseline: max_above,
    };
    // An empty slot still occupies a minimum placeholder box.
    if m.width == 0 {
        m.width = 8;
    }
    if m.height == 0 {
        m.height = text_height(font_scale);
        m.baseline = m.height / 2;
    }
    m
}
