//! Terminal cell canvas: an implementation of the engine's drawing
//! surface that down-maps pixel geometry onto character cells. A column
//! stands for one glyph width (9 px); rows are half a glyph tall (7 px)
//! so fraction bars, numerators and denominators land on distinct rows
//! even though the terminal cannot address pixels.

use mathcanvas_engine::render::metrics::{CHAR_H, CHAR_W};
use mathcanvas_engine::render::surface::{DrawSurface, Rgb};

const CELL_H: i32 = CHAR_H / 2;

#[derive(Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Rgb::new(0, 0, 0),
};

pub struct CellCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        CellCanvas {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, cx: usize, cy: usize) -> Cell {
        self.cells[cy * self.width + cx]
    }

    fn set(&mut self, cx: i32, cy: i32, ch: char, color: Rgb) {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return;
        }
        self.cells[cy as usize * self.width + cx as usize] = Cell { ch, color };
    }

    /// Faint marks only land on blank cells so curve dots never eat
    /// glyphs drawn earlier.
    fn set_faint(&mut self, cx: i32, cy: i32, ch: char, color: Rgb) {
        if cx < 0 || cy < 0 || cx as usize >= self.width || cy as usize >= self.height {
            return;
        }
        let idx = cy as usize * self.width + cx as usize;
        if self.cells[idx].ch == ' ' {
            self.cells[idx] = Cell { ch, color };
        }
    }
}

fn col(x: i32) -> i32 {
    x.div_euclid(CHAR_W)
}

fn row(y: i32) -> i32 {
    y.div_euclid(CELL_H)
}

impl DrawSurface for CellCanvas {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        // Thin rectangles are bars, not boxes.
        let ch = if h <= 4 {
            '─'
        } else if w <= 4 {
            '│'
        } else {
            '█'
        };
        for cy in row(y)..=row(y + h - 1) {
            for cx in col(x)..=col(x + w - 1) {
                self.set(cx, cy, ch, color);
            }
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        if x0 == x1 {
            let (a, b) = (row(y0.min(y1)), row(y0.max(y1)));
            for cy in a..=b {
                self.set(col(x0), cy, '│', color);
            }
            return;
        }
        if y0 == y1 {
            let (a, b) = (col(x0.min(x1)), col(x0.max(x1)));
            for cx in a..=b {
                self.set(cx, row(y0), '─', color);
            }
            return;
        }

        // Diagonal stroke (radical legs): walk in pixel steps and mark
        // each crossed cell.
        let rising = (x1 - x0) * (y1 - y0) < 0;
        let ch = if rising { '/' } else { '\\' };
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let x = x0 + (x1 - x0) * i / steps;
            let y = y0 + (y1 - y0) * i / steps;
            self.set_faint(col(x), row(y), ch, color);
        }
    }

    fn plot_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.set_faint(col(x), row(y), '·', color);
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) {
        let cy = row(y);
        let mut cx = col(x);
        for ch in text.chars() {
            self.set(cx, cy, ch, color);
            cx += 1;
        }
    }
}
