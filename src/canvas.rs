//! Braille dot canvas: each terminal cell holds a 2x4 grid of dots

use crate::colors::Rgb;
use crate::fractal::Surface;
use crate::layout::Rect;
use crate::terminal::Terminal;

/// Stroke widths are authored in screen pixels; a braille dot stands in for this many
const PIXELS_PER_DOT: f64 = 6.0;

// Bit for the dot at (dx, dy) within a cell, indexed [dy][dx]
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    dots: Vec<Option<Rgb>>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (cols, rows) = (cols as usize, rows as usize);
        Self {
            cols,
            rows,
            dots: vec![None; cols * 2 * rows * 4],
        }
    }

    fn dot_width(&self) -> usize {
        self.cols * 2
    }

    fn dot_height(&self) -> usize {
        self.rows * 4
    }

    pub fn plot(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.dot_width() && (y as usize) < self.dot_height() {
            let w = self.dot_width();
            self.dots[y as usize * w + x as usize] = Some(color);
        }
    }

    pub fn dot(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.dot_width() && y < self.dot_height() {
            self.dots[y * self.dot_width() + x]
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn lit_dots(&self) -> usize {
        self.dots.iter().filter(|d| d.is_some()).count()
    }

    /// Bresenham line between two dot positions
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Copy the canvas into `area` of the terminal buffer.
    /// A cell takes the color of its last lit dot in scan order.
    pub fn blit(&self, term: &mut Terminal, area: Rect) {
        for cy in 0..self.rows.min(area.height as usize) {
            for cx in 0..self.cols.min(area.width as usize) {
                let mut bits: u8 = 0;
                let mut color = None;
                for (dy, row) in DOT_BITS.iter().enumerate() {
                    for (dx, bit) in row.iter().enumerate() {
                        if let Some(c) = self.dot(cx * 2 + dx, cy * 4 + dy) {
                            bits |= bit;
                            color = Some(c);
                        }
                    }
                }
                if bits > 0 {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    term.set(
                        area.x as i32 + cx as i32,
                        area.y as i32 + cy as i32,
                        ch,
                        color.map(Rgb::to_color),
                        false,
                    );
                }
            }
        }
    }
}

impl Surface for BrailleCanvas {
    fn width(&self) -> f64 {
        self.dot_width() as f64
    }

    fn height(&self) -> f64 {
        self.dot_height() as f64
    }

    fn clear(&mut self) {
        self.dots.fill(None);
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        let (x0, y0) = (from.0.round() as i32, from.1.round() as i32);
        let (x1, y1) = (to.0.round() as i32, to.1.round() as i32);
        let thickness = (width / PIXELS_PER_DOT).round().max(1.0) as i32;

        if thickness == 1 {
            self.line(x0, y0, x1, y1, color);
            return;
        }

        // Thick strokes: parallel lines offset along the normal
        let (vx, vy) = (to.0 - from.0, to.1 - from.1);
        let len = (vx * vx + vy * vy).sqrt();
        let (nx, ny) = if len > f64::EPSILON { (-vy / len, vx / len) } else { (0.0, 1.0) };
        let half = (thickness - 1) as f64 / 2.0;
        let mut offset = -half;
        while offset <= half + f64::EPSILON {
            let (ox, oy) = ((nx * offset).round() as i32, (ny * offset).round() as i32);
            self.line(x0 + ox, y0 + oy, x1 + ox, y1 + oy, color);
            offset += 0.5;
        }
    }
}
