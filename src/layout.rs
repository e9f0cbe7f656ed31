use crate::terminal::Terminal;
use crossterm::style::Color;

// Box drawing characters (rounded)
pub const BOX_TL: char = '╭';
pub const BOX_TR: char = '╮';
pub const BOX_BL: char = '╰';
pub const BOX_BR: char = '╯';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';
pub const BOX_TITLE_L: char = '┤';
pub const BOX_TITLE_R: char = '├';

// Partial block characters for smooth meters (1/8 increments)
pub const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Rectangle in terminal cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Area inside a one-cell border
    pub fn inner(&self) -> Rect {
        Rect {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where each piece of the game screen goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameLayout {
    pub player: Rect,
    pub target: Rect,
    pub controls: Rect,
    pub status: Rect,
    pub landscape: bool,
}

/// Rows taken by the control panel (one per parameter plus border and difficulty row)
pub const CONTROL_ROWS: u16 = 13;

/// Split the viewport into two canvases, the control panel and a status line.
///
/// Cells are about twice as tall as wide, so the screen counts as landscape
/// when it has at least two columns per row.
pub fn split_viewport(width: u16, height: u16) -> GameLayout {
    let status = Rect::new(0, height.saturating_sub(1), width, height.min(1));
    let controls_h = CONTROL_ROWS.min(height.saturating_sub(1));
    let controls = Rect::new(0, status.y.saturating_sub(controls_h), width, controls_h);
    let canvas_h = controls.y;
    let landscape = width >= height.saturating_mul(2);

    let (player, target) = if landscape {
        let half = width / 2;
        (
            Rect::new(0, 0, half, canvas_h),
            Rect::new(half, 0, width - half, canvas_h),
        )
    } else {
        let half = canvas_h / 2;
        (
            Rect::new(0, 0, width, half),
            Rect::new(0, half, width, canvas_h - half),
        )
    };

    GameLayout { player, target, controls, status, landscape }
}

/// A bordered box with an optional centered title
pub struct Panel<'a> {
    pub rect: Rect,
    pub title: &'a str,
    pub title_color: Color,
    pub border_color: Color,
}

impl<'a> Panel<'a> {
    pub fn new(rect: Rect, title: &'a str) -> Self {
        Self {
            rect,
            title,
            title_color: Color::White,
            border_color: Color::DarkGrey,
        }
    }

    pub fn colors(mut self, title: Color, border: Color) -> Self {
        self.title_color = title;
        self.border_color = border;
        self
    }

    /// Draw the box border and title
    pub fn draw(&self, term: &mut Terminal) {
        if self.rect.width < 2 || self.rect.height < 2 {
            return;
        }
        let x = self.rect.x as i32;
        let y = self.rect.y as i32;
        let w = self.rect.width as i32;
        let h = self.rect.height as i32;
        let bc = Some(self.border_color);

        term.set(x, y, BOX_TL, bc, false);
        for i in 1..(w - 1) {
            term.set(x + i, y, BOX_H, bc, false);
        }
        term.set(x + w - 1, y, BOX_TR, bc, false);

        let title_w = self.title.chars().count() as i32;
        if title_w > 0 && title_w + 6 <= w {
            let tx = x + (w - title_w - 4) / 2;
            term.set(tx, y, BOX_TITLE_L, bc, false);
            term.set(tx + 1, y, ' ', None, false);
            term.set_str(tx + 2, y, self.title, Some(self.title_color), true);
            term.set(tx + 2 + title_w, y, ' ', None, false);
            term.set(tx + 3 + title_w, y, BOX_TITLE_R, bc, false);
        }

        for i in 1..(h - 1) {
            term.set(x, y + i, BOX_V, bc, false);
            term.set(x + w - 1, y + i, BOX_V, bc, false);
        }

        term.set(x, y + h - 1, BOX_BL, bc, false);
        for i in 1..(w - 1) {
            term.set(x + i, y + h - 1, BOX_H, bc, false);
        }
        term.set(x + w - 1, y + h - 1, BOX_BR, bc, false);
    }
}

/// Draw a smooth meter using partial block characters. `fraction` in [0,1].
pub fn draw_meter(term: &mut Terminal, x: i32, y: i32, width: usize, fraction: f64, color: Color, empty: Color) {
    if width == 0 {
        return;
    }

    let fill = fraction.clamp(0.0, 1.0) * width as f64;
    let full_blocks = fill as usize;
    let partial = ((fill - full_blocks as f64) * 8.0) as usize;

    for i in 0..width {
        let (ch, c) = if i < full_blocks {
            ('█', color)
        } else if i == full_blocks && partial > 0 {
            (BLOCKS[partial], color)
        } else {
            ('░', empty)
        };
        term.set(x + i as i32, y, ch, Some(c), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_splits_side_by_side() {
        let l = split_viewport(120, 40);
        assert!(l.landscape);
        assert_eq!(l.player.y, l.target.y);
        assert_eq!(l.player.width + l.target.width, 120);
        assert_eq!(l.status.y, 39);
        assert_eq!(l.controls.y + l.controls.height, 39);
    }

    #[test]
    fn portrait_stacks() {
        let l = split_viewport(60, 50);
        assert!(!l.landscape);
        assert_eq!(l.player.x, l.target.x);
        assert_eq!(l.player.height + l.target.height, l.controls.y);
        assert_eq!(l.target.y, l.player.height);
    }

    #[test]
    fn tiny_viewport_does_not_underflow() {
        let l = split_viewport(3, 2);
        assert_eq!(l.status.y, 1);
        assert_eq!(l.controls.height, 1);
        assert!(l.player.height == 0 && l.target.height == 0);
    }

    #[test]
    fn panel_draws_corners() {
        let mut term = Terminal::with_size(10, 3);
        Panel::new(Rect::new(0, 0, 10, 3), "").draw(&mut term);
        assert_eq!(term.row_text(0), "╭────────╮");
        assert_eq!(term.row_text(1), "│        │");
        assert_eq!(term.row_text(2), "╰────────╯");
    }

    #[test]
    fn meter_fill() {
        let mut term = Terminal::with_size(4, 1);
        draw_meter(&mut term, 0, 0, 4, 0.5, Color::Green, Color::DarkGrey);
        assert_eq!(term.row_text(0), "██░░");
    }
}
