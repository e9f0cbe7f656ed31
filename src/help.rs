use crate::colors::Palette;
use crate::terminal::Terminal;

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str, palette: &Palette) {
    if help_text.is_empty() {
        return;
    }

    let (width, height) = term.size();
    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2; // 1 row padding top/bottom

    // Center the box
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    let border = Some(palette.border);
    let text = Some(palette.text);

    // Top border: ┌─────┐
    term.set(start_x as i32, start_y as i32, '┌', border, false);
    for x in 1..box_width - 1 {
        term.set((start_x + x) as i32, start_y as i32, '─', border, false);
    }
    term.set((start_x + box_width - 1) as i32, start_y as i32, '┐', border, false);

    // Content rows with side borders
    for (i, line) in lines.iter().enumerate() {
        let y = (start_y + 1 + i) as i32;
        term.set(start_x as i32, y, '│', border, false);

        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        term.set_str((start_x + 1) as i32, y, &padded, text, false);

        term.set((start_x + box_width - 1) as i32, y, '│', border, false);
    }

    // Bottom border: └─────┘
    let bottom_y = (start_y + box_height - 1) as i32;
    term.set(start_x as i32, bottom_y, '└', border, false);
    for x in 1..box_width - 1 {
        term.set((start_x + x) as i32, bottom_y, '─', border, false);
    }
    term.set((start_x + box_width - 1) as i32, bottom_y, '┘', border, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Theme;

    #[test]
    fn overlay_is_centered() {
        let mut term = Terminal::with_size(12, 5);
        render_help_overlay(&mut term, "ab\ncd", &Theme::Dark.palette());
        assert_eq!(term.row_text(0), "   ┌────┐   ");
        assert_eq!(term.row_text(1), "   │ ab │   ");
        assert_eq!(term.row_text(3), "   └────┘   ");
        assert_eq!(term.row_text(4), "            ");
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::with_size(4, 2);
        render_help_overlay(&mut term, "", &Theme::Light.palette());
        assert_eq!(term.row_text(0), "    ");
    }
}
