//! Slideshow presenter with a few live input demos

use crate::colors::{Palette, Theme};
use crate::config::SlidesConfig;
use crate::game;
use crate::help::render_help_overlay;
use crate::layout::{draw_meter, Panel, Rect};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use std::fs;
use std::collections::HashSet;
use std::io;
use std::path::Path;

const HELP: &str = "\
SLIDES
─────────────────────────
→ / Space   Next slide
← / Bksp    Previous slide
Enter       Toggle theme
Tab         Toggle sidebar
?           Close help
q/Esc       Quit";

const BUILTIN_DECK: &str = include_str!("../decks/default.md");

const SIDEBAR_WIDTH: u16 = 26;
const WASD_START: [u8; 3] = [40, 20, 80];
const WASD_STEP: u8 = 10;

/// Interactive element attached to a slide
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Demo {
    /// Three boxes driven by w/a/s/d
    Wasd,
    /// Phone frame toggled between landscape and portrait
    Rotate,
    /// A 0-100 slider moved with +/-
    Range,
    /// Launches the match game
    Game,
}

impl Demo {
    fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_lowercase().as_str() {
            "wasd" => Some(Demo::Wasd),
            "rotate" => Some(Demo::Rotate),
            "range" | "slider" => Some(Demo::Range),
            "game" => Some(Demo::Game),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    pub title: String,
    pub body: Vec<String>,
    pub demo: Option<Demo>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Parse deck text: slides separated by `---` lines, `# ` sets the title,
    /// `@demo <kind>` attaches a demo. Unknown demo kinds are dropped.
    pub fn parse(text: &str) -> Self {
        let mut slides = Vec::new();
        let mut chunk: Vec<&str> = Vec::new();

        for line in text.lines().chain(std::iter::once("---")) {
            if line.trim() == "---" {
                if let Some(slide) = Self::parse_slide(&chunk) {
                    slides.push(slide);
                }
                chunk.clear();
            } else {
                chunk.push(line);
            }
        }

        Self { slides }
    }

    fn parse_slide(lines: &[&str]) -> Option<Slide> {
        let mut title = None;
        let mut body = Vec::new();
        let mut demo = None;

        for line in lines {
            if let Some(rest) = line.strip_prefix("# ") {
                if title.is_none() {
                    title = Some(rest.trim().to_string());
                    continue;
                }
            }
            if let Some(kind) = line.strip_prefix("@demo") {
                demo = Demo::parse(kind);
                continue;
            }
            body.push(line.to_string());
        }

        // Trim blank lines around the body
        while body.first().is_some_and(|l| l.trim().is_empty()) {
            body.remove(0);
        }
        while body.last().is_some_and(|l| l.trim().is_empty()) {
            body.pop();
        }

        if title.is_none() && body.is_empty() && demo.is_none() {
            return None;
        }

        Some(Slide {
            title: title.unwrap_or_default(),
            body,
            demo,
        })
    }

    pub fn builtin() -> Self {
        Self::parse(BUILTIN_DECK)
    }

    /// Load a deck file, falling back to the built-in deck when it is unreadable or has no slides
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Could not read {}: {}, using the built-in deck", path.display(), e);
                return Ok(Self::builtin());
            }
        };
        let deck = Self::parse(&text);
        if deck.slides.is_empty() {
            eprintln!("No slides in {}, using the built-in deck", path.display());
            return Ok(Self::builtin());
        }
        Ok(deck)
    }
}

/// State of the w/a/s/d demo
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WasdDemo {
    pub active: usize,
    pub values: [u8; 3],
}

impl Default for WasdDemo {
    fn default() -> Self {
        Self { active: 0, values: WASD_START }
    }
}

impl WasdDemo {
    pub fn handle(&mut self, key: char) -> bool {
        let n = self.values.len();
        match key {
            'w' => self.active = (self.active + n - 1) % n,
            's' => self.active = (self.active + 1) % n,
            'a' => self.values[self.active] = self.values[self.active].saturating_sub(WASD_STEP),
            'd' => self.values[self.active] = (self.values[self.active] + WASD_STEP).min(100),
            _ => return false,
        }
        true
    }

    /// Readout shown next to each box, 0-10
    pub fn readout(&self, i: usize) -> u8 {
        (self.values[i] as f32 / 10.0).round() as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideEvent {
    Next,
    Prev,
    ToggleTheme,
    ToggleSidebar,
    ToggleHelp,
    /// Key forwarded to the demo on the current slide
    DemoKey(char),
    Quit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideOutcome {
    pub quit: bool,
    pub launch_game: bool,
}

pub struct Presenter {
    pub deck: Deck,
    pub current: usize,
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub help: bool,
    pub wasd: WasdDemo,
    /// Slides whose rotate demo is in portrait
    pub portrait: HashSet<usize>,
    pub range: u8,
    /// Last key the demo reacted to, highlighted on the key caps
    pub pressed: Option<char>,
}

impl Presenter {
    pub fn new(deck: Deck, theme: Theme) -> Self {
        Self {
            deck,
            current: 0,
            theme,
            sidebar_collapsed: false,
            help: false,
            wasd: WasdDemo::default(),
            portrait: HashSet::new(),
            range: 50,
            pressed: None,
        }
    }

    pub fn slide(&self) -> Option<&Slide> {
        self.deck.slides.get(self.current)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_portrait(&self) -> bool {
        self.portrait.contains(&self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.deck.slides.len()
    }

    pub fn apply(&mut self, event: SlideEvent) -> SlideOutcome {
        match event {
            SlideEvent::Next => {
                if !self.is_last() {
                    self.current += 1;
                    self.pressed = None;
                }
            }
            SlideEvent::Prev => {
                if !self.is_first() {
                    self.current -= 1;
                    self.pressed = None;
                }
            }
            SlideEvent::ToggleTheme => self.theme = self.theme.toggled(),
            SlideEvent::ToggleSidebar => self.sidebar_collapsed = !self.sidebar_collapsed,
            SlideEvent::ToggleHelp => self.help = !self.help,
            SlideEvent::DemoKey(key) => return self.demo_key(key),
            SlideEvent::Quit => return SlideOutcome { quit: true, ..SlideOutcome::default() },
        }
        SlideOutcome::default()
    }

    fn demo_key(&mut self, key: char) -> SlideOutcome {
        let key = key.to_ascii_lowercase();
        let handled = match self.slide().and_then(|s| s.demo) {
            Some(Demo::Wasd) => self.wasd.handle(key),
            Some(Demo::Rotate) if key == 'r' => {
                if !self.portrait.remove(&self.current) {
                    self.portrait.insert(self.current);
                }
                true
            }
            Some(Demo::Range) if key == '+' || key == '=' => {
                self.range = (self.range + 1).min(100);
                true
            }
            Some(Demo::Range) if key == '-' => {
                self.range = self.range.saturating_sub(1);
                true
            }
            Some(Demo::Game) if key == 'g' => {
                return SlideOutcome { launch_game: true, ..SlideOutcome::default() };
            }
            _ => false,
        };
        if handled {
            self.pressed = Some(key);
        }
        SlideOutcome::default()
    }

    /// Compose the current slide into the back buffer
    pub fn draw(&self, term: &mut Terminal) {
        let palette = self.theme.palette();
        let (width, height) = term.size();
        term.clear();
        if width < 4 || height < 4 {
            return;
        }

        let total = self.deck.slides.len();
        let header = format!(" {} / {} ", self.current + 1, total);
        term.set_str(1, 0, &header, Some(palette.muted), false);
        let icon = self.theme.icon().to_string();
        term.set_str(width as i32 - 3, 0, &icon, Some(palette.muted), false);

        let sidebar_w = if self.sidebar_collapsed { 0 } else { SIDEBAR_WIDTH.min(width / 3) };
        if sidebar_w > 0 {
            self.draw_sidebar(term, Rect::new(0, 1, sidebar_w, height - 2), &palette);
        }

        let main = Rect::new(sidebar_w, 1, width - sidebar_w, height - 2);
        if let Some(slide) = self.slide() {
            self.draw_slide(term, main, slide, &palette);
        }

        // Navigation hints are hidden at the ends
        let footer_y = height as i32 - 1;
        if !self.is_first() {
            term.set_str(1, footer_y, "◀ prev", Some(palette.muted), false);
        }
        if !self.is_last() {
            term.set_str(width as i32 - 8, footer_y, "next ▶", Some(palette.muted), false);
        }

        if self.help {
            render_help_overlay(term, HELP, &palette);
        }
    }

    fn draw_sidebar(&self, term: &mut Terminal, area: Rect, palette: &Palette) {
        Panel::new(area, "SLIDES").colors(palette.text, palette.border).draw(term);
        let inner = area.inner();
        for (i, slide) in self.deck.slides.iter().enumerate().take(inner.height as usize) {
            let current = i == self.current;
            let marker = if current { '▶' } else { ' ' };
            let label: String = format!("{} {}", marker, slide.title)
                .chars()
                .take(inner.width as usize)
                .collect();
            let color = if current { palette.highlight } else { palette.muted };
            term.set_str(inner.x as i32, inner.y as i32 + i as i32, &label, Some(color), current);
        }
    }

    fn draw_slide(&self, term: &mut Terminal, area: Rect, slide: &Slide, palette: &Palette) {
        Panel::new(area, &slide.title).colors(palette.accent, palette.border).draw(term);
        let inner = area.inner();
        let text_width = inner.width.saturating_sub(2) as usize;

        let mut y = inner.y as i32 + 1;
        for line in &slide.body {
            for wrapped in wrap(line, text_width) {
                if y >= (inner.y + inner.height) as i32 {
                    return;
                }
                term.set_str(inner.x as i32 + 1, y, &wrapped, Some(palette.text), false);
                y += 1;
            }
        }

        let demo_area = Rect::new(
            inner.x + 1,
            (y + 1).max(0) as u16,
            inner.width.saturating_sub(2),
            (inner.y + inner.height).saturating_sub((y + 1).max(0) as u16),
        );
        match slide.demo {
            Some(Demo::Wasd) => self.draw_wasd(term, demo_area, palette),
            Some(Demo::Rotate) => self.draw_rotate(term, demo_area, palette),
            Some(Demo::Range) => self.draw_range(term, demo_area, palette),
            Some(Demo::Game) => {
                term.set_str(demo_area.x as i32, demo_area.y as i32, "[ g ] play", Some(palette.highlight), true);
            }
            None => {}
        }
    }

    fn draw_wasd(&self, term: &mut Terminal, area: Rect, palette: &Palette) {
        // Key caps, lit while their key was the last one used
        let caps = [('w', 4, 0), ('a', 0, 1), ('s', 4, 1), ('d', 8, 1)];
        for (key, dx, dy) in caps {
            let color = if self.pressed == Some(key) { palette.highlight } else { palette.muted };
            let cap = format!("[{}]", key.to_ascii_uppercase());
            term.set_str(area.x as i32 + dx, area.y as i32 + dy, &cap, Some(color), self.pressed == Some(key));
        }

        let meter_w = (area.width as usize).saturating_sub(12).min(40);
        for i in 0..self.wasd.values.len() {
            let y = area.y as i32 + 3 + i as i32;
            if y >= (area.y + area.height) as i32 {
                return;
            }
            let active = i == self.wasd.active;
            let color = if active { palette.highlight } else { palette.text };
            term.set(area.x as i32, y, if active { '▶' } else { ' ' }, Some(color), true);
            draw_meter(term, area.x as i32 + 2, y, meter_w, self.wasd.values[i] as f64 / 100.0, color, palette.muted);
            let readout = self.wasd.readout(i).to_string();
            term.set_str(area.x as i32 + 3 + meter_w as i32, y, &readout, Some(color), active);
        }
    }

    fn draw_rotate(&self, term: &mut Terminal, area: Rect, palette: &Palette) {
        let portrait = self.is_portrait();
        let (w, h) = if portrait { (8, 6) } else { (16, 4) };
        if area.height >= h && area.width >= w {
            Panel::new(Rect::new(area.x, area.y, w, h), "").colors(palette.text, palette.accent).draw(term);
        }

        let code_x = area.x as i32 + 20;
        let lines = [
            ("if landscape { split_side_by_side() }", !portrait),
            ("else { stack_vertically() }", portrait),
        ];
        for (i, (code, lit)) in lines.iter().enumerate() {
            let color = if *lit { palette.highlight } else { palette.muted };
            term.set_str(code_x, area.y as i32 + 1 + i as i32, code, Some(color), *lit);
        }
    }

    fn draw_range(&self, term: &mut Terminal, area: Rect, palette: &Palette) {
        let meter_w = (area.width as usize).saturating_sub(8).min(50);
        draw_meter(term, area.x as i32, area.y as i32, meter_w, self.range as f64 / 100.0, palette.accent, palette.muted);
        let readout = self.range.to_string();
        term.set_str(area.x as i32 + meter_w as i32 + 2, area.y as i32, &readout, Some(palette.text), true);
    }
}

/// Greedy word wrap; words longer than `width` are split
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Map a key to a presenter event
pub fn event_for_key(code: KeyCode) -> Option<SlideEvent> {
    let event = match code {
        KeyCode::Right | KeyCode::Char(' ') => SlideEvent::Next,
        KeyCode::Left | KeyCode::Backspace => SlideEvent::Prev,
        KeyCode::Enter => SlideEvent::ToggleTheme,
        KeyCode::Tab => SlideEvent::ToggleSidebar,
        KeyCode::Esc | KeyCode::Char('q') => SlideEvent::Quit,
        KeyCode::Char('?') => SlideEvent::ToggleHelp,
        KeyCode::Char(c) => SlideEvent::DemoKey(c),
        _ => return None,
    };
    Some(event)
}

/// Run the presenter
pub fn run(config: SlidesConfig) -> io::Result<()> {
    let deck = match &config.deck {
        Some(path) => Deck::load(path)?,
        None => Deck::builtin(),
    };

    let mut term = Terminal::new()?;
    term.clear_screen()?;
    let mut presenter = Presenter::new(deck, config.theme);

    loop {
        term.sync_size()?;

        if let Some((code, _)) = term.wait_key(100)? {
            let event = if presenter.help {
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => Some(SlideEvent::Quit),
                    _ => Some(SlideEvent::ToggleHelp),
                }
            } else {
                event_for_key(code)
            };

            if let Some(event) = event {
                let outcome = presenter.apply(event);
                if outcome.quit {
                    break;
                }
                if outcome.launch_game {
                    let mut game_config = config.game.clone();
                    game_config.theme = presenter.theme;
                    game::play(&mut term, &game_config)?;
                    term.clear_screen()?;
                }
            }
        }

        presenter.draw(&mut term);
        term.present()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = "\
# One
first line

---
# Two
@demo wasd
body
---
# Three
@demo hologram
---
";

    fn presenter() -> Presenter {
        Presenter::new(Deck::parse(DECK), Theme::Dark)
    }

    #[test]
    fn parses_titles_bodies_and_demos() {
        let deck = Deck::parse(DECK);
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.slides[0].title, "One");
        assert_eq!(deck.slides[0].body, vec!["first line"]);
        assert_eq!(deck.slides[1].demo, Some(Demo::Wasd));
        assert_eq!(deck.slides[1].body, vec!["body"]);
        // Unknown demo kinds are dropped, the slide stays
        assert_eq!(deck.slides[2].demo, None);
    }

    #[test]
    fn builtin_deck_has_every_demo() {
        let deck = Deck::builtin();
        assert!(deck.slides.len() > 4);
        for demo in [Demo::Wasd, Demo::Rotate, Demo::Range, Demo::Game] {
            assert!(deck.slides.iter().any(|s| s.demo == Some(demo)), "{demo:?}");
        }
    }

    #[test]
    fn navigation_clamps_at_ends() {
        let mut p = presenter();
        p.apply(SlideEvent::Prev);
        assert_eq!(p.current, 0);
        for _ in 0..10 {
            p.apply(SlideEvent::Next);
        }
        assert_eq!(p.current, 2);
        assert!(p.is_last());
    }

    #[test]
    fn wasd_demo_cycles_and_clamps() {
        let mut p = presenter();
        p.apply(SlideEvent::Next);
        p.apply(SlideEvent::DemoKey('w'));
        assert_eq!(p.wasd.active, 2);
        for _ in 0..5 {
            p.apply(SlideEvent::DemoKey('d'));
        }
        assert_eq!(p.wasd.values, [40, 20, 100]);
        p.apply(SlideEvent::DemoKey('s'));
        p.apply(SlideEvent::DemoKey('s'));
        for _ in 0..5 {
            p.apply(SlideEvent::DemoKey('a'));
        }
        assert_eq!(p.wasd.values, [40, 0, 100]);
        assert_eq!(p.wasd.readout(0), 4);
        assert_eq!(p.pressed, Some('a'));
    }

    #[test]
    fn demo_keys_ignored_on_plain_slides() {
        let mut p = presenter();
        p.apply(SlideEvent::DemoKey('d'));
        assert_eq!(p.wasd, WasdDemo::default());
        assert_eq!(p.pressed, None);
    }

    #[test]
    fn game_slide_launches_game() {
        let deck = Deck::parse("# Play\n@demo game");
        let mut p = Presenter::new(deck, Theme::Dark);
        assert!(p.apply(SlideEvent::DemoKey('g')).launch_game);
        assert!(!p.apply(SlideEvent::DemoKey('x')).launch_game);
    }

    #[test]
    fn rotate_and_range_demos() {
        let deck = Deck::parse("# R\n@demo rotate\n---\n# S\n@demo range");
        let mut p = Presenter::new(deck, Theme::Dark);
        p.apply(SlideEvent::DemoKey('r'));
        assert!(p.is_portrait());
        p.apply(SlideEvent::Next);
        p.apply(SlideEvent::DemoKey('+'));
        p.apply(SlideEvent::DemoKey('+'));
        p.apply(SlideEvent::DemoKey('-'));
        assert_eq!(p.range, 51);
    }

    #[test]
    fn toggles() {
        let mut p = presenter();
        p.apply(SlideEvent::ToggleTheme);
        p.apply(SlideEvent::ToggleSidebar);
        p.apply(SlideEvent::ToggleHelp);
        assert_eq!(p.theme, Theme::Light);
        assert!(p.sidebar_collapsed && p.help);
        assert!(p.apply(SlideEvent::Quit).quit);
    }

    #[test]
    fn nav_hints_hidden_at_ends() {
        let mut p = presenter();
        let mut term = Terminal::with_size(80, 24);
        p.draw(&mut term);
        let footer = term.row_text(23);
        assert!(!footer.contains("prev"));
        assert!(footer.contains("next"));
        assert!(term.row_text(0).contains("1 / 3"));

        p.apply(SlideEvent::Next);
        p.apply(SlideEvent::Next);
        p.draw(&mut term);
        let footer = term.row_text(23);
        assert!(footer.contains("prev"));
        assert!(!footer.contains("next"));
    }

    #[test]
    fn sidebar_collapse_hides_titles() {
        let mut p = presenter();
        let mut term = Terminal::with_size(90, 24);
        p.draw(&mut term);
        let screen: String = (0..24).map(|y| term.row_text(y)).collect();
        assert!(screen.contains("SLIDES"));

        p.apply(SlideEvent::ToggleSidebar);
        p.draw(&mut term);
        let screen: String = (0..24).map(|y| term.row_text(y)).collect();
        assert!(!screen.contains("SLIDES"));
    }

    #[test]
    fn unreadable_deck_falls_back_to_builtin() {
        let deck = Deck::load(Path::new("/nonexistent/talk.md")).unwrap();
        assert_eq!(deck, Deck::builtin());
    }

    #[test]
    fn rotate_slides_keep_their_own_orientation() {
        let deck = Deck::parse("# A\n@demo rotate\n---\n# B\n@demo rotate");
        let mut p = Presenter::new(deck, Theme::Dark);
        p.apply(SlideEvent::DemoKey('r'));
        assert!(p.is_portrait());

        p.apply(SlideEvent::Next);
        assert!(!p.is_portrait());
        p.apply(SlideEvent::DemoKey('r'));
        p.apply(SlideEvent::DemoKey('r'));
        assert!(!p.is_portrait());

        p.apply(SlideEvent::Prev);
        assert!(p.is_portrait());
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn key_mapping() {
        assert_eq!(event_for_key(KeyCode::Char(' ')), Some(SlideEvent::Next));
        assert_eq!(event_for_key(KeyCode::Backspace), Some(SlideEvent::Prev));
        assert_eq!(event_for_key(KeyCode::Tab), Some(SlideEvent::ToggleSidebar));
        assert_eq!(event_for_key(KeyCode::Char('w')), Some(SlideEvent::DemoKey('w')));
    }
}
