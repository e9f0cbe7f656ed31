//! Match-the-fractal game: session state, input handling and the screen loop

use crate::canvas::BrailleCanvas;
use crate::colors::{Palette, Theme};
use crate::config::{resolve_seed, GameConfig};
use crate::fractal::render::strokes_per_side;
use crate::fractal::{
    check_match, generate, mismatched_keys, render, FractalParams, MatchResult, ParamKey, Randomizer, Target,
    MAX_DIFFICULTY,
};
use crate::help::render_help_overlay;
use crate::layout::{draw_meter, split_viewport, GameLayout, Panel, Rect};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::time::{Duration, Instant};

const HELP: &str = "\
MATCH THE FRACTAL
─────────────────────────
w/s      Select control
a/d      Decrease/increase
r        New target
q        Reset everything
0-4      Difficulty
h        Show target values
Enter    Toggle theme
?        Close help
Esc      Quit";

const HINTS: &str = "w/s select  a/d adjust  r new target  q reset  0-4 difficulty  ? help  Esc quit";

/// How long the success flash stays up
pub const FLASH_DURATION: Duration = Duration::from_millis(1500);

/// Key poll timeout per frame
const POLL_MS: u64 = 50;

const LABEL_WIDTH: usize = 16;
const READOUT_WIDTH: usize = 6;

/// Everything the game reacts to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    SetParam { key: ParamKey, value: f64 },
    /// Step the focused control by one slider step in the given direction
    StepFocused(i32),
    /// Move focus to the previous/next control (wraps)
    CycleFocus(i32),
    Randomize,
    Reset,
    SetDifficulty(u8),
    ToggleDebug,
    ToggleTheme,
    ToggleHelp,
    Tick,
    Quit,
}

/// What the host has to do after an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub redraw_player: bool,
    pub redraw_target: bool,
    pub matched: bool,
    pub quit: bool,
}

impl Outcome {
    pub fn merge(self, other: Outcome) -> Outcome {
        Outcome {
            redraw_player: self.redraw_player || other.redraw_player,
            redraw_target: self.redraw_target || other.redraw_target,
            matched: self.matched || other.matched,
            quit: self.quit || other.quit,
        }
    }
}

/// Transient success indication; cleared once, never cancelled
#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    pub message: String,
    pub until: Instant,
}

pub struct GameState {
    pub player: FractalParams,
    pub target: Option<Target>,
    /// A match session runs from "new target" until the target is matched
    pub active: bool,
    pub difficulty: u8,
    pub focus: usize,
    pub debug: bool,
    pub help: bool,
    pub theme: Theme,
    pub flash: Option<Flash>,
    pub status: String,
    /// Parameter changes made in the current session
    pub moves: u32,
}

impl GameState {
    pub fn new(difficulty: u8, theme: Theme) -> Self {
        Self {
            player: FractalParams::default(),
            target: None,
            active: false,
            difficulty: difficulty.min(MAX_DIFFICULTY),
            focus: 0,
            debug: false,
            help: false,
            theme,
            flash: None,
            status: String::from("Press r for a new target"),
            moves: 0,
        }
    }

    pub fn focused_key(&self) -> ParamKey {
        ParamKey::ALL[self.focus]
    }

    /// Single transition function for every input
    pub fn apply(&mut self, event: InputEvent, rng: &mut impl Randomizer, now: Instant) -> Outcome {
        match event {
            InputEvent::SetParam { key, value } => {
                self.player.set(key, value);
                self.after_mutation(now)
            }
            InputEvent::StepFocused(direction) => {
                self.player.step(self.focused_key(), direction);
                self.after_mutation(now)
            }
            InputEvent::CycleFocus(direction) => {
                let n = ParamKey::ALL.len() as i32;
                self.focus = (self.focus as i32 + direction).rem_euclid(n) as usize;
                Outcome::default()
            }
            InputEvent::Randomize => {
                if self.active {
                    self.status = String::from("Match the current target first (q gives up)");
                    return Outcome::default();
                }
                self.target = Some(generate(self.difficulty, rng));
                self.active = true;
                self.moves = 0;
                self.status = format!("New target at difficulty {}", self.difficulty);
                Outcome { redraw_target: true, ..Outcome::default() }
            }
            InputEvent::Reset => {
                self.player = FractalParams::default();
                self.target = None;
                self.active = false;
                self.moves = 0;
                self.status = String::from("Reset. Press r for a new target");
                Outcome { redraw_player: true, redraw_target: true, ..Outcome::default() }
            }
            InputEvent::SetDifficulty(level) => {
                if level <= MAX_DIFFICULTY {
                    self.difficulty = level;
                    self.status = format!("Difficulty {}", level);
                }
                Outcome::default()
            }
            InputEvent::ToggleDebug => {
                self.debug = !self.debug;
                Outcome::default()
            }
            InputEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                Outcome::default()
            }
            InputEvent::ToggleHelp => {
                self.help = !self.help;
                Outcome::default()
            }
            InputEvent::Tick => {
                if self.flash.as_ref().is_some_and(|f| now >= f.until) {
                    self.flash = None;
                }
                Outcome::default()
            }
            InputEvent::Quit => Outcome { quit: true, ..Outcome::default() },
        }
    }

    /// Re-render the player side and check the match
    fn after_mutation(&mut self, now: Instant) -> Outcome {
        let mut outcome = Outcome { redraw_player: true, ..Outcome::default() };
        if self.active {
            self.moves += 1;
        }

        let target = self.target.as_ref().map(|t| &t.params);
        if check_match(&self.player, target, self.active) == MatchResult::Matched {
            self.active = false;
            let message = format!("Matched in {} moves! Press r for another", self.moves);
            self.status = message.clone();
            self.flash = Some(Flash { message, until: now + FLASH_DURATION });
            outcome.matched = true;
        }
        outcome
    }
}

/// Map a key to a game event
pub fn event_for_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Esc => InputEvent::Quit,
        KeyCode::Enter => InputEvent::ToggleTheme,
        KeyCode::Up => InputEvent::CycleFocus(-1),
        KeyCode::Down => InputEvent::CycleFocus(1),
        KeyCode::Left => InputEvent::StepFocused(-1),
        KeyCode::Right => InputEvent::StepFocused(1),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => InputEvent::CycleFocus(-1),
            's' => InputEvent::CycleFocus(1),
            'a' => InputEvent::StepFocused(-1),
            'd' => InputEvent::StepFocused(1),
            'q' => InputEvent::Reset,
            'r' => InputEvent::Randomize,
            'h' => InputEvent::ToggleDebug,
            '?' => InputEvent::ToggleHelp,
            d @ '0'..='4' => InputEvent::SetDifficulty(d as u8 - b'0'),
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}

/// The two drawing surfaces plus the layout they were sized for
pub struct GameView {
    layout: GameLayout,
    player: BrailleCanvas,
    target: BrailleCanvas,
}

impl GameView {
    pub fn new(width: u16, height: u16) -> Self {
        let layout = split_viewport(width, height);
        let p = layout.player.inner();
        let t = layout.target.inner();
        Self {
            layout,
            player: BrailleCanvas::new(p.width, p.height),
            target: BrailleCanvas::new(t.width, t.height),
        }
    }

    pub fn render_player(&mut self, state: &GameState) {
        render(&mut self.player, &state.player);
    }

    pub fn render_target(&mut self, state: &GameState) {
        match &state.target {
            Some(target) => render(&mut self.target, &target.params),
            None => crate::fractal::Surface::clear(&mut self.target),
        }
    }

    pub fn render_all(&mut self, state: &GameState) {
        self.render_player(state);
        self.render_target(state);
    }

    /// Compose the full screen into the back buffer
    pub fn draw(&self, term: &mut Terminal, state: &GameState) {
        let palette = state.theme.palette();
        let flashing = state.flash.is_some();
        let l = &self.layout;

        term.clear();

        let frame_color = if flashing { palette.success } else { palette.border };
        Panel::new(l.player, "YOU")
            .colors(palette.text, frame_color)
            .draw(term);
        let target_title = match (&state.target, state.active) {
            (None, _) => "TARGET",
            (Some(_), true) => "TARGET (matching)",
            (Some(_), false) => "TARGET (solved)",
        };
        Panel::new(l.target, target_title)
            .colors(palette.text, frame_color)
            .draw(term);

        self.player.blit(term, l.player.inner());
        self.target.blit(term, l.target.inner());

        if state.target.is_none() {
            let inner = l.target.inner();
            let msg = "press r";
            let x = inner.x as i32 + (inner.width as i32 - msg.len() as i32) / 2;
            term.set_str(x, (inner.y + inner.height / 2) as i32, msg, Some(palette.muted), false);
        }

        if state.debug {
            draw_debug(term, l.target.inner(), state, &palette);
        }

        draw_controls(term, l.controls, state, &palette);
        draw_status(term, l.status, state, &palette);

        if state.help {
            render_help_overlay(term, HELP, &palette);
        }
    }
}

fn draw_controls(term: &mut Terminal, area: Rect, state: &GameState, palette: &Palette) {
    if area.height < 3 {
        return;
    }
    Panel::new(area, "CONTROLS")
        .colors(palette.text, palette.border)
        .draw(term);

    let inner = area.inner();
    let meter_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + READOUT_WIDTH + 4);

    for (row, key) in ParamKey::ALL.iter().enumerate() {
        if row >= inner.height as usize {
            return;
        }
        let y = inner.y as i32 + row as i32;
        let x = inner.x as i32;
        let focused = row == state.focus;
        let color = if focused { palette.highlight } else { palette.text };

        term.set(x, y, if focused { '▶' } else { ' ' }, Some(palette.highlight), true);
        term.set_str(x + 2, y, key.label(), Some(color), focused);

        let range = key.range();
        let value = state.player.get(*key);
        let fraction = (value - range.min) / (range.max - range.min);
        draw_meter(term, x + 2 + LABEL_WIDTH as i32, y, meter_width, fraction, color, palette.muted);

        let readout = format!("{:>width$}", key.format(value), width = READOUT_WIDTH);
        term.set_str(x + 3 + (LABEL_WIDTH + meter_width) as i32, y, &readout, Some(color), false);
    }

    let row = ParamKey::ALL.len();
    if row < inner.height as usize {
        let y = inner.y as i32 + row as i32;
        let session = if state.active { "session active" } else { "r starts a session" };
        let line = format!("  difficulty {} [0-{}]   {}", state.difficulty, MAX_DIFFICULTY, session);
        term.set_str(inner.x as i32, y, &line, Some(palette.accent), false);
    }
}

fn draw_status(term: &mut Terminal, area: Rect, state: &GameState, palette: &Palette) {
    if area.is_empty() {
        return;
    }
    let (text, color, bold) = match &state.flash {
        Some(flash) => (flash.message.as_str(), palette.success, true),
        None => (state.status.as_str(), palette.accent, false),
    };
    let x = area.x as i32 + 1;
    term.set_str(x, area.y as i32, text, Some(color), bold);

    // Key hints fill whatever room the message leaves
    let hints_x = x + text.chars().count() as i32 + 3;
    let room = (area.x as i32 + area.width as i32 - 3 - hints_x).max(0) as usize;
    if room > 10 {
        let hints: String = HINTS.chars().take(room).collect();
        term.set_str(hints_x, area.y as i32, &hints, Some(palette.muted), false);
    }

    let icon = state.theme.icon().to_string();
    term.set_str(area.x as i32 + area.width as i32 - 2, area.y as i32, &icon, Some(palette.muted), false);
}

/// Raw target values, written over the target canvas
fn draw_debug(term: &mut Terminal, area: Rect, state: &GameState, palette: &Palette) {
    let Some(target) = &state.target else {
        return;
    };
    let p = &target.params;
    let mut lines: Vec<String> = ParamKey::ALL
        .iter()
        .map(|key| format!("{} = {}", key.label(), p.get(*key)))
        .collect();
    let c = target.color;
    lines.push(format!("color = rgb({}, {}, {})", c.r, c.g, c.b));
    lines.push(format!(
        "strokes = {}",
        p.sides as u64 * strokes_per_side(p.levels, p.branching, p.n_level_branches)
    ));
    let off: Vec<&str> = mismatched_keys(&state.player, p).iter().map(|k| k.label()).collect();
    lines.push(format!("differs: {}", if off.is_empty() { "-".to_string() } else { off.join(", ") }));

    for (i, line) in lines.iter().enumerate().take(area.height as usize) {
        term.set_str(area.x as i32, area.y as i32 + i as i32, line, Some(palette.muted), false);
    }
}

/// Run the game on a fresh terminal
pub fn run(config: GameConfig) -> io::Result<()> {
    let mut term = Terminal::new()?;
    term.clear_screen()?;
    play(&mut term, &config)
}

/// Run the game on an already prepared terminal until the player quits
pub fn play(term: &mut Terminal, config: &GameConfig) -> io::Result<()> {
    let mut rng = StdRng::seed_from_u64(resolve_seed(config.seed));
    let mut state = GameState::new(config.difficulty, config.theme);
    let (w, h) = term.size();
    let mut view = GameView::new(w, h);
    view.render_all(&state);

    loop {
        if term.sync_size()? {
            let (w, h) = term.size();
            view = GameView::new(w, h);
            view.render_all(&state);
        }

        let mut outcome = state.apply(InputEvent::Tick, &mut rng, Instant::now());
        if let Some((code, _)) = term.wait_key(POLL_MS)? {
            let event = if state.help {
                // Any key closes help; Esc still quits
                match code {
                    KeyCode::Esc => Some(InputEvent::Quit),
                    _ => Some(InputEvent::ToggleHelp),
                }
            } else {
                event_for_key(code)
            };
            if let Some(event) = event {
                outcome = outcome.merge(state.apply(event, &mut rng, Instant::now()));
            }
        }

        if outcome.quit {
            break;
        }
        if outcome.redraw_player {
            view.render_player(&state);
        }
        if outcome.redraw_target {
            view.render_target(&state);
        }

        view.draw(term, &state);
        term.present()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Drive the player onto the current target with SetParam events
    fn copy_target(state: &mut GameState, rng: &mut StdRng, now: Instant) -> Outcome {
        let target = state.target.expect("target").params;
        let mut outcome = Outcome::default();
        for key in ParamKey::COMPARED {
            outcome = outcome.merge(state.apply(
                InputEvent::SetParam { key, value: target.get(key) },
                rng,
                now,
            ));
        }
        outcome
    }

    #[test]
    fn randomize_starts_a_session() {
        let mut state = GameState::new(2, Theme::Dark);
        let out = state.apply(InputEvent::Randomize, &mut rng(), Instant::now());
        assert!(out.redraw_target);
        assert!(state.active);
        assert_eq!(state.target.map(|t| t.difficulty), Some(2));
    }

    #[test]
    fn randomize_is_ignored_while_active() {
        let mut r = rng();
        let mut state = GameState::new(3, Theme::Dark);
        state.apply(InputEvent::Randomize, &mut r, Instant::now());
        let first = state.target;
        let out = state.apply(InputEvent::Randomize, &mut r, Instant::now());
        assert_eq!(out, Outcome::default());
        assert_eq!(state.target, first);
    }

    #[test]
    fn matching_ends_session_and_flashes() {
        let mut r = rng();
        let now = Instant::now();
        let mut state = GameState::new(4, Theme::Dark);
        state.apply(InputEvent::Randomize, &mut r, now);

        let out = copy_target(&mut state, &mut r, now);
        assert!(out.matched);
        assert!(!state.active);
        assert!(state.flash.is_some());

        state.apply(InputEvent::Tick, &mut r, now + Duration::from_millis(100));
        assert!(state.flash.is_some());
        state.apply(InputEvent::Tick, &mut r, now + FLASH_DURATION);
        assert!(state.flash.is_none());

        // Session over: a new target is allowed again
        state.apply(InputEvent::Randomize, &mut r, now);
        assert!(state.active);
    }

    #[test]
    fn no_match_without_session() {
        let mut r = rng();
        let mut state = GameState::new(0, Theme::Dark);
        let out = state.apply(InputEvent::StepFocused(1), &mut r, Instant::now());
        assert!(out.redraw_player);
        assert!(!out.matched);
        assert!(state.flash.is_none());
    }

    #[test]
    fn rotation_alone_never_matches() {
        let mut r = rng();
        let now = Instant::now();
        let mut state = GameState::new(3, Theme::Dark);
        state.apply(InputEvent::Randomize, &mut r, now);
        let target = state.target.expect("target").params;

        // Everything but hue, then wiggle rotation
        for key in ParamKey::COMPARED.iter().filter(|k| **k != ParamKey::Hue) {
            state.apply(InputEvent::SetParam { key: *key, value: target.get(*key) }, &mut r, now);
        }
        let off_hue = if target.hue == 0 { 10.0 } else { target.hue as f64 - 10.0 };
        state.apply(InputEvent::SetParam { key: ParamKey::Hue, value: off_hue }, &mut r, now);
        for deg in [0.0, 90.0, target.rotation] {
            let out = state.apply(InputEvent::SetParam { key: ParamKey::Rotation, value: deg }, &mut r, now);
            assert!(!out.matched);
        }
        assert!(state.active);
    }

    #[test]
    fn reset_restores_defaults_and_clears_target() {
        let mut r = rng();
        let now = Instant::now();
        let mut state = GameState::new(1, Theme::Dark);
        state.apply(InputEvent::Randomize, &mut r, now);
        for _ in 0..7 {
            state.apply(InputEvent::StepFocused(1), &mut r, now);
            state.apply(InputEvent::CycleFocus(1), &mut r, now);
        }
        state.apply(InputEvent::SetParam { key: ParamKey::Rotation, value: 200.0 }, &mut r, now);
        assert_ne!(state.player, FractalParams::default());

        let out = state.apply(InputEvent::Reset, &mut r, now);
        assert!(out.redraw_player && out.redraw_target);
        assert_eq!(state.player, FractalParams::default());
        assert!(state.target.is_none());
        assert!(!state.active);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut r = rng();
        let mut state = GameState::new(0, Theme::Dark);
        state.apply(InputEvent::CycleFocus(-1), &mut r, Instant::now());
        assert_eq!(state.focused_key(), ParamKey::Rotation);
        state.apply(InputEvent::CycleFocus(1), &mut r, Instant::now());
        assert_eq!(state.focused_key(), ParamKey::Spread);
    }

    #[test]
    fn difficulty_out_of_range_is_ignored() {
        let mut r = rng();
        let mut state = GameState::new(2, Theme::Dark);
        state.apply(InputEvent::SetDifficulty(4), &mut r, Instant::now());
        assert_eq!(state.difficulty, 4);
        state.apply(InputEvent::SetDifficulty(7), &mut r, Instant::now());
        assert_eq!(state.difficulty, 4);
    }

    #[test]
    fn key_mapping() {
        assert_eq!(event_for_key(KeyCode::Char('W')), Some(InputEvent::CycleFocus(-1)));
        assert_eq!(event_for_key(KeyCode::Char('d')), Some(InputEvent::StepFocused(1)));
        assert_eq!(event_for_key(KeyCode::Char('q')), Some(InputEvent::Reset));
        assert_eq!(event_for_key(KeyCode::Char('3')), Some(InputEvent::SetDifficulty(3)));
        assert_eq!(event_for_key(KeyCode::Char('5')), None);
        assert_eq!(event_for_key(KeyCode::Enter), Some(InputEvent::ToggleTheme));
        assert_eq!(event_for_key(KeyCode::Esc), Some(InputEvent::Quit));
    }

    #[test]
    fn screen_shows_controls_and_readouts() {
        let state = GameState::new(2, Theme::Dark);
        let mut view = GameView::new(100, 40);
        view.render_all(&state);
        let mut term = Terminal::with_size(100, 40);
        view.draw(&mut term, &state);

        let screen: Vec<String> = (0..40).map(|y| term.row_text(y)).collect();
        let text = screen.join("\n");
        assert!(text.contains("CONTROLS"));
        assert!(text.contains("spread"));
        assert!(text.contains("0.7"));
        assert!(text.contains("0.50"));
        assert!(text.contains("0°"));
        assert!(text.contains("difficulty 2"));
        assert!(text.contains("press r"));
    }

    #[test]
    fn debug_readout_lists_target() {
        let mut r = rng();
        let mut state = GameState::new(0, Theme::Dark);
        state.apply(InputEvent::Randomize, &mut r, Instant::now());
        state.apply(InputEvent::ToggleDebug, &mut r, Instant::now());
        let mut view = GameView::new(120, 50);
        view.render_all(&state);
        let mut term = Terminal::with_size(120, 50);
        view.draw(&mut term, &state);
        let text: String = (0..50).map(|y| term.row_text(y)).collect::<Vec<_>>().join("\n");
        assert!(text.contains("sides = "));
        assert!(text.contains("color = rgb("));
    }
}
