use crate::colors::Theme;
use crate::fractal::FractalParams;
use std::path::PathBuf;

/// Configuration for an interactive match game
#[derive(Clone)]
pub struct GameConfig {
    pub difficulty: u8,
    pub seed: Option<u64>,
    pub theme: Theme,
}

/// Configuration for the slideshow presenter
#[derive(Clone)]
pub struct SlidesConfig {
    pub deck: Option<PathBuf>,
    pub theme: Theme,
    /// Used when a game slide launches the match game
    pub game: GameConfig,
}

/// What `render` should draw
#[derive(Clone)]
pub enum RenderSource {
    Params(FractalParams),
    Generated { difficulty: u8, seed: Option<u64> },
}

/// Configuration for print-mode rendering
#[derive(Clone)]
pub struct RenderConfig {
    pub source: RenderSource,
    pub width: u16,
    pub height: u16,
}

/// Configuration for `generate`
#[derive(Clone)]
pub struct GenerateConfig {
    pub difficulty: u8,
    pub seed: Option<u64>,
    pub json: bool,
}

/// Seed from the clock when none was given
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    })
}
