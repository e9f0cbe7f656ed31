mod canvas;
mod colors;
mod config;
mod fractal;
mod game;
mod help;
mod layout;
mod print;
mod settings;
mod slides;
mod terminal;

use clap::{Args, Parser, Subcommand};
use colors::Theme;
use config::{GameConfig, GenerateConfig, RenderConfig, RenderSource, SlidesConfig};
use fractal::{FractalParams, ParamKey, MAX_DIFFICULTY};
use settings::Settings;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fracmatch")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Match-the-fractal terminal game and slideshow presenter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the match-the-fractal game
    Play {
        /// Difficulty tier (0-4)
        #[arg(short, long)]
        difficulty: Option<u8>,

        /// Random seed for reproducible targets
        #[arg(short, long)]
        seed: Option<u64>,

        /// Start with the light theme
        #[arg(long)]
        light: bool,
    },

    /// Present a slide deck
    Slides {
        /// Deck file (slides separated by ---); built-in deck if omitted
        #[arg(short, long)]
        deck: Option<PathBuf>,

        /// Start with the light theme
        #[arg(long)]
        light: bool,
    },

    /// Print a fractal to stdout (no interactive display)
    Render {
        /// Render a generated target of this difficulty instead of explicit parameters
        #[arg(short, long)]
        difficulty: Option<u8>,

        /// Random seed (with --difficulty)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output width in cells
        #[arg(short = 'W', long, default_value = "60")]
        width: u16,

        /// Output height in cells
        #[arg(short = 'H', long, default_value = "30")]
        height: u16,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Print a randomly generated target
    Generate {
        /// Difficulty tier (0-4)
        #[arg(short, long, default_value = "0")]
        difficulty: u8,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Explicit fractal parameters; unset fields keep their defaults
#[derive(Args)]
struct ParamArgs {
    #[arg(long)]
    spread: Option<f64>,
    #[arg(long)]
    sides: Option<u32>,
    #[arg(long)]
    levels: Option<u32>,
    #[arg(long)]
    scale: Option<f64>,
    #[arg(long)]
    line_width: Option<u32>,
    #[arg(long)]
    line_length: Option<f64>,
    #[arg(long)]
    branching: Option<u32>,
    #[arg(long)]
    n_level_branches: Option<u32>,
    #[arg(long)]
    hue: Option<u32>,
    #[arg(long)]
    rotation: Option<f64>,
}

impl ParamArgs {
    fn to_params(&self) -> FractalParams {
        let mut params = FractalParams::default();
        let overrides = [
            (ParamKey::Spread, self.spread),
            (ParamKey::Sides, self.sides.map(f64::from)),
            (ParamKey::Levels, self.levels.map(f64::from)),
            (ParamKey::Scale, self.scale),
            (ParamKey::LineWidth, self.line_width.map(f64::from)),
            (ParamKey::LineLength, self.line_length),
            (ParamKey::Branching, self.branching.map(f64::from)),
            (ParamKey::NLevelBranches, self.n_level_branches.map(f64::from)),
            (ParamKey::Hue, self.hue.map(f64::from)),
            (ParamKey::Rotation, self.rotation),
        ];
        for (key, value) in overrides {
            if let Some(v) = value {
                params.set(key, v);
            }
        }
        params
    }
}

fn clamp_difficulty(difficulty: u8) -> u8 {
    if difficulty > MAX_DIFFICULTY {
        eprintln!("Difficulty {} out of range, using {}", difficulty, MAX_DIFFICULTY);
    }
    difficulty.min(MAX_DIFFICULTY)
}

fn pick_theme(light: bool, configured: Option<Theme>) -> Theme {
    if light {
        Theme::Light
    } else {
        configured.unwrap_or_default()
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    let game_config = |difficulty: Option<u8>, seed: Option<u64>, theme: Theme| GameConfig {
        difficulty: clamp_difficulty(difficulty.or(settings.game.difficulty).unwrap_or(0)),
        seed,
        theme,
    };

    match cli.command {
        Commands::Play { difficulty, seed, light } => {
            let theme = pick_theme(light, settings.game.theme);
            game::run(game_config(difficulty, seed, theme))?;
        }
        Commands::Slides { deck, light } => {
            let theme = pick_theme(light, settings.slides.theme);
            let config = SlidesConfig {
                deck: deck.or_else(|| settings.slides.deck.clone()),
                theme,
                game: game_config(None, None, theme),
            };
            slides::run(config)?;
        }
        Commands::Render {
            difficulty,
            seed,
            width,
            height,
            params,
        } => {
            let source = match difficulty {
                Some(d) => RenderSource::Generated { difficulty: clamp_difficulty(d), seed },
                None => RenderSource::Params(params.to_params()),
            };
            print::run_render(RenderConfig {
                source,
                width: width.max(1),
                height: height.max(1),
            })?;
        }
        Commands::Generate { difficulty, seed, json } => {
            print::run_generate(GenerateConfig {
                difficulty: clamp_difficulty(difficulty),
                seed,
                json,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_params() {
        let cli = Cli::parse_from(["fracmatch", "render", "--sides", "7", "--spread", "1.2", "--n-level-branches", "1"]);
        let Commands::Render { params, difficulty, .. } = cli.command else {
            panic!("expected render");
        };
        assert!(difficulty.is_none());
        let p = params.to_params();
        assert_eq!(p.sides, 7);
        assert_eq!(p.n_level_branches, 1);
        assert_eq!(ParamKey::Spread.format(p.spread), "1.2");
        assert_eq!(p.hue, FractalParams::default().hue);
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn theme_flag_wins_over_settings() {
        assert_eq!(pick_theme(true, Some(Theme::Dark)), Theme::Light);
        assert_eq!(pick_theme(false, Some(Theme::Light)), Theme::Light);
        assert_eq!(pick_theme(false, None), Theme::Dark);
    }
}
