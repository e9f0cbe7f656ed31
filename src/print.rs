//! Non-interactive output: print a fractal or a generated target to stdout

use crate::canvas::BrailleCanvas;
use crate::config::{resolve_seed, GenerateConfig, RenderConfig, RenderSource};
use crate::fractal::{generate, render, FractalParams, ParamKey, Target};
use crate::layout::Rect;
use crate::terminal::Terminal;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io;

/// Machine-readable description of a generated target
#[derive(Serialize)]
pub struct TargetReport {
    pub seed: u64,
    pub difficulty: u8,
    pub color: String,
    pub params: FractalParams,
}

impl TargetReport {
    pub fn new(seed: u64, target: &Target) -> Self {
        let c = target.color;
        Self {
            seed,
            difficulty: target.difficulty,
            color: format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
            params: target.params,
        }
    }
}

fn seeded_target(difficulty: u8, seed: Option<u64>) -> (u64, Target) {
    let seed = resolve_seed(seed);
    let mut rng = StdRng::seed_from_u64(seed);
    (seed, generate(difficulty, &mut rng))
}

/// Draw `params` into an off-screen buffer of `width` x `height` cells
pub fn draw_to_buffer(params: &FractalParams, width: u16, height: u16) -> Terminal {
    let mut term = Terminal::with_size(width, height);
    let mut canvas = BrailleCanvas::new(width, height);
    render(&mut canvas, params);
    canvas.blit(&mut term, Rect::new(0, 0, width, height));
    term
}

pub fn run_render(config: RenderConfig) -> io::Result<()> {
    let params = match config.source {
        RenderSource::Params(params) => params,
        RenderSource::Generated { difficulty, seed } => seeded_target(difficulty, seed).1.params,
    };
    draw_to_buffer(&params, config.width, config.height).print_to_stdout();
    Ok(())
}

/// Two-column table of every parameter with its readout and raw value
pub fn format_table(report: &TargetReport) -> String {
    let mut out = format!(
        "seed        {}\ndifficulty  {}\ncolor       {}\n",
        report.seed, report.difficulty, report.color
    );
    for key in ParamKey::ALL {
        let value = report.params.get(key);
        out.push_str(&format!("{:<16}{:>8}   ({})\n", key.label(), key.format(value), value));
    }
    out
}

pub fn run_generate(config: GenerateConfig) -> io::Result<()> {
    let (seed, target) = seeded_target(config.difficulty, config.seed);
    let report = TargetReport::new(seed, &target);

    if config.json {
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        println!("{}", json);
    } else {
        print!("{}", format_table(&report));
    }
    Ok(())
}
