//! Parametric fractal model, renderer, target generator and match checker

pub mod generate;
pub mod matcher;
pub mod params;
pub mod render;

pub use generate::{generate, Randomizer, Target, MAX_DIFFICULTY};
pub use matcher::{check_match, mismatched_keys, MatchResult};
pub use params::{FractalParams, ParamKey};
pub use render::{render, Surface};
