//! Random target generation by difficulty tier

use super::params::{FractalParams, ParamKey};
use crate::colors::{hue_color, Rgb};
use rand::Rng;

pub const MAX_DIFFICULTY: u8 = 4;

/// Source of uniform values in `[0, 1)`
pub trait Randomizer {
    fn unit(&mut self) -> f64;

    /// Uniform value in `[min, max]` snapped to `step`
    fn rand(&mut self, min: f64, max: f64, step: f64) -> f64 {
        let u = self.unit();
        ((min + u * (max - min)) / step).round() * step
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

impl<R: Rng> Randomizer for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Bounds used to roll a target at one difficulty tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tier {
    pub sides: (u32, u32),
    pub levels: (u32, u32),
    pub branching: (u32, u32),
    /// Probability of a second mirrored branch per node
    pub n: f64,
}

const TIERS: [Tier; 5] = [
    Tier { sides: (1, 3), levels: (1, 2), branching: (1, 1), n: 0.0 },
    Tier { sides: (2, 5), levels: (1, 3), branching: (1, 2), n: 0.3 },
    Tier { sides: (3, 6), levels: (2, 3), branching: (1, 2), n: 0.5 },
    Tier { sides: (3, 8), levels: (2, 4), branching: (1, 3), n: 0.7 },
    Tier { sides: (4, 10), levels: (3, 4), branching: (2, 3), n: 0.9 },
];

pub const SPREAD_RANGE: (f64, f64) = (0.3, 1.5);
pub const SCALE_RANGE: (f64, f64) = (0.4, 0.7);
pub const LINE_WIDTH_RANGE: (f64, f64) = (5.0, 20.0);
pub const LINE_LENGTH_RANGE: (f64, f64) = (1.0, 2.0);
pub const HUE_RANGE: (f64, f64) = (0.0, 300.0);
pub const HUE_STEP: f64 = 30.0;
pub const ROTATION_RANGE: (f64, f64) = (0.0, 360.0);

/// Wider ranges rolled again at the top tier
pub const HARD_SCALE_RANGE: (f64, f64) = (0.3, 0.9);
pub const HARD_LINE_LENGTH_RANGE: (f64, f64) = (1.0, 3.0);

pub fn tier(difficulty: u8) -> Tier {
    TIERS[difficulty.min(MAX_DIFFICULTY) as usize]
}

/// A generated target and its stroke color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub params: FractalParams,
    pub color: Rgb,
    pub difficulty: u8,
}

fn roll(rng: &mut impl Randomizer, key: ParamKey, bounds: (f64, f64)) -> f64 {
    rng.rand(bounds.0, bounds.1, key.range().step)
}

fn roll_int(rng: &mut impl Randomizer, bounds: (u32, u32)) -> u32 {
    rng.rand(bounds.0 as f64, bounds.1 as f64, 1.0) as u32
}

/// Roll a new target for `difficulty` (clamped to 0..=4)
pub fn generate(difficulty: u8, rng: &mut impl Randomizer) -> Target {
    let difficulty = difficulty.min(MAX_DIFFICULTY);
    let t = tier(difficulty);

    let mut params = FractalParams {
        spread: roll(rng, ParamKey::Spread, SPREAD_RANGE),
        sides: roll_int(rng, t.sides),
        levels: roll_int(rng, t.levels),
        scale: roll(rng, ParamKey::Scale, SCALE_RANGE),
        line_width: roll(rng, ParamKey::LineWidth, LINE_WIDTH_RANGE) as u32,
        line_length: roll(rng, ParamKey::LineLength, LINE_LENGTH_RANGE),
        branching: roll_int(rng, t.branching),
        n_level_branches: if rng.chance(t.n) { 2 } else { 1 },
        hue: rng.rand(HUE_RANGE.0, HUE_RANGE.1, HUE_STEP) as u32,
        rotation: 0.0,
    };

    if difficulty >= 3 {
        params.rotation = roll(rng, ParamKey::Rotation, ROTATION_RANGE);
    }

    // Top tier rolls length and scale a second time from wider bounds
    if difficulty == MAX_DIFFICULTY {
        params.line_length = roll(rng, ParamKey::LineLength, HARD_LINE_LENGTH_RANGE);
        params.scale = roll(rng, ParamKey::Scale, HARD_SCALE_RANGE);
    }

    Target {
        params,
        color: hue_color(params.hue),
        difficulty,
    }
}
