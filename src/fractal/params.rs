//! Parametric fractal model and the slider lattice every value lives on

use serde::Serialize;

/// One adjustable field of [`FractalParams`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Spread,
    Sides,
    Levels,
    Scale,
    LineWidth,
    LineLength,
    Branching,
    NLevelBranches,
    Hue,
    Rotation,
}

/// Slider bounds for a parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamKey {
    /// Display order of the control panel
    pub const ALL: [ParamKey; 10] = [
        ParamKey::Spread,
        ParamKey::Sides,
        ParamKey::Levels,
        ParamKey::Scale,
        ParamKey::LineWidth,
        ParamKey::LineLength,
        ParamKey::Branching,
        ParamKey::NLevelBranches,
        ParamKey::Hue,
        ParamKey::Rotation,
    ];

    /// Keys compared when checking a match. Rotation is left out.
    pub const COMPARED: [ParamKey; 9] = [
        ParamKey::Spread,
        ParamKey::Sides,
        ParamKey::Levels,
        ParamKey::Scale,
        ParamKey::LineWidth,
        ParamKey::LineLength,
        ParamKey::Branching,
        ParamKey::NLevelBranches,
        ParamKey::Hue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ParamKey::Spread => "spread",
            ParamKey::Sides => "sides",
            ParamKey::Levels => "levels",
            ParamKey::Scale => "scale",
            ParamKey::LineWidth => "lineWidth",
            ParamKey::LineLength => "lineLength",
            ParamKey::Branching => "branching",
            ParamKey::NLevelBranches => "nLevelBranches",
            ParamKey::Hue => "hue",
            ParamKey::Rotation => "rotation",
        }
    }

    pub fn range(self) -> Range {
        let (min, max, step) = match self {
            ParamKey::Spread => (0.0, 3.1, 0.1),
            ParamKey::Sides => (1.0, 12.0, 1.0),
            ParamKey::Levels => (0.0, 6.0, 1.0),
            ParamKey::Scale => (0.05, 1.0, 0.05),
            ParamKey::LineWidth => (1.0, 30.0, 1.0),
            ParamKey::LineLength => (1.0, 3.0, 1.0),
            ParamKey::Branching => (1.0, 4.0, 1.0),
            ParamKey::NLevelBranches => (1.0, 2.0, 1.0),
            ParamKey::Hue => (0.0, 350.0, 10.0),
            ParamKey::Rotation => (0.0, 360.0, 15.0),
        };
        Range { min, max, step }
    }

    /// Human-readable value readout
    pub fn format(self, value: f64) -> String {
        match self {
            ParamKey::Scale => format!("{:.2}", value),
            ParamKey::Spread => format!("{:.1}", value),
            ParamKey::Rotation => format!("{}°", value.round() as i64),
            _ => format!("{}", value.round() as i64),
        }
    }
}

/// Snap a value onto a step lattice.
///
/// The generator and the sliders both go through this, so a value reached by
/// stepping a slider is bit-identical to the same value rolled by the generator.
pub fn snap(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// A recursive branching line figure
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FractalParams {
    /// Child branch angle offset, radians
    pub spread: f64,
    pub sides: u32,
    pub levels: u32,
    pub scale: f64,
    pub line_width: u32,
    pub line_length: f64,
    pub branching: u32,
    pub n_level_branches: u32,
    pub hue: u32,
    /// Whole-figure rotation, degrees
    pub rotation: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        let mut params = Self {
            spread: 0.0,
            sides: 5,
            levels: 3,
            scale: 0.0,
            line_width: 15,
            line_length: 1.0,
            branching: 1,
            n_level_branches: 2,
            hue: 290,
            rotation: 0.0,
        };
        // Float defaults go through the lattice so they compare equal to stepped values
        params.set(ParamKey::Spread, 0.7);
        params.set(ParamKey::Scale, 0.5);
        params
    }
}

impl FractalParams {
    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::Spread => self.spread,
            ParamKey::Sides => self.sides as f64,
            ParamKey::Levels => self.levels as f64,
            ParamKey::Scale => self.scale,
            ParamKey::LineWidth => self.line_width as f64,
            ParamKey::LineLength => self.line_length,
            ParamKey::Branching => self.branching as f64,
            ParamKey::NLevelBranches => self.n_level_branches as f64,
            ParamKey::Hue => self.hue as f64,
            ParamKey::Rotation => self.rotation,
        }
    }

    /// Set a field, clamped to its slider range and snapped to its step
    pub fn set(&mut self, key: ParamKey, value: f64) {
        let range = key.range();
        let v = snap(value.clamp(range.min, range.max), range.step);
        match key {
            ParamKey::Spread => self.spread = v,
            ParamKey::Sides => self.sides = v as u32,
            ParamKey::Levels => self.levels = v as u32,
            ParamKey::Scale => self.scale = v,
            ParamKey::LineWidth => self.line_width = v as u32,
            ParamKey::LineLength => self.line_length = v,
            ParamKey::Branching => self.branching = v as u32,
            ParamKey::NLevelBranches => self.n_level_branches = v as u32,
            ParamKey::Hue => self.hue = v as u32,
            ParamKey::Rotation => self.rotation = v,
        }
    }

    /// Move a field by `direction` slider steps
    pub fn step(&mut self, key: ParamKey, direction: i32) {
        let step = key.range().step;
        self.set(key, self.get(key) + direction as f64 * step);
    }

    /// Copy with every field snapped onto its slider lattice
    #[cfg(test)]
    pub fn normalized(mut self) -> Self {
        for key in ParamKey::ALL {
            self.set(key, self.get(key));
        }
        self
    }
}
