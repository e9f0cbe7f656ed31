//! Recursive branch renderer
//!
//! Each branch is drawn in its own local frame. Frames are plain affine
//! values composed on the way down, so a child never has to undo anything
//! its parent set up.

use super::params::FractalParams;
use crate::colors::{hue_color, Rgb};
use std::f64::consts::{PI, TAU};

/// Branch length as a fraction of the smaller surface dimension
const SIZE_FACTOR: f64 = 0.25;

/// Anything a fractal can be stroked onto
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb);
}

/// 2D affine transform `[a c e; b d f]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translation(x: f64, y: f64) -> Self {
        Affine { e: x, f: y, ..Self::IDENTITY }
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    pub fn scaling(factor: f64) -> Self {
        Affine { a: factor, d: factor, ..Self::IDENTITY }
    }

    /// `self` followed by `local`, i.e. `local` is applied in this frame's coordinates
    pub fn then(&self, local: &Affine) -> Affine {
        Affine {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            e: self.a * local.e + self.c * local.f + self.e,
            f: self.b * local.e + self.d * local.f + self.f,
        }
    }

    pub fn translate(&self, x: f64, y: f64) -> Affine {
        self.then(&Affine::translation(x, y))
    }

    pub fn rotate(&self, radians: f64) -> Affine {
        self.then(&Affine::rotation(radians))
    }

    pub fn scale(&self, factor: f64) -> Affine {
        self.then(&Affine::scaling(factor))
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Uniform scale factor of the frame, used for stroke widths
    pub fn scale_factor(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

/// Parameters plus the values derived from the surface at draw time
#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub params: FractalParams,
    pub size: f64,
    pub color: Rgb,
}

impl RenderConfig {
    pub fn new(params: &FractalParams, width: f64, height: f64) -> Self {
        Self {
            params: *params,
            size: width.min(height) * SIZE_FACTOR,
            color: hue_color(params.hue),
        }
    }
}

/// Clear `surface` and draw the fractal described by `params` centered on it
pub fn render<S: Surface + ?Sized>(surface: &mut S, params: &FractalParams) {
    surface.clear();

    let (w, h) = (surface.width(), surface.height());
    let config = RenderConfig::new(params, w, h);
    let origin = Affine::translation(w / 2.0, h / 2.0).rotate(params.rotation * PI / 180.0);

    let sides = params.sides.max(1);
    for side in 0..sides {
        let frame = origin.rotate(TAU / sides as f64 * side as f64);
        draw_branch(surface, &config, &frame, 0);
    }
}

fn draw_branch<S: Surface + ?Sized>(surface: &mut S, config: &RenderConfig, frame: &Affine, level: u32) {
    let p = &config.params;
    if level > p.levels {
        return;
    }

    let size = config.size;
    surface.stroke_line(
        frame.apply(0.0, 0.0),
        frame.apply(size * p.line_length, 0.0),
        p.line_width as f64 * frame.scale_factor(),
        config.color,
    );

    let branching = p.branching.max(1);
    for i in 0..branching {
        let child = frame
            .translate(size - (size / branching as f64) * i as f64, 0.0)
            .scale(p.scale);

        draw_branch(surface, config, &child.rotate(p.spread), level + 1);
        if p.n_level_branches == 2 {
            draw_branch(surface, config, &child.rotate(-p.spread), level + 1);
        }
    }
}

/// Strokes drawn per side for the given shape parameters
pub fn strokes_per_side(levels: u32, branching: u32, n_level_branches: u32) -> u64 {
    let fan_out = (branching.max(1) * n_level_branches.max(1)) as u64;
    (0..=levels).map(|depth| fan_out.pow(depth)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::params::ParamKey;

    /// Records every stroke instead of rasterizing
    struct Recorder {
        w: f64,
        h: f64,
        clears: usize,
        strokes: Vec<((f64, f64), (f64, f64), f64, Rgb)>,
    }

    impl Recorder {
        fn new(w: f64, h: f64) -> Self {
            Self { w, h, clears: 0, strokes: Vec::new() }
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> f64 {
            self.w
        }
        fn height(&self) -> f64 {
            self.h
        }
        fn clear(&mut self) {
            self.clears += 1;
            self.strokes.clear();
        }
        fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
            self.strokes.push((from, to, width, color));
        }
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn affine_composition_order() {
        let t = Affine::translation(10.0, 0.0).rotate(PI / 2.0).scale(2.0);
        assert!(close(t.apply(1.0, 0.0), (10.0, 2.0)));
        assert!((t.scale_factor() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stroke_count_matches_fan_out() {
        for levels in 0..=6 {
            for branching in 1..=4 {
                for n in 1..=2 {
                    let mut params = FractalParams::default();
                    params.set(ParamKey::Levels, levels as f64);
                    params.set(ParamKey::Branching, branching as f64);
                    params.set(ParamKey::NLevelBranches, n as f64);
                    params.set(ParamKey::Sides, 2.0);

                    let mut rec = Recorder::new(100.0, 100.0);
                    render(&mut rec, &params);
                    let expected = 2 * strokes_per_side(levels, branching, n);
                    assert_eq!(rec.strokes.len() as u64, expected);
                }
            }
        }
    }

    #[test]
    fn level_zero_draws_one_spoke_per_side() {
        let mut params = FractalParams::default();
        params.set(ParamKey::Levels, 0.0);
        params.set(ParamKey::Sides, 4.0);
        let mut rec = Recorder::new(200.0, 100.0);
        render(&mut rec, &params);

        assert_eq!(rec.strokes.len(), 4);
        let size = 25.0;
        assert!(close(rec.strokes[0].0, (100.0, 50.0)));
        assert!(close(rec.strokes[0].1, (100.0 + size, 50.0)));
        assert!(close(rec.strokes[1].1, (100.0, 50.0 + size)));
        assert!((rec.strokes[0].2 - 15.0).abs() < 1e-12);
    }

    #[test]
    fn child_stroke_is_scaled_and_offset() {
        let mut params = FractalParams::default();
        params.set(ParamKey::Levels, 1.0);
        params.set(ParamKey::Sides, 1.0);
        params.set(ParamKey::NLevelBranches, 1.0);
        params.set(ParamKey::Spread, 0.0);
        let mut rec = Recorder::new(100.0, 100.0);
        render(&mut rec, &params);

        assert_eq!(rec.strokes.len(), 2);
        let (from, to, width, _) = rec.strokes[1];
        assert!(close(from, (75.0, 50.0)));
        assert!(close(to, (75.0 + 25.0 * params.scale, 50.0)));
        assert!((width - 15.0 * params.scale).abs() < 1e-9);
    }

    #[test]
    fn rotation_is_degrees() {
        let mut params = FractalParams::default();
        params.set(ParamKey::Levels, 0.0);
        params.set(ParamKey::Sides, 1.0);
        params.set(ParamKey::Rotation, 90.0);
        let mut rec = Recorder::new(100.0, 100.0);
        render(&mut rec, &params);
        assert!(close(rec.strokes[0].1, (50.0, 75.0)));
    }

    #[test]
    fn render_is_deterministic_and_pure() {
        let params = FractalParams::default();
        let before = params;
        let mut a = Recorder::new(160.0, 120.0);
        let mut b = Recorder::new(160.0, 120.0);
        render(&mut a, &params);
        render(&mut b, &params);
        assert_eq!(a.strokes, b.strokes);
        assert_eq!(params, before);
        assert_eq!(a.clears, 1);
    }

    #[test]
    fn color_follows_hue() {
        let mut params = FractalParams::default();
        params.set(ParamKey::Hue, 120.0);
        let mut rec = Recorder::new(50.0, 50.0);
        render(&mut rec, &params);
        assert!(rec.strokes.iter().all(|s| s.3 == Rgb::new(0, 255, 0)));
    }
}
