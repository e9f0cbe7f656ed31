use crossterm::style::Color;
use serde::Deserialize;

/// A plain RGB triple, independent of the terminal backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_color(self) -> Color {
        Color::Rgb { r: self.r, g: self.g, b: self.b }
    }
}

/// HSL to RGB. `hue` in degrees, saturation/lightness in [0,1].
pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r), to_byte(g), to_byte(b))
}

/// Fully saturated stroke color for a fractal hue
pub fn hue_color(hue: u32) -> Rgb {
    hsl(hue as f64, 1.0, 0.5)
}

/// Light/dark UI theme, toggled with Enter in both the game and the slides
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colors a screen needs for chrome and text
#[derive(Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub success: Color,
    pub highlight: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Toggle glyph shown in headers (moon in light mode, sun in dark)
    pub fn icon(self) -> char {
        match self {
            Theme::Dark => '☀',
            Theme::Light => '☾',
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                text: Color::White,
                muted: Color::DarkGrey,
                accent: Color::Cyan,
                border: Color::Grey,
                success: Color::Green,
                highlight: Color::Yellow,
            },
            Theme::Light => Palette {
                text: Color::Black,
                muted: Color::Grey,
                accent: Color::DarkBlue,
                border: Color::DarkGrey,
                success: Color::DarkGreen,
                highlight: Color::DarkMagenta,
            },
        }
    }
}
