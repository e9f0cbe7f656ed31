use crate::colors::Theme;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// User settings from `~/.config/fracmatch/config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub slides: SlidesSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameSettings {
    pub difficulty: Option<u8>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlidesSettings {
    pub deck: Option<PathBuf>,   // Deck file used when --deck is not given
    pub theme: Option<Theme>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings text; anything unparsable falls back to defaults
    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fracmatch")
            .join("config.toml")
    }
}
