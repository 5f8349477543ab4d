use bevy::prelude::*;
use pioneers_map::map::decode_terrain;
use pioneers_map::Tool;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default location of the editor configuration
pub const DEFAULT_CONFIG_PATH: &str = "pioneers.toml";

/// Largest accepted map width or height
pub const MAX_MAP_SIDE: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Failed to read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Resource, Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub map: MapSettings,
    pub sprites: SpriteSettings,
    pub editor: EditorSettings,
}

/// Size and fill of a new blank map
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub width: u32,
    pub height: u32,
    pub fill: char,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            fill: 'W',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    /// Sprite sheet handed to the renderer
    pub sheet: String,
    /// Pixels per sheet cell
    pub sprite_size: u32,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            sheet: "Images/Background_Tiles.png".to_string(),
            sprite_size: 128,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub default_tool: Tool,
}

impl EditorConfig {
    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&config_str)?;

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig =
            toml::from_str(config_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width == 0 || self.map.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "map size must be at least 1x1, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if self.map.width > MAX_MAP_SIDE || self.map.height > MAX_MAP_SIDE {
            return Err(ConfigError::Invalid(format!(
                "map size {}x{} exceeds {}x{}",
                self.map.width, self.map.height, MAX_MAP_SIDE, MAX_MAP_SIDE
            )));
        }
        if decode_terrain(self.map.fill).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown fill terrain '{}'",
                self.map.fill
            )));
        }
        if self.sprites.sprite_size == 0 {
            return Err(ConfigError::Invalid("sprite_size must be positive".to_string()));
        }
        Ok(())
    }
}
