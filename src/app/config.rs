use std::error::Error;
use std::fs;
use std::path::Path;

use seam_blocks::{BlockRegistry, BlocksConfig, HighlightEntry};
use seam_render::RenderSettings;
use seam_runtime::ScanSettings;
use seam_world::VeinParams;
use serde::Deserialize;

/// Built-in configuration used when no `--config` is given.
pub const DEFAULT_CONFIG: &str = include_str!("../../assets/seam.toml");

/// Pacing of the demo walker on the tick thread.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub tick_interval_ms: u64,
    /// Ticks between two digs below the walker; 0 disables digging.
    pub dig_interval: u64,
    /// Cells walked along +x per tick.
    pub walk_speed: f32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            dig_interval: 20,
            walk_speed: 0.5,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub blocks: BlocksConfig,
    pub highlight: Vec<HighlightEntry>,
    pub scan: ScanSettings,
    pub render: RenderSettings,
    pub world: VeinParams,
    pub driver: DriverSettings,
}

impl AppConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    pub fn registry(&self) -> Result<BlockRegistry, Box<dyn Error>> {
        BlockRegistry::from_configs(self.blocks.clone())
    }
}
