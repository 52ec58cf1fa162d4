use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Parameters of the procedural ore world.
#[derive(Clone, Debug, Deserialize)]
pub struct VeinParams {
    #[serde(default = "default_surface_y")]
    pub surface_y: i32,
    #[serde(default = "default_height_amplitude")]
    pub height_amplitude: f32,
    #[serde(default = "default_height_frequency")]
    pub height_frequency: f32,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_top")]
    pub top: String,
    /// Chebyshev radius, in partitions, of the window kept loaded around the center.
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    #[serde(default = "default_ores")]
    pub ores: Vec<OreRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OreRule {
    pub block: String,
    #[serde(default = "default_ore_frequency")]
    pub frequency: f32,
    /// Noise value above which the cell becomes ore; noise is in `[-1, 1]`.
    #[serde(default = "default_ore_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub min_y: i32,
    #[serde(default = "default_ore_max_y")]
    pub max_y: i32,
}

fn default_surface_y() -> i32 {
    64
}
fn default_height_amplitude() -> f32 {
    6.0
}
fn default_height_frequency() -> f32 {
    0.01
}
fn default_fill() -> String {
    "stone".into()
}
fn default_top() -> String {
    "dirt".into()
}
fn default_load_radius() -> i32 {
    6
}
fn default_ore_frequency() -> f32 {
    0.1
}
fn default_ore_threshold() -> f32 {
    0.8
}
fn default_ore_max_y() -> i32 {
    64
}

fn ore(block: &str, frequency: f32, threshold: f32, max_y: i32) -> OreRule {
    OreRule {
        block: block.into(),
        frequency,
        threshold,
        min_y: 0,
        max_y,
    }
}

fn default_ores() -> Vec<OreRule> {
    vec![
        ore("diamond_ore", 0.15, 0.88, 16),
        ore("gold_ore", 0.12, 0.85, 32),
        ore("iron_ore", 0.10, 0.80, 64),
        ore("coal_ore", 0.08, 0.75, 128),
    ]
}

impl Default for VeinParams {
    fn default() -> Self {
        Self {
            surface_y: default_surface_y(),
            height_amplitude: default_height_amplitude(),
            height_frequency: default_height_frequency(),
            fill: default_fill(),
            top: default_top(),
            load_radius: default_load_radius(),
            ores: default_ores(),
        }
    }
}

impl VeinParams {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
