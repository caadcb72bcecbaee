use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::shadow::DEFAULT_RAYS;

/// Lights the fragment shader has array slots for.
pub const DEFAULT_MAX_SHADER_LIGHTS: usize = 20;

/// Process-wide shading parameters uploaded with every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub ambient: Color,
    /// 0.0 = flat shading, 1.0 = full normal-mapped shading.
    pub normal_influence: f32,
    pub specular_intensity: f32,
    /// Remaps the specular map's [0, 1] range to [min, max].
    pub specular_remap: [f32; 2],
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            ambient: Color::new(1.0, 1.0, 1.0, 0.0),
            normal_influence: 1.0,
            specular_intensity: 32.0,
            specular_remap: [0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lights past this count still cast shadows but are not shaded.
    pub max_shader_lights: usize,
    pub shadow_rays: u32,
    pub diffuse_shadows: bool,
    pub clear_color: Color,
    pub shading: ShadingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_shader_lights: DEFAULT_MAX_SHADER_LIGHTS,
            shadow_rays: DEFAULT_RAYS,
            diffuse_shadows: true,
            clear_color: Color::BLACK,
            shading: ShadingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}
