//! Normal-mapped 2D lighting with shadow-casting light pairs.
//!
//! Every light registered with a [`LightEngine`] exists twice: as the
//! descriptor the lighting shader reads (see [`uniforms`]) and as a light in
//! an external [`ShadowCaster`]. The descriptor is authoritative;
//! [`LightEngine::update`] pushes it into the shadow side once per frame and
//! [`LightEngine::render_lights`] uploads it to the shader.

pub mod camera;
pub mod color;
pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod falloff;
pub mod light;
pub mod renderer;
pub mod shadow;
pub mod uniforms;

pub use camera::{Camera2d, Scaling, ScreenRect, Viewport, WindowSize};
pub use color::Color;
pub use config::{EngineConfig, ShadingConfig};
pub use engine::{LightEngine, LightId, LitPass};
pub use error::{LightError, Result};
pub use falloff::Falloff;
pub use light::{DirectionalLight, Light, LightKind, PointLight, SpotLight};
pub use renderer::{GlLightShader, RecordingSurface, UniformSurface};
pub use shadow::{ShadowCaster, ShadowHandle, ShadowLightKind, ShadowLightTable};
