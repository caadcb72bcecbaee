//! The per-frame uniform snapshot and its upload protocol.
//!
//! Names and array indexing must match `shaders/light.frag`.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::camera::{Camera2d, Viewport};
use crate::config::ShadingConfig;
use crate::coords::world_to_shader_space;
use crate::falloff::Falloff;
use crate::light::{Light, LightKind};
use crate::renderer::UniformSurface;

pub const LIGHT_COUNT: &str = "lightCount";
pub const AMBIENT: &str = "ambient";
pub const NORMAL_INFLUENCE: &str = "normalInfluence";
pub const RESOLUTION: &str = "resolution";
pub const SPECULAR_INTENSITY: &str = "specularIntensity";
pub const SPECULAR_REMAP: &str = "specularRemap";
pub const VIEWPORT_OFFSET: &str = "u_viewportOffset";
pub const VIEWPORT_SIZE: &str = "u_viewportSize";
pub const PROJ_TRANS: &str = "u_projTrans";
pub const USE_NORMAL_MAP: &str = "u_useNormalMap";
pub const DIFFUSE_SAMPLER: &str = "u_texture";
pub const NORMAL_SAMPLER: &str = "u_normals";

pub const DIFFUSE_UNIT: i32 = 0;
pub const NORMAL_UNIT: i32 = 1;

/// `lightType[i]` etc.
pub fn indexed(name: &str, i: usize) -> String {
    format!("{name}[{i}]")
}

/// Everything the shader receives for one light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSlot {
    pub kind: LightKind,
    /// Normalized viewport space; zero for directional lights.
    pub position: Vec3,
    pub direction: Vec3,
    /// Alpha already scaled by intensity.
    pub color: Vec4,
    pub falloff: Vec3,
    /// Cosine of the cone half-angle; zero unless spot.
    pub cone_angle: f32,
}

impl LightSlot {
    pub fn from_light(light: &Light, camera: &Camera2d, viewport: &Viewport) -> Self {
        match light {
            Light::Directional(l) => Self {
                kind: LightKind::Directional,
                position: Vec3::ZERO,
                direction: l.shader_direction(),
                color: l.shader_color().to_vec4(),
                falloff: Falloff::NONE.to_vec3(),
                cone_angle: 0.0,
            },
            Light::Point(l) => Self {
                kind: LightKind::Point,
                position: world_to_shader_space(l.position(), camera, viewport),
                direction: Vec3::Z,
                color: l.shader_color().to_vec4(),
                falloff: l.falloff().to_vec3(),
                cone_angle: 0.0,
            },
            Light::Spot(l) => Self {
                kind: LightKind::Spot,
                position: world_to_shader_space(l.position(), camera, viewport),
                direction: l.shader_direction(),
                color: l.shader_color().to_vec4(),
                falloff: l.falloff().to_vec3(),
                cone_angle: l.cone_cos(),
            },
        }
    }

    fn upload<S: UniformSurface + ?Sized>(&self, i: usize, surface: &mut S) {
        surface.set_int(&indexed("lightType", i), self.kind.ordinal());
        surface.set_vec3(&indexed("lightPos", i), self.position);
        surface.set_vec3(&indexed("lightDir", i), self.direction);
        surface.set_vec4(&indexed("lightColor", i), self.color);
        surface.set_vec3(&indexed("falloff", i), self.falloff);
        surface.set_float(&indexed("coneAngle", i), self.cone_angle);
    }
}

/// Value snapshot of every lighting uniform for one frame.
///
/// Rebuilt from the active light list on every upload; nothing is patched
/// incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct LightUniforms {
    pub slots: Vec<LightSlot>,
    pub ambient: Vec4,
    pub normal_influence: f32,
    pub specular_intensity: f32,
    pub specular_remap: Vec2,
    pub viewport_offset: Vec2,
    pub viewport_size: Vec2,
    /// Framebuffer size in pixels.
    pub resolution: Vec2,
    pub proj_trans: Mat4,
}

impl LightUniforms {
    /// Snapshot the first `max_lights` of `lights`, in order.
    pub fn capture<'a>(
        lights: impl IntoIterator<Item = &'a Light>,
        max_lights: usize,
        shading: &ShadingConfig,
        camera: &Camera2d,
        viewport: &Viewport,
        resolution: Vec2,
    ) -> Self {
        let slots = lights
            .into_iter()
            .take(max_lights)
            .map(|light| LightSlot::from_light(light, camera, viewport))
            .collect();
        let rect = viewport.screen();

        Self {
            slots,
            ambient: shading.ambient.to_vec4(),
            normal_influence: shading.normal_influence,
            specular_intensity: shading.specular_intensity,
            specular_remap: Vec2::from(shading.specular_remap),
            viewport_offset: rect.offset(),
            viewport_size: rect.size(),
            resolution,
            proj_trans: camera.combined(),
        }
    }

    pub fn light_count(&self) -> i32 {
        self.slots.len() as i32
    }

    /// Write every uniform. The program must already be bound.
    pub fn upload<S: UniformSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_mat4(PROJ_TRANS, &self.proj_trans);
        surface.set_int(LIGHT_COUNT, self.light_count());
        surface.set_float(NORMAL_INFLUENCE, self.normal_influence);
        surface.set_vec4(AMBIENT, self.ambient);
        surface.set_float(SPECULAR_INTENSITY, self.specular_intensity);
        surface.set_vec2(SPECULAR_REMAP, self.specular_remap);
        surface.set_vec2(VIEWPORT_OFFSET, self.viewport_offset);
        surface.set_vec2(VIEWPORT_SIZE, self.viewport_size);
        surface.set_vec2(RESOLUTION, self.resolution);

        for (i, slot) in self.slots.iter().enumerate() {
            slot.upload(i, surface);
        }
        log::trace!("uploaded {} light slots", self.slots.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Scaling;
    use crate::color::Color;
    use crate::light::{DirectionalLight, PointLight, SpotLight};
    use crate::renderer::{RecordingSurface, UniformValue};
    use approx::assert_abs_diff_eq;

    const SCREEN: Vec2 = Vec2::new(800.0, 800.0);

    fn view() -> (Camera2d, Viewport) {
        let mut viewport = Viewport::new(Scaling::Fit, 20.0, 10.0);
        viewport.update(800, 800);
        (Camera2d::new(20.0, 10.0), viewport)
    }

    #[test]
    fn slot_fields_per_kind() {
        let (camera, viewport) = view();

        let sun = LightSlot::from_light(
            &DirectionalLight::new(Color::WHITE, 0.0, 0.5).with_elevation(0.0).into(),
            &camera,
            &viewport,
        );
        assert_eq!(sun.kind.ordinal(), 0);
        assert_eq!(sun.position, Vec3::ZERO);
        assert_abs_diff_eq!(sun.direction, Vec3::X, epsilon = 1e-6);
        assert_eq!(sun.color.w, 0.5);
        assert_eq!(sun.falloff, Vec3::new(1.0, 0.0, 0.0));

        let lamp = LightSlot::from_light(
            &PointLight::new(Vec2::new(10.0, 5.0), Color::WHITE, 2.0, 7.0)
                .with_falloff_profile(1.0)
                .into(),
            &camera,
            &viewport,
        );
        assert_eq!(lamp.kind.ordinal(), 1);
        assert_abs_diff_eq!(lamp.position, Vec3::new(0.5, 0.5, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(lamp.falloff, Vec3::new(1.0, 0.0, 255.0 / 49.0), epsilon = 1e-5);
        assert_eq!(lamp.cone_angle, 0.0);

        let spot = LightSlot::from_light(
            &SpotLight::new(Vec2::ZERO, Color::WHITE, 0.0, 120.0, 1.0, 10.0).into(),
            &camera,
            &viewport,
        );
        assert_eq!(spot.kind.ordinal(), 2);
        assert_abs_diff_eq!(spot.cone_angle, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(spot.position, Vec3::ZERO, epsilon = 1e-5);
    }

    #[test]
    fn capture_respects_capacity_and_order() {
        let (camera, viewport) = view();
        let lights: Vec<Light> = (0..5)
            .map(|i| PointLight::new(Vec2::new(i as f32, 0.0), Color::WHITE, 1.0, 5.0).into())
            .collect();

        let snapshot = LightUniforms::capture(
            &lights,
            3,
            &ShadingConfig::default(),
            &camera,
            &viewport,
            SCREEN,
        );
        assert_eq!(snapshot.light_count(), 3);
        for (i, slot) in snapshot.slots.iter().enumerate() {
            let expected = world_to_shader_space(Vec2::new(i as f32, 0.0), &camera, &viewport);
            assert_eq!(slot.position, expected);
        }
    }

    #[test]
    fn upload_writes_indexed_names() {
        let (camera, viewport) = view();
        let lights: Vec<Light> = vec![
            DirectionalLight::new(Color::WHITE, 0.0, 1.0).into(),
            SpotLight::new(Vec2::ZERO, Color::WHITE, 0.0, 60.0, 1.0, 10.0).into(),
        ];
        let shading = ShadingConfig {
            normal_influence: 0.25,
            ..ShadingConfig::default()
        };

        let mut surface = RecordingSurface::new();
        LightUniforms::capture(&lights, 20, &shading, &camera, &viewport, SCREEN)
            .upload(&mut surface);

        assert_eq!(surface.int("lightCount"), Some(2));
        assert_eq!(surface.int("lightType[0]"), Some(0));
        assert_eq!(surface.int("lightType[1]"), Some(2));
        assert_eq!(surface.get("normalInfluence"), Some(UniformValue::Float(0.25)));
        assert_eq!(
            surface.get("u_viewportOffset"),
            Some(UniformValue::Vec2(Vec2::new(0.0, 200.0)))
        );
        assert_eq!(surface.get("resolution"), Some(UniformValue::Vec2(SCREEN)));
        assert!(surface.get("lightColor[1]").is_some());
        assert!(surface.get("coneAngle[1]").is_some());
        assert!(surface.get("lightType[2]").is_none());
    }
}
