//! Light descriptors.
//!
//! Each descriptor is the authoritative description of one light. The shadow
//! light paired with it is a projection of these values, pushed one way by
//! `sync_shadow`; nothing is ever read back from the shadow service.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::coords::{degrees_to_direction, DEFAULT_ELEVATION};
use crate::falloff::{Falloff, DEFAULT_PROFILE};
use crate::shadow::{ShadowCaster, ShadowHandle, ShadowLightKind};

/// Shader-side light type. The discriminant is the `lightType[i]` value.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

impl LightKind {
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn shadow_kind(self) -> ShadowLightKind {
        match self {
            LightKind::Directional => ShadowLightKind::Directional,
            LightKind::Point => ShadowLightKind::Point,
            LightKind::Spot => ShadowLightKind::Cone,
        }
    }
}

/// Sun-like light: parallel rays, no position, no falloff.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    color: Color,
    intensity: f32,
    direction: f32,
    elevation: f32,
}

impl DirectionalLight {
    /// `direction` is the heading toward the light in degrees.
    pub fn new(color: Color, direction: f32, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            direction,
            elevation: DEFAULT_ELEVATION,
        }
    }

    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn set_direction(&mut self, degrees: f32) {
        self.direction = degrees;
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: f32) {
        self.elevation = elevation;
    }

    pub fn shader_direction(&self) -> Vec3 {
        degrees_to_direction(self.direction, self.elevation)
    }

    /// The shadow service wants the direction the rays travel, which is the
    /// opposite of the heading toward the light.
    pub fn shadow_direction(&self) -> f32 {
        self.direction + 180.0
    }

    pub fn shader_color(&self) -> Color {
        self.color.with_alpha_scaled(self.intensity)
    }

    pub fn shadow_color(&self) -> Color {
        self.color.with_alpha_scaled(self.intensity)
    }

    pub fn sync_shadow<C: ShadowCaster + ?Sized>(&self, handle: ShadowHandle, shadows: &mut C) {
        shadows.set_color(handle, self.shadow_color());
        shadows.set_direction(handle, self.shadow_direction());
    }
}

/// Omnidirectional light at a position.
///
/// `distance` is the only attenuation knob: it is the shadow radius and the
/// falloff is re-derived from it whenever it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec2,
    color: Color,
    intensity: f32,
    distance: f32,
    falloff_profile: f32,
    falloff: Falloff,
    shader_intensity_multiplier: f32,
}

impl PointLight {
    pub fn new(position: Vec2, color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            distance,
            falloff_profile: DEFAULT_PROFILE,
            falloff: Falloff::from_distance(distance, DEFAULT_PROFILE),
            shader_intensity_multiplier: 1.0,
        }
    }

    pub fn with_falloff_profile(mut self, profile: f32) -> Self {
        self.set_falloff_profile(profile);
        self
    }

    pub fn with_shader_intensity_multiplier(mut self, multiplier: f32) -> Self {
        self.shader_intensity_multiplier = multiplier;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
        self.falloff = Falloff::from_distance(distance, self.falloff_profile);
    }

    pub fn falloff_profile(&self) -> f32 {
        self.falloff_profile
    }

    pub fn set_falloff_profile(&mut self, profile: f32) {
        self.falloff_profile = profile;
        self.falloff = Falloff::from_distance(self.distance, profile);
    }

    pub fn falloff(&self) -> Falloff {
        self.falloff
    }

    /// Extra brightness applied to the shading pass only. Unclamped.
    pub fn shader_intensity_multiplier(&self) -> f32 {
        self.shader_intensity_multiplier
    }

    pub fn set_shader_intensity_multiplier(&mut self, multiplier: f32) {
        self.shader_intensity_multiplier = multiplier;
    }

    pub fn shader_color(&self) -> Color {
        self.color
            .with_alpha_scaled(self.intensity * self.shader_intensity_multiplier)
    }

    pub fn shadow_color(&self) -> Color {
        self.color.with_alpha_scaled(self.intensity)
    }

    pub fn sync_shadow<C: ShadowCaster + ?Sized>(&self, handle: ShadowHandle, shadows: &mut C) {
        shadows.set_color(handle, self.shadow_color());
        shadows.set_distance(handle, self.distance);
        shadows.set_position(handle, self.position);
    }
}

/// Cone light. `cone_degree` is the full width of the cone.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    point: PointLight,
    direction: f32,
    cone_degree: f32,
}

impl SpotLight {
    pub fn new(
        position: Vec2,
        color: Color,
        direction: f32,
        cone_degree: f32,
        intensity: f32,
        distance: f32,
    ) -> Self {
        Self {
            point: PointLight::new(position, color, intensity, distance),
            direction,
            cone_degree,
        }
    }

    pub fn with_falloff_profile(mut self, profile: f32) -> Self {
        self.point.set_falloff_profile(profile);
        self
    }

    pub fn with_shader_intensity_multiplier(mut self, multiplier: f32) -> Self {
        self.point.set_shader_intensity_multiplier(multiplier);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.point.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.point.set_position(position);
    }

    pub fn color(&self) -> Color {
        self.point.color()
    }

    pub fn set_color(&mut self, color: Color) {
        self.point.set_color(color);
    }

    pub fn intensity(&self) -> f32 {
        self.point.intensity()
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.point.set_intensity(intensity);
    }

    pub fn distance(&self) -> f32 {
        self.point.distance()
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.point.set_distance(distance);
    }

    pub fn falloff_profile(&self) -> f32 {
        self.point.falloff_profile()
    }

    pub fn set_falloff_profile(&mut self, profile: f32) {
        self.point.set_falloff_profile(profile);
    }

    pub fn falloff(&self) -> Falloff {
        self.point.falloff()
    }

    pub fn shader_intensity_multiplier(&self) -> f32 {
        self.point.shader_intensity_multiplier()
    }

    pub fn set_shader_intensity_multiplier(&mut self, multiplier: f32) {
        self.point.set_shader_intensity_multiplier(multiplier);
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn set_direction(&mut self, degrees: f32) {
        self.direction = degrees;
    }

    pub fn cone_degree(&self) -> f32 {
        self.cone_degree
    }

    pub fn set_cone_degree(&mut self, cone_degree: f32) {
        self.cone_degree = cone_degree;
    }

    /// Both the shader cutoff and the shadow cone derive from this value.
    pub fn half_angle(&self) -> f32 {
        self.cone_degree / 2.0
    }

    /// `coneAngle[i]`: the shader tests `dot(toFragment, lightDir) > coneAngle`.
    pub fn cone_cos(&self) -> f32 {
        self.half_angle().to_radians().cos()
    }

    /// In-plane direction the cone points.
    pub fn shader_direction(&self) -> Vec3 {
        degrees_to_direction(self.direction, 0.0)
    }

    pub fn shader_color(&self) -> Color {
        self.point.shader_color()
    }

    pub fn shadow_color(&self) -> Color {
        self.point.shadow_color()
    }

    pub fn sync_shadow<C: ShadowCaster + ?Sized>(&self, handle: ShadowHandle, shadows: &mut C) {
        self.point.sync_shadow(handle, shadows);
        shadows.set_direction(handle, self.direction);
        shadows.set_cone_degree(handle, self.half_angle());
    }
}

/// One registered light of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl Light {
    pub fn kind(&self) -> LightKind {
        match self {
            Light::Directional(_) => LightKind::Directional,
            Light::Point(_) => LightKind::Point,
            Light::Spot(_) => LightKind::Spot,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Directional(l) => l.color(),
            Light::Point(l) => l.color(),
            Light::Spot(l) => l.color(),
        }
    }

    pub fn set_color(&mut self, color: Color) {
        match self {
            Light::Directional(l) => l.set_color(color),
            Light::Point(l) => l.set_color(color),
            Light::Spot(l) => l.set_color(color),
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Directional(l) => l.intensity(),
            Light::Point(l) => l.intensity(),
            Light::Spot(l) => l.intensity(),
        }
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        match self {
            Light::Directional(l) => l.set_intensity(intensity),
            Light::Point(l) => l.set_intensity(intensity),
            Light::Spot(l) => l.set_intensity(intensity),
        }
    }

    /// `None` for directional lights.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Light::Directional(_) => None,
            Light::Point(l) => Some(l.position()),
            Light::Spot(l) => Some(l.position()),
        }
    }

    /// Moves positioned lights; directional lights ignore it.
    pub fn set_position(&mut self, position: Vec2) {
        match self {
            Light::Directional(_) => {}
            Light::Point(l) => l.set_position(position),
            Light::Spot(l) => l.set_position(position),
        }
    }

    pub fn as_directional_mut(&mut self) -> Option<&mut DirectionalLight> {
        match self {
            Light::Directional(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointLight> {
        match self {
            Light::Point(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match self {
            Light::Spot(l) => Some(l),
            _ => None,
        }
    }

    pub fn sync_shadow<C: ShadowCaster + ?Sized>(&self, handle: ShadowHandle, shadows: &mut C) {
        match self {
            Light::Directional(l) => l.sync_shadow(handle, shadows),
            Light::Point(l) => l.sync_shadow(handle, shadows),
            Light::Spot(l) => l.sync_shadow(handle, shadows),
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(l: DirectionalLight) -> Self {
        Light::Directional(l)
    }
}

impl From<PointLight> for Light {
    fn from(l: PointLight) -> Self {
        Light::Point(l)
    }
}

impl From<SpotLight> for Light {
    fn from(l: SpotLight) -> Self {
        Light::Spot(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::{ShadowLightTable, DEFAULT_RAYS};
    use approx::assert_relative_eq;

    fn synced(light: &Light) -> (ShadowLightTable, ShadowHandle) {
        let mut table = ShadowLightTable::new();
        let handle = table.create_light(light.kind().shadow_kind(), DEFAULT_RAYS);
        light.sync_shadow(handle, &mut table);
        (table, handle)
    }

    #[test]
    fn point_distance_recomputes_falloff() {
        let mut light = PointLight::new(Vec2::new(6.0, 6.0), Color::WHITE, 2.0, 7.0)
            .with_falloff_profile(1.0);
        assert_relative_eq!(light.falloff().constant, 1.0);
        assert_relative_eq!(light.falloff().linear, 0.0);
        assert_relative_eq!(light.falloff().quadratic, 255.0 / 49.0);

        light.set_distance(30.0);
        assert_relative_eq!(light.falloff().quadratic, 255.0 / 900.0);
        assert_relative_eq!(light.falloff().linear, 0.0);
    }

    #[test]
    fn point_profile_change_keeps_distance() {
        let mut light = PointLight::new(Vec2::ZERO, Color::WHITE, 1.0, 10.0);
        light.set_falloff_profile(0.0);
        assert_relative_eq!(light.distance(), 10.0);
        assert_relative_eq!(light.falloff().linear, 25.5);
        assert_relative_eq!(light.falloff().quadratic, 0.0);
    }

    #[test]
    fn shader_multiplier_only_brightens_shading() {
        let light = PointLight::new(Vec2::ZERO, Color::new(1.0, 0.5, 0.2, 0.5), 2.0, 7.0)
            .with_shader_intensity_multiplier(3.0);
        assert_relative_eq!(light.shader_color().a, 3.0);
        assert_relative_eq!(light.shadow_color().a, 1.0);
        assert_relative_eq!(light.shader_color().g, 0.5);
    }

    #[test]
    fn point_sync_pushes_position_distance_and_color() {
        let light: Light = PointLight::new(Vec2::new(6.0, 5.0), Color::new(1.0, 0.5, 0.2, 1.0), 2.0, 7.0)
            .with_shader_intensity_multiplier(4.0)
            .into();
        let (table, handle) = synced(&light);
        let state = table.get(handle).unwrap();
        assert_eq!(state.kind, ShadowLightKind::Point);
        assert_eq!(state.position, Vec2::new(6.0, 5.0));
        assert_relative_eq!(state.distance, 7.0);
        assert_eq!(state.color, Color::new(1.0, 0.5, 0.2, 2.0));
    }

    #[test]
    fn directional_mirrors_direction_for_shadows_only() {
        let light = DirectionalLight::new(Color::WHITE, -45.0, 2.8).with_elevation(0.0);
        let dir = light.shader_direction();
        assert_relative_eq!(dir.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(dir.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);

        let (table, handle) = synced(&light.into());
        let state = table.get(handle).unwrap();
        assert_relative_eq!(state.direction, 135.0);
        assert_relative_eq!(state.color.a, 2.8);
    }

    #[test]
    fn directional_zero_heading_flat() {
        let light = DirectionalLight::new(Color::WHITE, 0.0, 1.0).with_elevation(0.0);
        let dir = light.shader_direction();
        assert_relative_eq!(dir.x, 1.0);
        assert_relative_eq!(dir.y, 0.0);
        assert_relative_eq!(dir.z, 0.0);
    }

    #[test]
    fn spot_cone_uses_one_half_angle_for_both_sides() {
        let light = SpotLight::new(Vec2::new(6.0, 5.0), Color::WHITE, 30.0, 75.0, 4.0, 10.0);
        assert_relative_eq!(light.half_angle(), 37.5);
        assert_relative_eq!(light.cone_cos(), 37.5_f32.to_radians().cos());

        let (table, handle) = synced(&light.clone().into());
        let state = table.get(handle).unwrap();
        assert_eq!(state.kind, ShadowLightKind::Cone);
        assert_relative_eq!(state.cone_degree, 37.5);
        assert_relative_eq!(state.direction, 30.0);
        assert_relative_eq!(state.cone_degree.to_radians().cos(), light.cone_cos());
    }

    #[test]
    fn spot_direction_stays_in_plane() {
        let light = SpotLight::new(Vec2::ZERO, Color::WHITE, 90.0, 45.0, 1.0, 5.0);
        let dir = light.shader_direction();
        assert_relative_eq!(dir.z, 0.0);
        assert_relative_eq!(dir.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn out_of_range_knobs_are_accepted() {
        let mut light = SpotLight::new(Vec2::ZERO, Color::WHITE, 0.0, 45.0, 1.0, 5.0);
        light.set_distance(-3.0);
        light.set_cone_degree(400.0);
        assert_eq!(light.falloff(), Falloff::NONE);
        assert_relative_eq!(light.half_angle(), 200.0);
    }

    #[test]
    fn enum_forwards_common_properties() {
        let mut light: Light = SpotLight::new(Vec2::ZERO, Color::WHITE, 0.0, 45.0, 1.0, 5.0).into();
        light.set_intensity(3.0);
        light.set_position(Vec2::new(1.0, 2.0));
        assert_eq!(light.kind(), LightKind::Spot);
        assert_relative_eq!(light.intensity(), 3.0);
        assert_eq!(light.position(), Some(Vec2::new(1.0, 2.0)));
        assert!(light.as_point_mut().is_none());

        let mut sun: Light = DirectionalLight::new(Color::WHITE, 0.0, 1.0).into();
        sun.set_position(Vec2::ONE);
        assert_eq!(sun.position(), None);
    }
}
