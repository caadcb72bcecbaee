//! The shadow-casting light service the engine drives.
//!
//! Occlusion geometry lives behind [`ShadowCaster`]; the engine only creates
//! shadow lights, pushes parameters into them and asks the service to render.

use std::collections::HashMap;

use glam::{Mat4, Vec2};

use crate::camera::ScreenRect;
use crate::color::Color;

/// Ray count requested for every shadow light.
pub const DEFAULT_RAYS: u32 = 128;

/// Opaque id of one light inside a [`ShadowCaster`]. Implementations mint
/// them with [`from_raw`](Self::from_raw) from whatever key their backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadowHandle(u32);

impl ShadowHandle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowLightKind {
    /// Parallel rays across the whole world.
    Directional,
    /// Rays in every direction from a position.
    Point,
    /// Rays inside a cone; the cone is given as a half-angle.
    Cone,
}

/// Shadow-casting light service.
///
/// Directions are degrees, counter-clockwise from +X, in the direction the
/// rays travel. Cone angles are half-angles in degrees.
pub trait ShadowCaster {
    fn create_light(&mut self, kind: ShadowLightKind, rays: u32) -> ShadowHandle;
    fn destroy_light(&mut self, handle: ShadowHandle);

    fn set_color(&mut self, handle: ShadowHandle, color: Color);
    fn set_position(&mut self, handle: ShadowHandle, position: Vec2);
    fn set_direction(&mut self, handle: ShadowHandle, degrees: f32);
    fn set_distance(&mut self, handle: ShadowHandle, distance: f32);
    fn set_cone_degree(&mut self, handle: ShadowHandle, half_angle: f32);

    fn set_ambient(&mut self, color: Color);
    /// Diffuse mode blends the light map instead of modulating it.
    fn set_diffuse(&mut self, diffuse: bool);
    fn set_combined_matrix(&mut self, combined: &Mat4);
    fn set_viewport(&mut self, rect: ScreenRect);

    fn update_and_render(&mut self);

    /// Release the service and every light it still owns.
    fn dispose(&mut self);
}

impl<T: ShadowCaster + ?Sized> ShadowCaster for &mut T {
    fn create_light(&mut self, kind: ShadowLightKind, rays: u32) -> ShadowHandle {
        (**self).create_light(kind, rays)
    }

    fn destroy_light(&mut self, handle: ShadowHandle) {
        (**self).destroy_light(handle)
    }

    fn set_color(&mut self, handle: ShadowHandle, color: Color) {
        (**self).set_color(handle, color)
    }

    fn set_position(&mut self, handle: ShadowHandle, position: Vec2) {
        (**self).set_position(handle, position)
    }

    fn set_direction(&mut self, handle: ShadowHandle, degrees: f32) {
        (**self).set_direction(handle, degrees)
    }

    fn set_distance(&mut self, handle: ShadowHandle, distance: f32) {
        (**self).set_distance(handle, distance)
    }

    fn set_cone_degree(&mut self, handle: ShadowHandle, half_angle: f32) {
        (**self).set_cone_degree(handle, half_angle)
    }

    fn set_ambient(&mut self, color: Color) {
        (**self).set_ambient(color)
    }

    fn set_diffuse(&mut self, diffuse: bool) {
        (**self).set_diffuse(diffuse)
    }

    fn set_combined_matrix(&mut self, combined: &Mat4) {
        (**self).set_combined_matrix(combined)
    }

    fn set_viewport(&mut self, rect: ScreenRect) {
        (**self).set_viewport(rect)
    }

    fn update_and_render(&mut self) {
        (**self).update_and_render()
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

/// Last parameters pushed into one shadow light.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowLightState {
    pub kind: ShadowLightKind,
    pub rays: u32,
    pub color: Color,
    pub position: Vec2,
    pub direction: f32,
    pub distance: f32,
    pub cone_degree: f32,
}

impl ShadowLightState {
    fn new(kind: ShadowLightKind, rays: u32) -> Self {
        Self {
            kind,
            rays,
            color: Color::WHITE,
            position: Vec2::ZERO,
            direction: 0.0,
            distance: 0.0,
            cone_degree: 0.0,
        }
    }
}

/// [`ShadowCaster`] that tracks every light's state and draws nothing.
///
/// Stands in for an occlusion backend when the scene has no occluders, and
/// lets callers inspect exactly what the engine reconciled.
#[derive(Debug)]
pub struct ShadowLightTable {
    lights: HashMap<ShadowHandle, ShadowLightState>,
    next_id: u32,
    pub ambient: Color,
    pub diffuse: bool,
    pub combined: Mat4,
    pub viewport: ScreenRect,
    pub frames_rendered: u64,
    pub disposed: bool,
}

impl ShadowLightTable {
    pub fn new() -> Self {
        Self {
            lights: HashMap::new(),
            next_id: 0,
            ambient: Color::CLEAR,
            diffuse: true,
            combined: Mat4::IDENTITY,
            viewport: ScreenRect::default(),
            frames_rendered: 0,
            disposed: false,
        }
    }

    pub fn get(&self, handle: ShadowHandle) -> Option<&ShadowLightState> {
        self.lights.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    fn state_mut(&mut self, handle: ShadowHandle) -> Option<&mut ShadowLightState> {
        let state = self.lights.get_mut(&handle);
        if state.is_none() {
            log::warn!("shadow light {:?} is not registered", handle);
        }
        state
    }
}

impl Default for ShadowLightTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowCaster for ShadowLightTable {
    fn create_light(&mut self, kind: ShadowLightKind, rays: u32) -> ShadowHandle {
        let handle = ShadowHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.lights.insert(handle, ShadowLightState::new(kind, rays));
        handle
    }

    fn destroy_light(&mut self, handle: ShadowHandle) {
        if self.lights.remove(&handle).is_none() {
            log::warn!("destroying unknown shadow light {:?}", handle);
        }
    }

    fn set_color(&mut self, handle: ShadowHandle, color: Color) {
        if let Some(s) = self.state_mut(handle) {
            s.color = color;
        }
    }

    fn set_position(&mut self, handle: ShadowHandle, position: Vec2) {
        if let Some(s) = self.state_mut(handle) {
            s.position = position;
        }
    }

    fn set_direction(&mut self, handle: ShadowHandle, degrees: f32) {
        if let Some(s) = self.state_mut(handle) {
            s.direction = degrees;
        }
    }

    fn set_distance(&mut self, handle: ShadowHandle, distance: f32) {
        if let Some(s) = self.state_mut(handle) {
            s.distance = distance;
        }
    }

    fn set_cone_degree(&mut self, handle: ShadowHandle, half_angle: f32) {
        if let Some(s) = self.state_mut(handle) {
            s.cone_degree = half_angle;
        }
    }

    fn set_ambient(&mut self, color: Color) {
        self.ambient = color;
    }

    fn set_diffuse(&mut self, diffuse: bool) {
        self.diffuse = diffuse;
    }

    fn set_combined_matrix(&mut self, combined: &Mat4) {
        self.combined = *combined;
    }

    fn set_viewport(&mut self, rect: ScreenRect) {
        self.viewport = rect;
    }

    fn update_and_render(&mut self) {
        self.frames_rendered += 1;
    }

    fn dispose(&mut self) {
        self.lights.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_destroyable() {
        let mut table = ShadowLightTable::new();
        let a = table.create_light(ShadowLightKind::Point, DEFAULT_RAYS);
        let b = table.create_light(ShadowLightKind::Cone, DEFAULT_RAYS);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);

        assert_eq!(b.raw(), a.raw() + 1);

        table.destroy_light(a);
        assert!(table.get(a).is_none());
        assert_eq!(table.get(b).map(|s| s.kind), Some(ShadowLightKind::Cone));
    }

    #[test]
    fn setters_on_destroyed_light_are_ignored() {
        let mut table = ShadowLightTable::new();
        let a = table.create_light(ShadowLightKind::Point, 64);
        table.destroy_light(a);
        table.set_distance(a, 9.0);
        assert!(table.is_empty());
    }

    #[test]
    fn dispose_frees_remaining_lights() {
        let mut table = ShadowLightTable::new();
        table.create_light(ShadowLightKind::Directional, DEFAULT_RAYS);
        table.create_light(ShadowLightKind::Point, DEFAULT_RAYS);
        table.dispose();
        assert!(table.is_empty());
        assert!(table.disposed);
    }
}
