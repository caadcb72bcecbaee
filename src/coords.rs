//! Conversions between the caller's world/angle conventions and what the
//! lighting shader consumes.

use glam::{Vec2, Vec3};

use crate::camera::{Camera2d, Viewport};

/// Z component used for directional lights when the caller gives no elevation.
pub const DEFAULT_ELEVATION: f32 = 1.0;

/// Heading in degrees (0 = +X, counter-clockwise) plus an out-of-plane
/// `elevation` scalar, normalized into a 3D light direction.
///
/// The elevation fakes a light that sits above the sprite plane so flat
/// normals still receive some light.
pub fn degrees_to_direction(angle_degrees: f32, elevation: f32) -> Vec3 {
    let rad = angle_degrees.to_radians();
    Vec3::new(rad.cos(), rad.sin(), elevation).normalize()
}

/// Inverse of the heading part of [`degrees_to_direction`].
pub fn direction_to_degrees(direction: Vec3) -> f32 {
    direction.y.atan2(direction.x).to_degrees()
}

/// World position to the [0, 1] space of the viewport's screen rectangle.
///
/// Normalizes against the viewport rect, not the window: with letterboxing the
/// two differ and lights would drift off their sprites.
pub fn world_to_shader_space(world: Vec2, camera: &Camera2d, viewport: &Viewport) -> Vec3 {
    let screen = camera.project(world, viewport);
    let rect = viewport.screen();
    let normalized = (screen - rect.offset()) / rect.size();
    normalized.extend(0.0)
}

/// Maps a normalized viewport-space position back onto the world plane.
pub fn shader_space_to_world(normalized: Vec3, camera: &Camera2d, viewport: &Viewport) -> Vec2 {
    let rect = viewport.screen();
    let screen = rect.offset() + Vec2::new(normalized.x, normalized.y) * rect.size();
    camera.unproject(screen, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Scaling;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_heading_without_elevation_points_along_x() {
        let d = degrees_to_direction(0.0, 0.0);
        assert_abs_diff_eq!(d, Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn direction_is_always_unit_length() {
        for elevation in [0.0, DEFAULT_ELEVATION, 40.0, -3.0] {
            let mut angle = -720.0;
            while angle <= 720.0 {
                let d = degrees_to_direction(angle, elevation);
                assert_abs_diff_eq!(d.length(), 1.0, epsilon = 1e-5);
                angle += 7.5;
            }
        }
    }

    #[test]
    fn heading_survives_round_trip() {
        let d = degrees_to_direction(135.0, DEFAULT_ELEVATION);
        assert_abs_diff_eq!(direction_to_degrees(d), 135.0, epsilon = 1e-4);
        let d = degrees_to_direction(-45.0, 0.0);
        assert_abs_diff_eq!(direction_to_degrees(d), -45.0, epsilon = 1e-4);
    }

    #[test]
    fn letterboxed_viewport_normalizes_against_its_own_rect() {
        let mut vp = Viewport::new(Scaling::Fit, 20.0, 10.0);
        vp.update(800, 800);
        let cam = Camera2d::new(20.0, 10.0);

        // World corners land on the viewport corners, not the window corners.
        let bottom_left = world_to_shader_space(Vec2::ZERO, &cam, &vp);
        let top_right = world_to_shader_space(Vec2::new(20.0, 10.0), &cam, &vp);
        assert_abs_diff_eq!(bottom_left, Vec3::ZERO, epsilon = 1e-5);
        assert_abs_diff_eq!(top_right, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn shader_space_round_trip_reconstructs_world_point() {
        let mut vp = Viewport::new(Scaling::Fit, 19.0, 19.0);
        vp.update(1280, 720);
        let mut cam = Camera2d::new(19.0, 19.0);
        cam.position = Vec2::new(6.0, 4.0);
        cam.zoom = 1.3;

        for &(x, y) in &[(6.0, 6.0), (0.5, 0.25), (12.0, -2.5), (-3.0, 9.0)] {
            let p = Vec2::new(x, y);
            let n = world_to_shader_space(p, &cam, &vp);
            let back = shader_space_to_world(n, &cam, &vp);
            assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-4);
            assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn normalized_point_round_trip() {
        let mut vp = Viewport::new(Scaling::Extend, 16.0, 9.0);
        vp.update(1920, 1200);
        let mut cam = Camera2d::new(16.0, 9.0);
        cam.fit_to(&vp);

        let n = Vec3::new(0.3, 0.8, 0.0);
        let world = shader_space_to_world(n, &cam, &vp);
        let again = world_to_shader_space(world, &cam, &vp);
        assert_abs_diff_eq!(again, n, epsilon = 1e-4);
    }
}
