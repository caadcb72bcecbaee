use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Linear RGBA color, components nominally in [0, 1].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    /// Hue in degrees [0, 360), saturation and value in [0, 1].
    pub fn to_hsv(self) -> [f32; 3] {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == self.r {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        [hue, saturation, max]
    }

    /// Build from hue/saturation/value, keeping `alpha`.
    pub fn from_hsv(hsv: [f32; 3], alpha: f32) -> Self {
        let [h, s, v] = hsv;
        let h = h.rem_euclid(360.0) / 60.0;
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        Self::new(r + m, g + m, b + m, alpha)
    }

    /// Rotate the hue by `degrees`, keeping saturation, value and alpha.
    pub fn shift_hue(self, degrees: f32) -> Self {
        let mut hsv = self.to_hsv();
        hsv[0] = (hsv[0] + degrees).rem_euclid(360.0);
        Self::from_hsv(hsv, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        c.to_vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn alpha_scaling_leaves_rgb_alone() {
        let c = Color::new(0.2, 0.5, 1.0, 0.5).with_alpha_scaled(4.0);
        assert_eq!(c, Color::new(0.2, 0.5, 1.0, 2.0));
    }

    #[test]
    fn hsv_round_trip() {
        let c = Color::new(1.0, 0.5, 0.2, 0.8);
        let back = Color::from_hsv(c.to_hsv(), c.a);
        assert_abs_diff_eq!(back.to_vec4(), c.to_vec4(), epsilon = 1e-5);
    }

    #[test]
    fn hue_shift_wraps_around() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let green = red.shift_hue(120.0);
        assert_abs_diff_eq!(green.to_vec4(), Vec4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-5);
        let back = green.shift_hue(-480.0);
        assert_abs_diff_eq!(back.to_vec4(), Vec4::new(1.0, 0.0, 0.0, 1.0), epsilon = 1e-5);
    }
}
