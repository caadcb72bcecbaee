use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Brightness the falloff curve reaches at the light's distance is 1 / (1 + CUTOFF).
const CUTOFF: f32 = 255.0;

/// Profile used when the caller does not pick one: half linear, half quadratic.
pub const DEFAULT_PROFILE: f32 = 0.5;

/// Constant/linear/quadratic attenuation triple uploaded as `falloff[i]`.
///
/// Always derived from a distance and a profile through [`Falloff::from_distance`];
/// lights never take hand-written coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Falloff {
    /// No attenuation: the light keeps full brightness at any distance.
    pub const NONE: Self = Self {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    /// Falloff of a 30 unit light with the default profile.
    pub const DEFAULT: Self = Self {
        constant: 1.0,
        linear: CUTOFF * (1.0 - DEFAULT_PROFILE) / 30.0,
        quadratic: CUTOFF * DEFAULT_PROFILE / (30.0 * 30.0),
    };

    /// Solve the attenuation so brightness drops to about 1/256 at `distance`.
    ///
    /// `profile` blends the curve between purely linear (0.0) and purely
    /// quadratic (1.0). Values outside [0, 1] are not rejected; they yield a
    /// negative term and a curve that is the caller's problem.
    ///
    /// A non-positive `distance` returns [`Falloff::NONE`].
    pub fn from_distance(distance: f32, profile: f32) -> Self {
        if distance <= 0.0 {
            return Self::NONE;
        }

        Self {
            constant: 1.0,
            linear: CUTOFF * (1.0 - profile) / distance,
            quadratic: CUTOFF * profile / (distance * distance),
        }
    }

    pub fn from_distance_default(distance: f32) -> Self {
        Self::from_distance(distance, DEFAULT_PROFILE)
    }

    /// Brightness factor at `d` units from the light, as the fragment shader computes it.
    pub fn attenuation(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.constant, self.linear, self.quadratic)
    }
}

impl Default for Falloff {
    fn default() -> Self {
        Self::DEFAULT
    }
}
