//! Math utilities and types
//!
//! Colour values and the matrix alias used for texture coordinate transforms.

use serde::{Deserialize, Serialize};

pub use nalgebra::Matrix4;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// RGBA colour with floating point channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourValue {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl ColourValue {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a colour from all four channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// True when the colour channels are zero; alpha is ignored
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Default for ColourValue {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Rotation about the texture origin, expressed as a 4x4 matrix around z
pub fn rotation_z(radians: f32) -> Mat4 {
    let (sin, cos) = radians.sin_cos();
    let mut m = Mat4::identity();
    m[(0, 0)] = cos;
    m[(0, 1)] = -sin;
    m[(1, 0)] = sin;
    m[(1, 1)] = cos;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_black_ignores_alpha() {
        assert!(ColourValue::new(0.0, 0.0, 0.0, 0.5).is_black());
        assert!(!ColourValue::rgb(0.0, 0.1, 0.0).is_black());
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let m = rotation_z(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(m[(0, 0)], 0.0, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 0)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[(0, 1)], -1.0, epsilon = 1e-6);
    }
}
