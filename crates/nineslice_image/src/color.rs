//! Color types and the perceptual difference metric

/// `256 / 255`, the red-weight divisor of the difference metric
const DIFF_CONSTANT: f32 = 256.0 / 255.0;

/// RGBA color with f32 components (nominally 0.0 to 1.0, unclamped)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Convert to u8 array [r, g, b, a], clamping out-of-range components
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Whether any coverage is present
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    /// Component-wise multiply, used for vertex color tinting
    pub fn multiply(self, other: Color) -> Self {
        Self {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a * other.a,
        }
    }

    /// Weighted ("redmean") color distance including alpha.
    ///
    /// Red and blue weights shift with the average red level, green is
    /// weighted 4 and alpha 1. Two identical colors have distance 0, fully
    /// transparent black against opaque white is just above 3.16.
    pub fn difference(&self, other: &Color) -> f32 {
        let r = 0.5 * (self.r + other.r);
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        let da = self.a - other.a;
        ((2.0 + r / DIFF_CONSTANT) * dr * dr
            + 4.0 * dg * dg
            + (2.0 + (1.0 - r) / DIFF_CONSTANT) * db * db
            + da * da)
            .sqrt()
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self::from_rgba8(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_identical_is_zero() {
        let c = Color::new(0.3, 0.6, 0.2, 1.0);
        assert_eq!(c.difference(&c), 0.0);
    }

    #[test]
    fn test_difference_is_symmetric() {
        let a = Color::new(0.9, 0.1, 0.4, 1.0);
        let b = Color::new(0.2, 0.7, 0.5, 0.5);
        assert!((a.difference(&b) - b.difference(&a)).abs() < 1e-6);
    }

    #[test]
    fn test_transparent_to_white_exceeds_unit_threshold() {
        let d = Color::TRANSPARENT.difference(&Color::WHITE);
        assert!(d > 3.16, "distance was {d}");
        assert!(d < 3.17, "distance was {d}");
    }

    #[test]
    fn test_opaque_black_to_white_below_unit_threshold() {
        // No alpha change, so the jump stays under 3.16
        let d = Color::BLACK.difference(&Color::WHITE);
        assert!(d < 3.16, "distance was {d}");
    }

    #[test]
    fn test_rgba8_roundtrip() {
        let c = Color::from_rgba8(10, 128, 255, 0);
        assert_eq!(c.to_rgba8(), [10, 128, 255, 0]);
    }
}
