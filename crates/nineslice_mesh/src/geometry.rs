//! Geometric primitives

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Relative float comparison with an absolute floor near zero
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A 2D point or vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unclamped linear interpolation
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }

    /// Component-wise product
    pub fn scale(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// An axis-aligned rectangle with its origin at the bottom-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn x_min(&self) -> f32 {
        self.x
    }

    pub fn y_min(&self) -> f32 {
        self.y
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rect covers no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x_max()
            && point.y >= self.y
            && point.y <= self.y_max()
    }

    /// Shrink to `aspect_size`'s aspect ratio, aligning the leftover space by `pivot`
    pub fn fit_aspect(self, aspect_size: Vec2, pivot: Vec2) -> Rect {
        let mut rect = self;
        let sprite_ratio = aspect_size.x / aspect_size.y;
        let rect_ratio = rect.width / rect.height;

        if sprite_ratio > rect_ratio {
            let old_height = rect.height;
            rect.height = rect.width / sprite_ratio;
            rect.y += (old_height - rect.height) * pivot.y;
        } else {
            let old_width = rect.width;
            rect.width = rect.height * sprite_ratio;
            rect.x += (old_width - rect.width) * pivot.x;
        }
        rect
    }
}

/// A texture-space rectangle given by its min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl UvRect {
    /// The whole texture
    pub const FULL: UvRect = UvRect {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };

    pub const fn new(u_min: f32, v_min: f32, u_max: f32, v_max: f32) -> Self {
        Self {
            u_min,
            v_min,
            u_max,
            v_max,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.u_min, self.v_min)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.u_max, self.v_max)
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-7));
        assert!(approx_eq(0.0, 1e-7));
        assert!(!approx_eq(1.0, 1.001));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.x_max(), 40.0);
        assert_eq!(r.y_max(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
        assert!(r.contains(Vec2::new(40.0, 60.0)));
        assert!(!r.contains(Vec2::new(41.0, 60.0)));
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_fit_aspect_letterboxes_by_pivot() {
        // 2:1 sprite in a square rect, centered vertically
        let fitted = Rect::new(0.0, 0.0, 100.0, 100.0)
            .fit_aspect(Vec2::new(20.0, 10.0), Vec2::new(0.5, 0.5));
        assert_eq!(fitted, Rect::new(0.0, 25.0, 100.0, 50.0));

        // 1:2 sprite, aligned right
        let fitted = Rect::new(0.0, 0.0, 100.0, 100.0)
            .fit_aspect(Vec2::new(10.0, 20.0), Vec2::new(1.0, 0.0));
        assert_eq!(fitted, Rect::new(50.0, 0.0, 50.0, 100.0));
    }
}
