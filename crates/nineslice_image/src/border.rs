//! Nine-slice border insets

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};

/// Pixel insets separating the fixed edges of a bitmap from its stretchable center.
///
/// Insets are measured from the left, bottom, right and top edges. A border
/// is only meaningful relative to a bitmap size; see [`Border::validate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Border {
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
    pub top: u32,
}

impl Border {
    pub const ZERO: Border = Border {
        left: 0,
        bottom: 0,
        right: 0,
        top: 0,
    };

    pub const fn new(left: u32, bottom: u32, right: u32, top: u32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Same inset on all four sides
    pub const fn uniform(inset: u32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Insets as `[left, bottom, right, top]`
    pub fn to_array(&self) -> [u32; 4] {
        [self.left, self.bottom, self.right, self.top]
    }

    /// Check `left < width - right` and `bottom < height - top`.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        let reason = if self.left as u64 + self.right as u64 >= width as u64 {
            Some("left must be less than width - right")
        } else if self.bottom as u64 + self.top as u64 >= height as u64 {
            Some("bottom must be less than height - top")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ImageError::InvalidBorder {
                left: self.left,
                bottom: self.bottom,
                right: self.right,
                top: self.top,
                width,
                height,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Stretchable columns `[left, width - right)`; empty when the insets overlap
    pub fn center_columns(&self, width: u32) -> std::ops::Range<u32> {
        let end = width.saturating_sub(self.right);
        self.left.min(end)..end
    }

    /// Stretchable rows `[bottom, height - top)`; empty when the insets overlap
    pub fn center_rows(&self, height: u32) -> std::ops::Range<u32> {
        let end = height.saturating_sub(self.top);
        self.bottom.min(end)..end
    }
}

impl From<[u32; 4]> for Border {
    fn from(v: [u32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl std::fmt::Display for Border {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left, self.bottom, self.right, self.top
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_positive_center() {
        assert!(Border::new(4, 4, 4, 4).validate(9, 9).is_ok());
        assert!(Border::ZERO.validate(1, 1).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_center() {
        let err = Border::new(4, 0, 4, 0).validate(8, 8).unwrap_err();
        assert!(matches!(err, ImageError::InvalidBorder { .. }));
        assert!(Border::new(0, 5, 0, 3).validate(8, 8).is_err());
    }

    #[test]
    fn test_validate_does_not_overflow() {
        assert!(Border::new(u32::MAX, 0, u32::MAX, 0).validate(10, 10).is_err());
    }

    #[test]
    fn test_center_ranges() {
        let b = Border::new(2, 1, 3, 4);
        assert_eq!(b.center_columns(10), 2..7);
        assert_eq!(b.center_rows(10), 1..6);
        assert!(Border::new(6, 0, 6, 0).center_columns(10).is_empty());
    }
}
