//! Fill boundary generation
//!
//! A partially filled image is the base mesh clipped by a small set of
//! half-planes. Linear fills need one cut line, radial fills find the point
//! where the swept ray leaves the rect and cut along that ray. `Radial360`
//! past the halfway point is emitted as two polygons, a full half and a
//! `Radial180` sweep over the other half.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{MeshError, Result};
use crate::geometry::{approx_eq, lerp, Rect, Vec2};

/// Cut lines for one polygon pass
pub type CutLines = SmallVec<[CutLine; 4]>;

/// Partial-reveal method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Not filled
    #[default]
    None,
    Horizontal,
    Vertical,
    Radial90,
    Radial180,
    Radial360,
    /// Delegated to a [`CustomFill`] strategy
    Custom,
}

/// Fill configuration.
///
/// `origin` selects the edge or corner the fill grows from:
/// - `Horizontal`/`Vertical`: `origin & 1`, 0 = left/bottom, 1 = right/top
/// - `Radial90`: corners 0..3 = bottom-left, top-left, top-right, bottom-right
/// - `Radial180`/`Radial360`: sides 0..3 = bottom, left, top, right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillSpec {
    pub method: FillMethod,
    pub origin: u8,
    pub clockwise: bool,
    pub amount: f32,
}

impl Default for FillSpec {
    fn default() -> Self {
        Self {
            method: FillMethod::None,
            origin: 0,
            clockwise: true,
            amount: 1.0,
        }
    }
}

impl FillSpec {
    pub fn new(method: FillMethod, origin: u8, clockwise: bool, amount: f32) -> Self {
        Self {
            method,
            origin,
            clockwise,
            amount,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.method != FillMethod::None
    }

    /// Amount clamped to `[0, 1]`; NaN reads as empty
    pub fn clamped_amount(&self) -> f32 {
        if self.amount.is_nan() {
            0.0
        } else {
            self.amount.clamp(0.0, 1.0)
        }
    }

    fn is_complete(&self) -> bool {
        approx_eq(self.clamped_amount(), 1.0)
    }
}

/// Half-plane `{p : dot(normal, p - start) >= 0}`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CutLine {
    pub start: Vec2,
    pub normal: Vec2,
}

impl CutLine {
    pub const fn new(start: Vec2, normal: Vec2) -> Self {
        Self { start, normal }
    }

    /// Line through `start` and `end` keeping the right-hand side of the direction
    pub fn from_line(start: Vec2, end: Vec2) -> Self {
        let d = end - start;
        Self::new(start, Vec2::new(d.y, -d.x))
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        self.normal.dot(point - self.start)
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.signed_distance(point) >= 0.0
    }
}

/// Host-defined wipe shapes.
///
/// The generator asks for the polygon count, then for each polygon the
/// number of cut lines, and hands a slice of exactly that length to
/// [`CustomFill::fill_cut_lines`].
pub trait CustomFill {
    fn polygon_count(&self, amount: f32) -> usize;

    fn cut_line_count(&self, polygon: usize, amount: f32) -> usize;

    fn fill_cut_lines(&self, cut_lines: &mut [CutLine], amount: f32, rect: Rect, polygon: usize);
}

/// Number of polygon passes the fill needs; 0 means nothing is visible
pub fn polygon_count(spec: &FillSpec, custom: Option<&dyn CustomFill>) -> Result<usize> {
    let amount = spec.clamped_amount();
    Ok(match spec.method {
        FillMethod::None => 1,
        FillMethod::Custom => custom
            .ok_or(MeshError::MissingCustomFill)?
            .polygon_count(amount),
        _ if amount <= 0.0 => 0,
        FillMethod::Radial360 if amount > 0.5 && !spec.is_complete() => 2,
        _ => 1,
    })
}

/// Number of fill cut lines applied to `polygon` (tile cuts not included)
pub fn cut_line_count(
    spec: &FillSpec,
    polygon: usize,
    custom: Option<&dyn CustomFill>,
) -> Result<usize> {
    let amount = spec.clamped_amount();
    Ok(match spec.method {
        FillMethod::None => 0,
        FillMethod::Custom => custom
            .ok_or(MeshError::MissingCustomFill)?
            .cut_line_count(polygon, amount),
        _ if spec.is_complete() => 0,
        FillMethod::Radial360 if polygon == 0 && amount >= 0.5 => 1,
        FillMethod::Radial360 => 2,
        _ => 1,
    })
}

/// Append the fill cut lines of `polygon` over `rect` to `out`
pub fn fill_cut_lines(
    spec: &FillSpec,
    rect: Rect,
    polygon: usize,
    custom: Option<&dyn CustomFill>,
    out: &mut CutLines,
) -> Result<()> {
    let amount = spec.clamped_amount();
    match spec.method {
        FillMethod::None => {}
        FillMethod::Custom => {
            let custom = custom.ok_or(MeshError::MissingCustomFill)?;
            let count = custom.cut_line_count(polygon, amount);
            let first = out.len();
            out.resize(first + count, CutLine::default());
            custom.fill_cut_lines(&mut out[first..], amount, rect, polygon);
        }
        _ if spec.is_complete() => {}
        FillMethod::Horizontal => out.push(horizontal(rect, spec.origin, amount)),
        FillMethod::Vertical => out.push(vertical(rect, spec.origin, amount)),
        FillMethod::Radial90 => out.push(radial90(rect, spec.origin, amount, spec.clockwise)),
        FillMethod::Radial180 => out.push(radial180(rect, spec.origin, amount, spec.clockwise)),
        FillMethod::Radial360 => radial360(rect, polygon, spec.origin, amount, spec.clockwise, out),
    }
    Ok(())
}

/// Cut lines trimming overshooting tiles at the right and top edges of `rect`
pub fn tile_cut_lines(rect: Rect, cut_right: bool, cut_top: bool, out: &mut CutLines) {
    if cut_right {
        out.push(CutLine::from_line(
            Vec2::new(rect.x_max(), rect.y_max()),
            Vec2::new(rect.x_max(), rect.y_min()),
        ));
    }
    if cut_top {
        out.push(CutLine::from_line(
            Vec2::new(rect.x_min(), rect.y_max()),
            Vec2::new(rect.x_max(), rect.y_max()),
        ));
    }
}

fn horizontal(rect: Rect, origin: u8, amount: f32) -> CutLine {
    let mut fill_x = rect.width * amount;
    let mut normal = Vec2::LEFT;
    if origin & 1 == 1 {
        fill_x = rect.width - fill_x;
        normal = Vec2::RIGHT;
    }
    CutLine::new(Vec2::new(rect.x + fill_x, 0.0), normal)
}

fn vertical(rect: Rect, origin: u8, amount: f32) -> CutLine {
    let mut fill_y = rect.height * amount;
    let mut normal = Vec2::DOWN;
    if origin & 1 == 1 {
        fill_y = rect.height - fill_y;
        normal = Vec2::UP;
    }
    CutLine::new(Vec2::new(0.0, rect.y + fill_y), normal)
}

/// Ray from a corner swept by `amount` of a quarter turn
fn radial90(rect: Rect, corner: u8, amount: f32, clockwise: bool) -> CutLine {
    let corners = [
        rect.position(),
        Vec2::new(rect.x_min(), rect.y_max()),
        Vec2::new(rect.x_max(), rect.y_max()),
        Vec2::new(rect.x_max(), rect.y_min()),
    ];
    let corner = (corner & 3) as usize;
    let center = corners[corner];
    let far = corners[(corner + 2) % 4];

    let mut fill = if corner & 1 == 1 { 1.0 - amount } else { amount };
    if clockwise {
        fill = 1.0 - fill;
    }
    let exit = radial_exit(center, far, fill);
    if clockwise {
        CutLine::from_line(exit, center)
    } else {
        CutLine::from_line(center, exit)
    }
}

/// Where a ray from `center`, rotated `fill` of a quarter turn away from the
/// horizontal, leaves the rect spanned by `center` and `far`
fn radial_exit(center: Vec2, far: Vec2, fill: f32) -> Vec2 {
    let angle = fill * std::f32::consts::FRAC_PI_2;
    let (sin, cos) = angle.sin_cos();

    if cos > sin {
        Vec2::new(far.x, lerp(center.y, far.y, sin / cos))
    } else if sin > cos {
        Vec2::new(lerp(center.x, far.x, cos / sin), far.y)
    } else {
        far
    }
}

/// Half-turn sweep around the midpoint of `side`, reduced to a quarter
/// sweep over the active half
fn radial180(rect: Rect, side: u8, amount: f32, clockwise: bool) -> CutLine {
    let side = side & 3;
    let first_half = amount <= 0.5;
    let fill = amount * 2.0 - if first_half { 0.0 } else { 1.0 };

    let (half_size, half_shift) = if side & 1 == 0 {
        (
            Vec2::new(rect.width * 0.5, rect.height),
            Vec2::new(rect.width * 0.5, 0.0),
        )
    } else {
        (
            Vec2::new(rect.width, rect.height * 0.5),
            Vec2::new(0.0, rect.height * 0.5),
        )
    };

    let sweeping_forward = first_half != clockwise;
    let far_half = match side {
        0 | 3 => sweeping_forward,
        _ => !sweeping_forward,
    };

    let (half, corner) = if far_half {
        let corner = match side {
            2 => 1,
            3 => 3,
            _ => 0,
        };
        (
            Rect::from_position_size(rect.position() + half_shift, half_size),
            corner,
        )
    } else {
        let corner = match side {
            0 => 3,
            1 => 1,
            _ => 2,
        };
        (Rect::from_position_size(rect.position(), half_size), corner)
    };
    radial90(half, corner, fill, clockwise)
}

/// Full-turn sweep around the rect center. Pushes the half divider followed
/// by the radial ray, or only the divider for a completely filled half.
fn radial360(rect: Rect, polygon: usize, side: u8, amount: f32, clockwise: bool, out: &mut CutLines) {
    if polygon > 0 && amount <= 0.5 {
        return;
    }
    let side = side & 3;
    let first_half = polygon == 0;
    let fill = amount * 2.0 - if first_half { 0.0 } else { 1.0 };
    let sweeping_forward = first_half != clockwise;

    let (half, half_side, divider) = if side & 1 == 0 {
        let half_size = Vec2::new(rect.width * 0.5, rect.height);
        let far_half = match side {
            0 => sweeping_forward,
            _ => !sweeping_forward,
        };
        if far_half {
            (
                Rect::from_position_size(rect.position() + Vec2::new(half_size.x, 0.0), half_size),
                1,
                CutLine::new(rect.center(), Vec2::RIGHT),
            )
        } else {
            (
                Rect::from_position_size(rect.position(), half_size),
                3,
                CutLine::new(rect.center(), Vec2::LEFT),
            )
        }
    } else {
        let half_size = Vec2::new(rect.width, rect.height * 0.5);
        let far_half = match side {
            1 => sweeping_forward,
            _ => !sweeping_forward,
        };
        if far_half {
            (
                Rect::from_position_size(rect.position() + Vec2::new(0.0, half_size.y), half_size),
                0,
                CutLine::new(rect.center(), Vec2::UP),
            )
        } else {
            (
                Rect::from_position_size(rect.position(), half_size),
                2,
                CutLine::new(rect.center(), Vec2::DOWN),
            )
        }
    };

    out.push(divider);
    if first_half && amount >= 0.5 {
        return;
    }
    out.push(radial180(half, half_side, fill, clockwise));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 50.0)
    }

    fn lines(spec: FillSpec, polygon: usize) -> CutLines {
        let mut out = CutLines::new();
        fill_cut_lines(&spec, rect(), polygon, None, &mut out).unwrap();
        out
    }

    #[test]
    fn test_from_line_keeps_right_side() {
        let line = CutLine::from_line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert!(line.contains(Vec2::new(1.0, 5.0)));
        assert!(!line.contains(Vec2::new(-1.0, 5.0)));
        assert!(line.contains(Vec2::new(0.0, 3.0)));
    }

    #[test]
    fn test_horizontal_from_left_and_right() {
        let cut = lines(FillSpec::new(FillMethod::Horizontal, 0, false, 0.25), 0);
        assert_eq!(cut.len(), 1);
        assert!(cut[0].contains(Vec2::new(20.0, 10.0)));
        assert!(!cut[0].contains(Vec2::new(30.0, 10.0)));

        let cut = lines(FillSpec::new(FillMethod::Horizontal, 1, false, 0.25), 0);
        assert!(cut[0].contains(Vec2::new(80.0, 10.0)));
        assert!(!cut[0].contains(Vec2::new(70.0, 10.0)));
    }

    #[test]
    fn test_vertical_from_top() {
        let cut = lines(FillSpec::new(FillMethod::Vertical, 1, false, 0.5), 0);
        assert!(cut[0].contains(Vec2::new(5.0, 30.0)));
        assert!(!cut[0].contains(Vec2::new(5.0, 20.0)));
    }

    #[test]
    fn test_radial90_counter_clockwise_from_bottom_left() {
        let cut = lines(FillSpec::new(FillMethod::Radial90, 0, false, 0.25), 0);
        assert_eq!(cut.len(), 1);
        assert!(cut[0].contains(Vec2::new(90.0, 5.0)));
        assert!(!cut[0].contains(Vec2::new(10.0, 40.0)));
    }

    #[test]
    fn test_radial90_clockwise_from_bottom_left() {
        let cut = lines(FillSpec::new(FillMethod::Radial90, 0, true, 0.25), 0);
        assert!(cut[0].contains(Vec2::new(5.0, 45.0)));
        assert!(!cut[0].contains(Vec2::new(90.0, 5.0)));
    }

    #[test]
    fn test_complete_fill_has_no_cut_lines() {
        for method in [
            FillMethod::Horizontal,
            FillMethod::Vertical,
            FillMethod::Radial90,
            FillMethod::Radial180,
            FillMethod::Radial360,
        ] {
            let spec = FillSpec::new(method, 0, true, 1.0);
            assert!(lines(spec, 0).is_empty());
            assert_eq!(cut_line_count(&spec, 0, None).unwrap(), 0);
            assert_eq!(polygon_count(&spec, None).unwrap(), 1);
        }
    }

    #[test]
    fn test_zero_amount_has_no_polygons() {
        let spec = FillSpec::new(FillMethod::Radial180, 0, true, 0.0);
        assert_eq!(polygon_count(&spec, None).unwrap(), 0);
        let spec = FillSpec::new(FillMethod::Horizontal, 0, true, -3.0);
        assert_eq!(polygon_count(&spec, None).unwrap(), 0);
    }

    #[test]
    fn test_radial360_polygons() {
        let below = FillSpec::new(FillMethod::Radial360, 0, true, 0.4);
        assert_eq!(polygon_count(&below, None).unwrap(), 1);
        assert_eq!(cut_line_count(&below, 0, None).unwrap(), 2);
        assert_eq!(lines(below, 0).len(), 2);

        let half = FillSpec::new(FillMethod::Radial360, 0, true, 0.5);
        assert_eq!(polygon_count(&half, None).unwrap(), 1);
        let divider = lines(half, 0);
        assert_eq!(divider.len(), 1);
        // Clockwise from the bottom fills the left half first
        assert!(divider[0].contains(Vec2::new(10.0, 25.0)));
        assert!(!divider[0].contains(Vec2::new(90.0, 25.0)));

        let above = FillSpec::new(FillMethod::Radial360, 0, true, 0.75);
        assert_eq!(polygon_count(&above, None).unwrap(), 2);
        assert_eq!(lines(above, 0).len(), 1);
        let second = lines(above, 1);
        assert_eq!(second.len(), 2);
        assert!(second[0].contains(Vec2::new(90.0, 25.0)));
        assert!(!second[0].contains(Vec2::new(10.0, 25.0)));
    }

    #[test]
    fn test_tile_cut_lines() {
        let mut out = CutLines::new();
        tile_cut_lines(rect(), true, true, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out[0].contains(Vec2::new(99.0, 10.0)));
        assert!(!out[0].contains(Vec2::new(101.0, 10.0)));
        assert!(out[1].contains(Vec2::new(10.0, 49.0)));
        assert!(!out[1].contains(Vec2::new(10.0, 51.0)));
    }

    #[test]
    fn test_custom_without_strategy() {
        let spec = FillSpec::new(FillMethod::Custom, 0, true, 0.5);
        assert!(matches!(
            polygon_count(&spec, None),
            Err(MeshError::MissingCustomFill)
        ));
    }
}
