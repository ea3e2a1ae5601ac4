//! Geometric primitives for railroad diagram layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Trestle uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The main line of a railroad diagram runs along +X; branches and loops
//! extend along +Y (below) or -Y (above) of it.

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use trestle_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of this point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of this point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point's coordinates to this point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with padding added to both width and height
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Merges two sizes horizontally by adding their widths and taking the maximum height
    pub fn merge_horizontal(self, other: Size) -> Self {
        Self {
            width: self.width + other.width,
            height: self.height.max(other.height),
        }
    }

    /// Merges two sizes vertically by adding their heights and taking the maximum width
    pub fn merge_vertical(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height + other.height,
        }
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        (0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    /// Horizontal merge never shrinks either dimension of its inputs.
    fn check_merge_horizontal_contains_both(s1: Size, s2: Size) -> Result<(), TestCaseError> {
        let merged = s1.merge_horizontal(s2);

        prop_assert!(merged.width() >= s1.width() && merged.width() >= s2.width());
        prop_assert!(approx_eq!(f32, merged.height(), s1.height().max(s2.height())));
        Ok(())
    }

    /// Vertical merge is commutative.
    fn check_merge_vertical_is_commutative(s1: Size, s2: Size) -> Result<(), TestCaseError> {
        let merged1 = s1.merge_vertical(s2);
        let merged2 = s2.merge_vertical(s1);

        prop_assert!(approx_eq!(f32, merged1.width(), merged2.width()));
        prop_assert!(approx_eq!(f32, merged1.height(), merged2.height()));
        Ok(())
    }

    proptest! {
        #[test]
        fn merge_horizontal_contains_both(s1 in size_strategy(), s2 in size_strategy()) {
            check_merge_horizontal_contains_both(s1, s2)?;
        }

        #[test]
        fn merge_vertical_is_commutative(s1 in size_strategy(), s2 in size_strategy()) {
            check_merge_vertical_is_commutative(s1, s2)?;
        }
    }
}
