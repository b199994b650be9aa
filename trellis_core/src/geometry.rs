// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer box-model geometry.
//!
//! Control geometry is constrained to whole pixels. [`IntRect`] is the
//! rectangle type used for bounds, client areas and clip regions; it converts
//! to [`kurbo::Rect`] only at the drawing-surface boundary.
//!
//! [`Insets`] describes the four edges of a margin or padding. The box model
//! of a control, outside in, is:
//!
//! ```text
//!   bounds ─► margin ─► border (border_width) ─► padding ─► client area
//! ```

use core::fmt;

/// A point in integer pixel coordinates.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl IntPoint {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the point offset by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Debug for IntPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A size in integer pixels.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl IntSize {
    /// An empty size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the size with negative dimensions clamped to zero.
    #[inline]
    #[must_use]
    pub const fn clamped(self) -> Self {
        Self {
            width: if self.width < 0 { 0 } else { self.width },
            height: if self.height < 0 { 0 } else { self.height },
        }
    }

    /// Returns `true` if either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Debug for IntSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle in integer pixels.
///
/// Stored as origin plus size. [`right`](Self::right) and
/// [`bottom`](Self::bottom) are exclusive edges (`x + width`, `y + height`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl IntRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a rectangle from origin and size components.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from an origin point and a size.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: IntPoint, size: IntSize) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Creates a rectangle from its edges, clamping inverted edges to an
    /// empty rectangle.
    #[inline]
    #[must_use]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = if right > left { right - left } else { 0 };
        let height = if bottom > top { bottom - top } else { 0 };
        Self::new(left, top, width, height)
    }

    /// Left edge.
    #[inline]
    #[must_use]
    pub const fn left(self) -> i32 {
        self.x
    }

    /// Top edge.
    #[inline]
    #[must_use]
    pub const fn top(self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Origin of the rectangle.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> IntPoint {
        IntPoint::new(self.x, self.y)
    }

    /// Size of the rectangle.
    #[inline]
    #[must_use]
    pub const fn size(self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// Returns `true` if the rectangle has no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the rectangle with negative dimensions clamped to zero.
    #[inline]
    #[must_use]
    pub const fn clamped(self) -> Self {
        let size = self.size().clamped();
        Self::new(self.x, self.y, size.width, size.height)
    }

    /// Returns `true` if `p` lies within the rectangle, treating the right and
    /// bottom edges as inside.
    ///
    /// This is the hit-test containment rule: a point on the far edge of a
    /// control still hits it.
    #[inline]
    #[must_use]
    pub const fn contains_inclusive(self, p: IntPoint) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[inline]
    #[must_use]
    pub const fn contains_rect(self, other: Self) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the intersection of two rectangles.
    ///
    /// Disjoint rectangles produce an empty rectangle anchored at the
    /// intersection's top-left; width and height are never negative.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::from_edges(left, top, right, bottom)
    }

    /// Returns the smallest rectangle containing both rectangles.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::from_edges(left, top, right, bottom)
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Returns the rectangle shrunk by `insets` on each side, clamped to an
    /// empty rectangle.
    #[must_use]
    pub const fn inset(self, insets: Insets) -> Self {
        Self::from_edges(
            self.left() + insets.left,
            self.top() + insets.top,
            self.right() - insets.right,
            self.bottom() - insets.bottom,
        )
    }

    /// Converts to a floating-point [`kurbo::Rect`].
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.left()),
            f64::from(self.top()),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

impl fmt::Debug for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntRect({}, {} {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Edge thicknesses for margins and padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

/// Space outside a control's border.
pub type Margin = Insets;

/// Space between a control's border and its client area.
pub type Padding = Insets;

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0);

    /// Creates insets with individual edge values.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates insets with the same value on every edge.
    #[inline]
    #[must_use]
    pub const fn uniform(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Sum of the left and right edges.
    #[inline]
    #[must_use]
    pub const fn total_width(self) -> i32 {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[inline]
    #[must_use]
    pub const fn total_height(self) -> i32 {
        self.top + self.bottom
    }
}
