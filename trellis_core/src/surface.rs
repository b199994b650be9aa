// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface contract.
//!
//! The control tree never talks to a graphics API directly. Everything it
//! draws goes through [`Surface`], a fixed-size 2D raster with a clip
//! rectangle, and every offscreen buffer it owns comes from a
//! [`SurfaceAllocator`].
//!
//! Backends provide implementations: a GPU backend might back surfaces with
//! textures, while `trellis_render` provides a software raster.
//!
//! Geometry crosses this boundary as [`kurbo::Rect`] in surface pixel
//! coordinates (origin top-left).

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::color::Color;
use crate::geometry::{IntPoint, IntRect, IntSize};

/// How a rectangle is filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Brush {
    /// A single color.
    Solid(Color),
    /// A two-color linear gradient across the filled rectangle.
    LinearGradient {
        /// Color at the start of the gradient axis.
        start: Color,
        /// Color at the end of the gradient axis.
        end: Color,
        /// Direction of the gradient axis in degrees, clockwise from the
        /// positive x axis (0 = left to right, 90 = top to bottom).
        angle: f64,
    },
}

/// A fixed-size 2D raster target.
///
/// All drawing operations are restricted to the current clip rectangle,
/// which starts out covering the whole surface.
pub trait Surface {
    /// Pixel dimensions of the surface.
    fn size(&self) -> IntSize;

    /// Restricts subsequent drawing to `clip` (intersected with the surface).
    fn set_clip(&mut self, clip: kurbo::Rect);

    /// Replaces every pixel inside the clip with `color` (no blending).
    fn clear(&mut self, color: Color);

    /// Fills `rect` with `brush`, blending source-over.
    fn fill_rect(&mut self, rect: kurbo::Rect, brush: &Brush);

    /// Strokes a border of `width` pixels lying inside `rect`.
    fn stroke_rect(&mut self, rect: kurbo::Rect, color: Color, width: f64);

    /// Composites the `src_rect` region of `src` onto this surface with its
    /// top-left corner at `dest`, blending source-over.
    fn blit(&mut self, src: &dyn Surface, src_rect: IntRect, dest: IntPoint);

    /// Returns `self` for downcasting inside [`blit`](Self::blit)
    /// implementations.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

/// Creates and disposes backing surfaces.
///
/// Every surface the tree allocates is eventually handed back to
/// [`release`](Self::release), either when its control is destroyed or when a
/// resize replaces it.
pub trait SurfaceAllocator {
    /// Allocates a surface of exactly `size` pixels (negative dimensions are
    /// clamped to zero by the caller).
    fn allocate(&mut self, size: IntSize) -> Box<dyn Surface>;

    /// Disposes a surface previously returned by [`allocate`](Self::allocate).
    fn release(&mut self, surface: Box<dyn Surface>) {
        drop(surface);
    }
}

/// A control's relationship to its drawing target.
///
/// Most controls draw into the nearest ancestor's surface. Direct children of
/// the root always own one; scroll panels manage theirs independently of their
/// bounds.
#[derive(Default)]
pub enum Backing {
    /// Draws into the surface inherited from an ancestor.
    #[default]
    Inherited,
    /// Owns a surface that tracks the control's bounds size.
    Owned(Box<dyn Surface>),
    /// Owns a surface whose size the control manages itself.
    SelfManaged(Box<dyn Surface>),
}

impl Backing {
    /// Returns the owned surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&dyn Surface> {
        match self {
            Self::Inherited => None,
            Self::Owned(s) | Self::SelfManaged(s) => Some(&**s),
        }
    }

    /// Returns the owned surface mutably, if any.
    pub fn surface_mut(&mut self) -> Option<&mut (dyn Surface + 'static)> {
        match self {
            Self::Inherited => None,
            Self::Owned(s) | Self::SelfManaged(s) => Some(&mut **s),
        }
    }

    /// Returns `true` unless the backing is [`Inherited`](Self::Inherited).
    #[must_use]
    pub fn is_owned(&self) -> bool {
        !matches!(self, Self::Inherited)
    }

    /// Takes the surface out, leaving [`Inherited`](Self::Inherited).
    pub fn take_surface(&mut self) -> Option<Box<dyn Surface>> {
        match core::mem::take(self) {
            Self::Inherited => None,
            Self::Owned(s) | Self::SelfManaged(s) => Some(s),
        }
    }
}

impl fmt::Debug for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherited => f.write_str("Inherited"),
            Self::Owned(s) => write!(f, "Owned({:?})", s.size()),
            Self::SelfManaged(s) => write!(f, "SelfManaged({:?})", s.size()),
        }
    }
}
