// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software raster surface.

use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Vec2};
use trellis_core::color::Color;
use trellis_core::geometry::{IntPoint, IntRect, IntSize};
use trellis_core::surface::{Brush, Surface};

/// An RGBA surface held in memory.
///
/// A pixel is covered by a shape when its center lies inside it, so
/// rectangles with integral edges cover exactly the pixels they span.
/// Drawing blends source-over except [`clear`](Surface::clear), which
/// replaces.
pub struct PixelSurface {
    size: IntSize,
    pixels: Vec<Color>,
    clip: IntRect,
}

impl PixelSurface {
    /// Creates a transparent surface. Negative dimensions are clamped to
    /// zero.
    #[must_use]
    pub fn new(size: IntSize) -> Self {
        let size = size.clamped();
        Self {
            size,
            pixels: vec![Color::TRANSPARENT; area(size)],
            clip: full_rect(size),
        }
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// All pixels, row by row from the top-left corner.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// The current clip rectangle.
    #[must_use]
    pub fn clip(&self) -> IntRect {
        self.clip
    }

    /// Packs the pixels as `RGBA8` bytes.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.width || y >= self.size.height {
            return None;
        }
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let width = usize::try_from(self.size.width).ok()?;
        Some(y * width + x)
    }

    /// Blends `color` over the pixel at `(x, y)` if it lies inside the clip.
    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if !contains(self.clip, x, y) {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Pixels of `rect` that are inside the clip.
    fn covered(&self, rect: kurbo::Rect) -> IntRect {
        pixel_span(rect).intersect(self.clip)
    }
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSurface")
            .field("size", &self.size)
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> IntSize {
        self.size
    }

    fn set_clip(&mut self, clip: kurbo::Rect) {
        self.clip = pixel_span(clip).intersect(full_rect(self.size));
    }

    fn clear(&mut self, color: Color) {
        let clip = self.clip;
        for y in clip.top()..clip.bottom() {
            for x in clip.left()..clip.right() {
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color;
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, brush: &Brush) {
        let span = self.covered(rect);
        match *brush {
            Brush::Solid(color) => {
                for y in span.top()..span.bottom() {
                    for x in span.left()..span.right() {
                        self.blend(x, y, color);
                    }
                }
            }
            Brush::LinearGradient { start, end, angle } => {
                let axis = GradientAxis::new(rect.abs(), angle);
                for y in span.top()..span.bottom() {
                    for x in span.left()..span.right() {
                        let color = start.lerp(end, axis.t(x, y));
                        self.blend(x, y, color);
                    }
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: kurbo::Rect, color: Color, width: f64) {
        if width <= 0.0 {
            return;
        }
        let outer = pixel_span(rect);
        let hole = rect.abs().inset(-width);
        let inner = if hole.x0 < hole.x1 && hole.y0 < hole.y1 {
            pixel_span(hole)
        } else {
            IntRect::ZERO
        };
        let span = outer.intersect(self.clip);
        for y in span.top()..span.bottom() {
            for x in span.left()..span.right() {
                if !contains(inner, x, y) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn blit(&mut self, src: &dyn Surface, src_rect: IntRect, dest: IntPoint) {
        let Some(src) = src.as_any().downcast_ref::<Self>() else {
            return;
        };
        let from = src_rect.intersect(full_rect(src.size));
        let dx = dest.x - src_rect.x;
        let dy = dest.y - src_rect.y;
        for y in from.top()..from.bottom() {
            for x in from.left()..from.right() {
                if let Some(color) = src.pixel(x, y) {
                    self.blend(x + dx, y + dy, color);
                }
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Maps pixel centers to gradient positions.
struct GradientAxis {
    center: Point,
    dir: Vec2,
    length: f64,
}

impl GradientAxis {
    fn new(rect: kurbo::Rect, angle: f64) -> Self {
        let dir = Vec2::from_angle(angle.to_radians());
        let length = rect.width() * dir.x.abs() + rect.height() * dir.y.abs();
        Self {
            center: rect.center(),
            dir,
            length,
        }
    }

    /// Position of pixel `(x, y)` along the axis, 0 at the start edge and 1
    /// at the end edge.
    fn t(&self, x: i32, y: i32) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        0.5 + (p - self.center).dot(self.dir) / self.length
    }
}

fn area(size: IntSize) -> usize {
    let w = usize::try_from(size.width).unwrap_or(0);
    let h = usize::try_from(size.height).unwrap_or(0);
    w * h
}

fn full_rect(size: IntSize) -> IntRect {
    IntRect::from_origin_size(IntPoint::ZERO, size)
}

fn contains(r: IntRect, x: i32, y: i32) -> bool {
    x >= r.left() && x < r.right() && y >= r.top() && y < r.bottom()
}

/// Pixels whose centers lie inside `rect`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "edges are rounded and saturate at the i32 range"
)]
fn pixel_span(rect: kurbo::Rect) -> IntRect {
    let r = rect.abs().round();
    IntRect::from_edges(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb8(255, 0, 0);
    const BLUE: Color = Color::rgb8(0, 0, 255);

    fn rect(x: i32, y: i32, w: i32, h: i32) -> kurbo::Rect {
        IntRect::new(x, y, w, h).to_kurbo()
    }

    fn count(s: &PixelSurface, color: Color) -> usize {
        s.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn fill_covers_exact_pixels() {
        let mut s = PixelSurface::new(IntSize::new(10, 10));
        s.fill_rect(rect(2, 3, 4, 5), &Brush::Solid(RED));
        assert_eq!(count(&s, RED), 20, "4x5 pixels");
        assert_eq!(s.pixel(2, 3), Some(RED), "top-left inside");
        assert_eq!(s.pixel(6, 3), Some(Color::TRANSPARENT), "right edge exclusive");
    }

    #[test]
    fn clip_limits_drawing() {
        let mut s = PixelSurface::new(IntSize::new(10, 10));
        s.set_clip(rect(0, 0, 5, 5));
        s.fill_rect(rect(0, 0, 10, 10), &Brush::Solid(RED));
        assert_eq!(count(&s, RED), 25, "only the clip");
        s.clear(BLUE);
        assert_eq!(count(&s, BLUE), 25, "clear respects the clip too");
        assert_eq!(s.pixel(9, 9), Some(Color::TRANSPARENT));
    }

    #[test]
    fn clip_is_bounded_by_surface() {
        let mut s = PixelSurface::new(IntSize::new(10, 10));
        s.set_clip(rect(-5, -5, 100, 100));
        assert_eq!(s.clip(), IntRect::new(0, 0, 10, 10));
    }

    #[test]
    fn stroke_stays_inside_rect() {
        let mut s = PixelSurface::new(IntSize::new(10, 10));
        s.stroke_rect(rect(0, 0, 10, 10), RED, 2.0);
        assert_eq!(count(&s, RED), 100 - 36, "2px ring around a 6x6 hole");
        assert_eq!(s.pixel(1, 5), Some(RED));
        assert_eq!(s.pixel(2, 5), Some(Color::TRANSPARENT), "inside the ring");
    }

    #[test]
    fn translucent_fill_blends() {
        let mut s = PixelSurface::new(IntSize::new(1, 1));
        s.clear(Color::WHITE);
        s.fill_rect(rect(0, 0, 1, 1), &Brush::Solid(Color::rgba8(0, 0, 0, 128)));
        let px = s.pixel(0, 0).unwrap_or_default();
        assert_eq!(px.a, 255, "opaque destination stays opaque");
        assert!(px.r > 100 && px.r < 140, "about half grey: {px:?}");
    }

    #[test]
    fn horizontal_gradient_runs_left_to_right() {
        let mut s = PixelSurface::new(IntSize::new(10, 1));
        s.fill_rect(
            rect(0, 0, 10, 1),
            &Brush::LinearGradient {
                start: Color::BLACK,
                end: Color::WHITE,
                angle: 0.0,
            },
        );
        let left = s.pixel(0, 0).unwrap_or_default();
        let right = s.pixel(9, 0).unwrap_or_default();
        assert!(left.r < 20, "start color on the left: {left:?}");
        assert!(right.r > 235, "end color on the right: {right:?}");
    }

    #[test]
    fn reversed_gradient_runs_right_to_left() {
        let mut s = PixelSurface::new(IntSize::new(10, 1));
        s.fill_rect(
            rect(0, 0, 10, 1),
            &Brush::LinearGradient {
                start: Color::BLACK,
                end: Color::WHITE,
                angle: 180.0,
            },
        );
        let left = s.pixel(0, 0).unwrap_or_default();
        let right = s.pixel(9, 0).unwrap_or_default();
        assert!(left.r > 235, "end color on the left: {left:?}");
        assert!(right.r < 20, "start color on the right: {right:?}");
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let mut s = PixelSurface::new(IntSize::new(1, 10));
        s.fill_rect(
            rect(0, 0, 1, 10),
            &Brush::LinearGradient {
                start: RED,
                end: BLUE,
                angle: 90.0,
            },
        );
        let top = s.pixel(0, 0).unwrap_or_default();
        let bottom = s.pixel(0, 9).unwrap_or_default();
        assert!(top.r > top.b, "red at the top");
        assert!(bottom.b > bottom.r, "blue at the bottom");
    }

    #[test]
    fn blit_copies_a_window() {
        let mut src = PixelSurface::new(IntSize::new(4, 4));
        src.fill_rect(rect(2, 2, 2, 2), &Brush::Solid(RED));
        let mut dst = PixelSurface::new(IntSize::new(10, 10));
        dst.blit(&src, IntRect::new(2, 2, 2, 2), IntPoint::new(5, 6));
        assert_eq!(count(&dst, RED), 4);
        assert_eq!(dst.pixel(5, 6), Some(RED), "window origin lands at dest");
        assert_eq!(dst.pixel(7, 6), Some(Color::TRANSPARENT));
    }

    #[test]
    fn blit_from_foreign_surface_is_ignored() {
        struct Other;
        impl Surface for Other {
            fn size(&self) -> IntSize {
                IntSize::new(1, 1)
            }
            fn set_clip(&mut self, _: kurbo::Rect) {}
            fn clear(&mut self, _: Color) {}
            fn fill_rect(&mut self, _: kurbo::Rect, _: &Brush) {}
            fn stroke_rect(&mut self, _: kurbo::Rect, _: Color, _: f64) {}
            fn blit(&mut self, _: &dyn Surface, _: IntRect, _: IntPoint) {}
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
        let mut dst = PixelSurface::new(IntSize::new(2, 2));
        dst.blit(&Other, IntRect::new(0, 0, 1, 1), IntPoint::ZERO);
        assert_eq!(count(&dst, Color::TRANSPARENT), 4, "untouched");
    }

    #[test]
    fn rgba_bytes() {
        let mut s = PixelSurface::new(IntSize::new(1, 1));
        s.clear(Color::rgba8(1, 2, 3, 4));
        assert_eq!(s.to_rgba8(), [1, 2, 3, 4]);
    }
}
