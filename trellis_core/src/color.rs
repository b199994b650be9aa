// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors and fonts used by control styling.

use alloc::string::String;
use core::fmt;

/// An 8-bit-per-channel RGBA color (straight, non-premultiplied alpha).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb8(255, 255, 255);

    /// Creates a color from all four channels.
    #[inline]
    #[must_use]
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Returns `true` if the color has zero alpha.
    #[inline]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Composites `self` over `dst` (source-over).
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = u32::from(sa);
                let da = u32::from(dst.a) * (255 - sa) / 255;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| -> u8 {
                    let v = (u32::from(s) * sa + u32::from(d) * da) / out_a;
                    u8::try_from(v).unwrap_or(u8::MAX)
                };
                Self {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: u8::try_from(out_a).unwrap_or(u8::MAX),
                }
            }
        }
    }

    /// Linearly interpolates between two colors; `t` is clamped to `0..=1`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t + 0.5;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "value is within 0.5..=255.5 and truncation rounds it"
            )]
            let v = v as u32;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// A font description.
///
/// The control tree only stores and inherits fonts; measuring and drawing
/// text is up to widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name, e.g. `"Sans"`.
    pub family: String,
    /// Em size in pixels.
    pub size: f32,
}

impl Font {
    /// Creates a font description.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_replaces_destination() {
        let red = Color::rgb8(255, 0, 0);
        assert_eq!(red.over(Color::WHITE), red, "opaque over anything");
    }

    #[test]
    fn transparent_source_keeps_destination() {
        assert_eq!(
            Color::TRANSPARENT.over(Color::WHITE),
            Color::WHITE,
            "transparent over anything"
        );
    }

    #[test]
    fn half_alpha_over_opaque_is_opaque_mix() {
        let c = Color::rgba8(255, 0, 0, 128).over(Color::rgb8(0, 0, 255));
        assert_eq!(c.a, 255, "result over opaque stays opaque");
        assert!(c.r > 100 && c.b > 100, "both channels contribute: {c:?}");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::BLACK;
        let b = Color::WHITE;
        assert_eq!(a.lerp(b, 0.0), a, "t = 0");
        assert_eq!(a.lerp(b, 1.0), b, "t = 1");
        assert_eq!(a.lerp(b, 2.0), b, "t clamped");
    }
}
