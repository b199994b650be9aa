// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless presentation.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use trellis_core::backend::{DamageRegion, Presenter};
use trellis_core::color::Color;
use trellis_core::geometry::IntSize;
use trellis_core::surface::Surface;

use crate::pixel::PixelSurface;

/// One presented frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Frame size in pixels.
    pub size: IntSize,
    /// Damage reported with the frame.
    pub damage: DamageRegion,
    /// Copy of the frame's pixels, if it was a [`PixelSurface`].
    pub pixels: Option<Vec<Color>>,
}

#[derive(Debug, Default)]
struct Captured {
    invalidations: u32,
    frames: Vec<CapturedFrame>,
}

/// A [`Presenter`] that keeps everything it is given.
///
/// Clones share one capture log. Frames with empty damage are logged but
/// their pixels are not copied.
#[derive(Clone, Debug, Default)]
pub struct CapturingPresenter {
    log: Rc<RefCell<Captured>>,
}

impl CapturingPresenter {
    /// Creates a presenter with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paint requests received.
    #[must_use]
    pub fn invalidations(&self) -> u32 {
        self.log.borrow().invalidations
    }

    /// Number of frames presented.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.log.borrow().frames.len()
    }

    /// The most recent frame that carried pixels.
    #[must_use]
    pub fn last_frame(&self) -> Option<CapturedFrame> {
        self.log
            .borrow()
            .frames
            .iter()
            .rev()
            .find(|f| f.pixels.is_some())
            .cloned()
    }

    /// Damage of every presented frame, oldest first.
    #[must_use]
    pub fn damage_log(&self) -> Vec<DamageRegion> {
        self.log.borrow().frames.iter().map(|f| f.damage.clone()).collect()
    }

    /// Forgets all captured frames and requests.
    pub fn clear(&self) {
        let mut log = self.log.borrow_mut();
        log.invalidations = 0;
        log.frames.clear();
    }
}

impl CapturedFrame {
    /// Returns the pixel at `(x, y)`, if pixels were captured and the
    /// position is inside the frame.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = usize::try_from(y * self.size.width + x).ok()?;
        self.pixels.as_ref()?.get(i).copied()
    }
}

impl Presenter for CapturingPresenter {
    fn invalidate(&mut self) {
        self.log.borrow_mut().invalidations += 1;
    }

    fn present(&mut self, frame: &dyn Surface, damage: &DamageRegion) {
        let pixels = if damage.is_empty() {
            None
        } else {
            frame
                .as_any()
                .downcast_ref::<PixelSurface>()
                .map(|p| p.pixels().to_vec())
        };
        self.log.borrow_mut().frames.push(CapturedFrame {
            size: frame.size(),
            damage: damage.clone(),
            pixels,
        });
    }
}
