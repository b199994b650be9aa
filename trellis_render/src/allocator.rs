// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel surface allocation with live counters.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use trellis_core::geometry::IntSize;
use trellis_core::surface::{Surface, SurfaceAllocator};

use crate::pixel::PixelSurface;

#[derive(Debug, Default)]
struct Counters {
    allocated: Cell<u64>,
    released: Cell<u64>,
    live_pixels: Cell<u64>,
}

/// Allocates [`PixelSurface`]s and counts them.
///
/// Clones share their counters, so one clone can be handed to a
/// [`ControlTree`](trellis_core::control::ControlTree) while another is kept
/// to observe it.
#[derive(Clone, Debug, Default)]
pub struct CountingAllocator {
    counters: Rc<Counters>,
}

impl CountingAllocator {
    /// Creates an allocator with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces allocated so far.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.counters.allocated.get()
    }

    /// Surfaces released so far.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.counters.released.get()
    }

    /// Surfaces allocated and not yet released.
    #[must_use]
    pub fn live(&self) -> u64 {
        self.allocated().saturating_sub(self.released())
    }

    /// Total pixel count of live surfaces.
    #[must_use]
    pub fn live_pixels(&self) -> u64 {
        self.counters.live_pixels.get()
    }
}

fn pixel_count(size: IntSize) -> u64 {
    let size = size.clamped();
    u64::try_from(size.width).unwrap_or(0) * u64::try_from(size.height).unwrap_or(0)
}

impl SurfaceAllocator for CountingAllocator {
    fn allocate(&mut self, size: IntSize) -> Box<dyn Surface> {
        let c = &self.counters;
        c.allocated.set(c.allocated.get() + 1);
        c.live_pixels.set(c.live_pixels.get() + pixel_count(size));
        Box::new(PixelSurface::new(size))
    }

    fn release(&mut self, surface: Box<dyn Surface>) {
        let c = &self.counters;
        c.released.set(c.released.get() + 1);
        c.live_pixels
            .set(c.live_pixels.get().saturating_sub(pixel_count(surface.size())));
        drop(surface);
    }
}
