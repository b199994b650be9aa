// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation contract for platform integrations.
//!
//! The control tree renders into offscreen [`Surface`]s and composites them
//! into a single frame. Getting that frame onto a screen is the job of a
//! *presenter*, supplied by a backend crate:
//!
//! - **Frame requests**: when input or a property change leaves the tree
//!   wanting a repaint, the [`Display`](crate::display::Display) calls
//!   [`Presenter::invalidate`]. The backend answers by scheduling a paint
//!   callback (a window invalidation, an animation frame, a vsync tick) in
//!   which it calls [`Display::paint`](crate::display::Display::paint).
//!
//! - **Presentation**: at the end of a paint, the display hands the composed
//!   frame and a [`DamageRegion`] describing what changed to
//!   [`Presenter::present`].
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_paint_callback() {
//!     let report = display.paint(now());
//!     // The display has already called presenter.present(frame, damage).
//!     if display.tree().render_requested() {
//!         // A handler invalidated something while painting.
//!         schedule_next_frame();
//!     }
//! }
//! ```

use alloc::vec::Vec;

use crate::geometry::IntRect;
use crate::surface::Surface;

/// Receives composed frames and paint requests from a display.
pub trait Presenter {
    /// Asks the backend to schedule a paint.
    ///
    /// Called at most once per pending frame; further invalidations before
    /// the next paint are coalesced by the display.
    fn invalidate(&mut self);

    /// Shows `frame`. Only the pixels inside `damage` differ from the
    /// previously presented frame.
    fn present(&mut self, frame: &dyn Surface, damage: &DamageRegion);
}

/// A region of the output that needs re-presenting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The entire output changed.
    #[default]
    Full,
    /// Only these rectangles, in frame pixels, changed.
    Rects(Vec<IntRect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if nothing needs re-presenting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Rects(rects) => rects.iter().all(|r| r.is_empty()),
            Self::Full => false,
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&mut *self, other) {
            (Self::Full, _) | (_, Self::None) => {}
            (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (Self::Rects(a), Self::Rects(b)) => {
                a.extend(b.iter().copied().filter(|r| !r.is_empty()));
            }
        }
    }

    /// Adds a single rectangle. Empty rectangles are ignored.
    pub fn add_rect(&mut self, rect: IntRect) {
        if rect.is_empty() {
            return;
        }
        match self {
            Self::Full => {}
            Self::None => *self = Self::Rects(alloc::vec![rect]),
            Self::Rects(rects) => rects.push(rect),
        }
    }

    /// Smallest rectangle covering the damage, or `None` if there is none.
    ///
    /// `bounds` is the frame rectangle, returned for [`Full`](Self::Full).
    #[must_use]
    pub fn bounding_box(&self, bounds: IntRect) -> Option<IntRect> {
        match self {
            Self::Full => Some(bounds),
            Self::None => None,
            Self::Rects(rects) => rects
                .iter()
                .copied()
                .filter(|r| !r.is_empty())
                .reduce(IntRect::union),
        }
    }
}
