// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The control tree keeps the per-control `needs_redraw` flag that drives the
//! redraw pass, and additionally records invalidations in a multi-channel
//! [`understory_dirty`] tracker so the display can report, once per frame,
//! which controls were invalidated and whether the tree's shape changed.
//!
//! - **Local-only**: [`REDRAW`] is marked with the default policy by every
//!   invalidation. Descendants are not marked: forced redraw of a subtree is
//!   decided during the redraw pass itself.
//! - **Structural**: [`TOPOLOGY`] is marked on the parent whenever a child is
//!   added or removed, and on a control when it is destroyed.
//!
//! Both channels are drained by
//! [`Display::paint`](crate::display::Display::paint) and surfaced in its
//! [`FrameReport`](crate::display::FrameReport).

use understory_dirty::Channel;

/// A control was invalidated and will repaint on the next frame.
pub const REDRAW: Channel = Channel::new(0);

/// Children were added to or removed from a control.
pub const TOPOLOGY: Channel = Channel::new(1);
