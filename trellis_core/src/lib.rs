// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode control tree with docking layout, hit-testing and
//! per-level compositing.
//!
//! `trellis_core` provides the data structures and algorithms of a GUI
//! toolkit that draws everything itself through a 2D surface contract. It is
//! `no_std` compatible (with `alloc`) and stores controls in struct-of-arrays
//! form addressed by generational handles.
//!
//! # Architecture
//!
//! ```text
//!   host input ──► Display ──► ControlTree::dispatch ──► Widget / handlers
//!                                      │
//!                     setters ─────────┤ invalidate / relayout
//!                                      ▼
//!   paint tick ──► Display::paint ──► redraw ──► compose ──► Presenter
//! ```
//!
//! **[`control`]**: the [`ControlTree`](control::ControlTree) arena. Box
//! model geometry, style, topology, and the three invalidation groups
//! triggered by property setters.
//!
//! **[`layout`]**: docking layout. Each child claims a strip or region of
//! what its earlier siblings left over.
//!
//! **[`hit`]**: finds the topmost visible control under a point.
//!
//! **[`redraw`]**: repaints invalidated controls into their level's surface.
//! Direct children of the root own a surface; everything else draws into an
//! ancestor's.
//!
//! **[`display`]**: the window root. Routes mouse and keyboard input, tracks
//! hover, focus and capture, composes the frame and hands it to a
//! [`Presenter`](backend::Presenter).
//!
//! **[`widget`]**: the [`Widget`](widget::Widget) trait for custom sizing,
//! layout, painting and event handling, and the
//! [`ScrollPanel`](widget::ScrollPanel).
//!
//! **[`surface`]** and **[`backend`]**: the contracts a graphics backend
//! implements.
//!
//! **[`dirty`]**: channels of the `understory_dirty` tracker that records
//! invalidations and topology changes for the frame report.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-control
//!   layout and redraw records.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod control;
pub mod dirty;
pub mod display;
pub mod event;
pub mod geometry;
pub mod hit;
pub mod layout;
pub mod redraw;
pub mod surface;
pub mod time;
pub mod trace;
pub mod widget;

#[cfg(test)]
mod test_util;
