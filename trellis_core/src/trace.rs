// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the control tree.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tree and display call as they dispatch events, lay out, redraw and present.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink and lives inside the
//! [`ControlTree`](crate::control::ControlTree). When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing. When **on**, each method
//! performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a paint and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-control [`LayoutRecord`] and
//!   [`RedrawRecord`] events plus the corresponding `TraceSink` methods.

use alloc::boxed::Box;

use crate::event::EventKind;
use crate::geometry::IntSize;
#[cfg(feature = "trace-rich")]
use crate::geometry::IntRect;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a paint is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Draining the dirty tracker for the frame report.
    Collect,
    /// Redraw of top-level controls into their own surfaces.
    Redraw,
    /// Compositing top-level surfaces into the frame.
    Compose,
    /// Handing the frame to the presenter.
    Present,
}

impl PhaseKind {
    /// All phases, in paint order.
    pub const ALL: [Self; 4] = [Self::Collect, Self::Redraw, Self::Compose, Self::Present];

    /// Returns the array index of this phase within [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Collect => 0,
            Self::Redraw => 1,
            Self::Compose => 2,
            Self::Present => 3,
        }
    }
}

/// What happened to a backing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceChange {
    /// A surface was allocated for a control.
    Allocated,
    /// A surface was released because its control was destroyed or resized.
    Released,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the display receives a paint tick.
#[derive(Clone, Copy, Debug)]
pub struct PaintTickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time stamped on the tick by the backend.
    pub now: HostTime,
    /// Whether a render had been requested since the last paint.
    pub render_requested: bool,
}

/// Marks the beginning of a paint phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a paint phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when an event is delivered to a control.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEvent {
    /// Slot index of the receiving control.
    pub control: u32,
    /// Which event was delivered.
    pub kind: EventKind,
}

/// Emitted when a control is marked for redraw.
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// Slot index of the invalidated control.
    pub control: u32,
}

/// Emitted when a backing surface is allocated or released.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceEvent {
    /// Slot index of the owning control.
    pub control: u32,
    /// Pixel size of the surface.
    pub size: IntSize,
    /// Allocation or release.
    pub change: SurfaceChange,
}

/// Per-paint summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the paint tick.
    pub now: HostTime,
    /// Number of controls invalidated since the previous paint.
    pub invalidated: u32,
    /// Whether any control redrew.
    pub redrawn: bool,
    /// Collect phase duration in ticks (0 if not measured).
    pub collect_ticks: u64,
    /// Redraw phase duration in ticks (0 if not measured).
    pub redraw_ticks: u64,
    /// Compose phase duration in ticks (0 if not measured).
    pub compose_ticks: u64,
    /// Present phase duration in ticks (0 if not measured).
    pub present_ticks: u64,
}

/// A single control's layout result.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayoutRecord {
    /// Slot index of the control.
    pub control: u32,
    /// Area offered by the parent.
    pub area_in: IntRect,
    /// Bounds chosen by the control.
    pub bounds: IntRect,
    /// Area handed on to the next sibling.
    pub area_out: IntRect,
}

/// A single control's visit during a redraw pass.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct RedrawRecord {
    /// Slot index of the control.
    pub control: u32,
    /// Bounds in the coordinates of the surface being drawn.
    pub bounds: IntRect,
    /// Clip in the same coordinates.
    pub clip: IntRect,
    /// Whether an ancestor forced this redraw.
    pub forced: bool,
    /// Whether this control or a descendant repainted.
    pub redrawn: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the control tree and display.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a paint tick is received.
    fn on_paint_tick(&mut self, e: &PaintTickEvent) {
        _ = e;
    }

    /// Called at the beginning of a paint phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a paint phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when an event is delivered to a control.
    fn on_dispatch(&mut self, e: &DispatchEvent) {
        _ = e;
    }

    /// Called when a control is marked for redraw.
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }

    /// Called when a backing surface is allocated or released.
    fn on_surface(&mut self, e: &SurfaceEvent) {
        _ = e;
    }

    /// Called with a per-paint summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called for every control positioned by a layout pass (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layout(&mut self, r: &LayoutRecord) {
        _ = r;
    }

    /// Called for every control visited by a redraw pass (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_redraw(&mut self, r: &RedrawRecord) {
        _ = r;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, the sink is dropped on construction
/// and every method compiles to nothing.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Removes and returns the sink, leaving the tracer disabled.
    ///
    /// Always `None` when the `trace` feature is off.
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`PaintTickEvent`].
    #[inline]
    pub fn paint_tick(&mut self, e: &PaintTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchEvent`].
    #[inline]
    pub fn dispatch(&mut self, e: &DispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InvalidateEvent`].
    #[inline]
    pub fn invalidate(&mut self, e: &InvalidateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_invalidate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SurfaceEvent`].
    #[inline]
    pub fn surface(&mut self, e: &SurfaceEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_surface(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`LayoutRecord`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layout(&mut self, r: &LayoutRecord) {
        if let Some(s) = &mut self.sink {
            s.on_layout(r);
        }
    }

    /// Emits a [`RedrawRecord`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn redraw(&mut self, r: &RedrawRecord) {
        if let Some(s) = &mut self.sink {
            s.on_redraw(r);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a paint and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: PaintTickEvent,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
    invalidated: u32,
    redrawn: bool,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &PaintTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            invalidated: 0,
            redrawn: false,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase.index()] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase.index()] = Some(t);
    }

    /// Records how many controls were invalidated and whether anything redrew.
    pub fn set_outcome(&mut self, invalidated: u32, redrawn: bool) {
        self.invalidated = invalidated;
        self.redrawn = redrawn;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            invalidated: self.invalidated,
            redrawn: self.redrawn,
            collect_ticks: self.phase_duration(PhaseKind::Collect),
            redraw_ticks: self.phase_duration(PhaseKind::Redraw),
            compose_ticks: self.phase_duration(PhaseKind::Compose),
            present_ticks: self.phase_duration(PhaseKind::Present),
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase.index();
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
