// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use trellis_core::geometry::IntRect;
use trellis_core::time::{HostTime, Timebase};
use trellis_core::trace::{
    DispatchEvent, FrameSummary, InvalidateEvent, LayoutRecord, PaintTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RedrawRecord, SurfaceChange, SurfaceEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Collect => "collect",
        PhaseKind::Redraw => "redraw",
        PhaseKind::Compose => "compose",
        PhaseKind::Present => "present",
    }
}

fn rect(r: IntRect) -> String {
    format!("{},{} {}x{}", r.x, r.y, r.width, r.height)
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_paint_tick(&mut self, e: &PaintTickEvent) {
        let _ = writeln!(
            self.writer,
            "[paint] frame={} now={:.1}µs requested={}",
            e.frame_index,
            self.host_us(e.now),
            e.render_requested,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[dispatch] control={} {}",
            e.control,
            e.kind.name(),
        );
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let _ = writeln!(self.writer, "[invalidate] control={}", e.control);
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        let change = match e.change {
            SurfaceChange::Allocated => "alloc",
            SurfaceChange::Released => "release",
        };
        let _ = writeln!(
            self.writer,
            "[surface] control={} {change} {}x{}",
            e.control, e.size.width, e.size.height,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} invalidated={} redrawn={} collect={:.1}µs \
             redraw={:.1}µs compose={:.1}µs present={:.1}µs",
            s.frame_index,
            s.invalidated,
            s.redrawn,
            self.ticks_to_us(s.collect_ticks),
            self.ticks_to_us(s.redraw_ticks),
            self.ticks_to_us(s.compose_ticks),
            self.ticks_to_us(s.present_ticks),
        );
    }

    fn on_layout(&mut self, r: &LayoutRecord) {
        let _ = writeln!(
            self.writer,
            "[layout] control={} in=({}) bounds=({}) out=({})",
            r.control,
            rect(r.area_in),
            rect(r.bounds),
            rect(r.area_out),
        );
    }

    fn on_redraw(&mut self, r: &RedrawRecord) {
        let _ = writeln!(
            self.writer,
            "[redraw] control={} bounds=({}) clip=({}) forced={} redrawn={}",
            r.control,
            rect(r.bounds),
            rect(r.clip),
            r.forced,
            r.redrawn,
        );
    }
}
