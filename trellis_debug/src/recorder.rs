// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed by a one-byte
//! tag. [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Rectangles are stored as four `i32`s (`x`, `y`, `width`, `height`).

use trellis_core::event::EventKind;
use trellis_core::geometry::{IntRect, IntSize};
use trellis_core::time::HostTime;
use trellis_core::trace::{
    DispatchEvent, FrameSummary, InvalidateEvent, LayoutRecord, PaintTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RedrawRecord, SurfaceChange, SurfaceEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PAINT_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_DISPATCH: u8 = 4;
const TAG_SURFACE: u8 = 5;
const TAG_FRAME_SUMMARY: u8 = 6;
const TAG_LAYOUT: u8 = 7;
const TAG_REDRAW: u8 = 8;
const TAG_INVALIDATE: u8 = 9;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_rect(&mut self, r: IntRect) {
        self.write_i32(r.x);
        self.write_i32(r.y);
        self.write_i32(r.width);
        self.write_i32(r.height);
    }

    fn write_phase(&mut self, p: PhaseKind) {
        let v = match p {
            PhaseKind::Collect => 0,
            PhaseKind::Redraw => 1,
            PhaseKind::Compose => 2,
            PhaseKind::Present => 3,
        };
        self.write_u8(v);
    }
}

impl TraceSink for RecorderSink {
    fn on_paint_tick(&mut self, e: &PaintTickEvent) {
        self.write_u8(TAG_PAINT_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_bool(e.render_requested);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_dispatch(&mut self, e: &DispatchEvent) {
        self.write_u8(TAG_DISPATCH);
        self.write_u32(e.control);
        self.write_u8(e.kind as u8);
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.write_u8(TAG_INVALIDATE);
        self.write_u32(e.control);
    }

    fn on_surface(&mut self, e: &SurfaceEvent) {
        self.write_u8(TAG_SURFACE);
        self.write_u32(e.control);
        self.write_i32(e.size.width);
        self.write_i32(e.size.height);
        self.write_bool(e.change == SurfaceChange::Allocated);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.ticks());
        self.write_u32(s.invalidated);
        self.write_bool(s.redrawn);
        self.write_u64(s.collect_ticks);
        self.write_u64(s.redraw_ticks);
        self.write_u64(s.compose_ticks);
        self.write_u64(s.present_ticks);
    }

    fn on_layout(&mut self, r: &LayoutRecord) {
        self.write_u8(TAG_LAYOUT);
        self.write_u32(r.control);
        self.write_rect(r.area_in);
        self.write_rect(r.bounds);
        self.write_rect(r.area_out);
    }

    fn on_redraw(&mut self, r: &RedrawRecord) {
        self.write_u8(TAG_REDRAW);
        self.write_u32(r.control);
        self.write_rect(r.bounds);
        self.write_rect(r.clip);
        self.write_bool(r.forced);
        self.write_bool(r.redrawn);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A paint tick.
    PaintTick(PaintTickEvent),
    /// A phase began.
    PhaseBegin(PhaseBeginEvent),
    /// A phase ended.
    PhaseEnd(PhaseEndEvent),
    /// An event was delivered to a control.
    Dispatch(DispatchEvent),
    /// A control was marked for redraw.
    Invalidate(InvalidateEvent),
    /// A backing surface was allocated or released.
    Surface(SurfaceEvent),
    /// Per-paint summary.
    FrameSummary(FrameSummary),
    /// A control was positioned by layout.
    Layout(LayoutRecord),
    /// A control was visited by redraw.
    Redraw(RedrawRecord),
}

/// Decodes a byte buffer produced by [`RecorderSink`] into events.
///
/// Iteration stops at the first truncated record or unknown tag.
#[must_use]
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter { bytes, pos: 0 }
}

/// Iterator over [`RecordedEvent`]s in a recorded buffer.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let chunk = self.bytes.get(self.pos..end)?;
        self.pos = end;
        chunk.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_rect(&mut self) -> Option<IntRect> {
        Some(IntRect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        PhaseKind::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_paint_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PaintTick(PaintTickEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            render_requested: self.read_bool()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_dispatch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Dispatch(DispatchEvent {
            control: self.read_u32()?,
            kind: EventKind::from_u8(self.read_u8()?)?,
        }))
    }

    fn decode_invalidate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Invalidate(InvalidateEvent {
            control: self.read_u32()?,
        }))
    }

    fn decode_surface(&mut self) -> Option<RecordedEvent> {
        let control = self.read_u32()?;
        let size = IntSize::new(self.read_i32()?, self.read_i32()?);
        let change = if self.read_bool()? {
            SurfaceChange::Allocated
        } else {
            SurfaceChange::Released
        };
        Some(RecordedEvent::Surface(SurfaceEvent {
            control,
            size,
            change,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            invalidated: self.read_u32()?,
            redrawn: self.read_bool()?,
            collect_ticks: self.read_u64()?,
            redraw_ticks: self.read_u64()?,
            compose_ticks: self.read_u64()?,
            present_ticks: self.read_u64()?,
        }))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Layout(LayoutRecord {
            control: self.read_u32()?,
            area_in: self.read_rect()?,
            bounds: self.read_rect()?,
            area_out: self.read_rect()?,
        }))
    }

    fn decode_redraw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Redraw(RedrawRecord {
            control: self.read_u32()?,
            bounds: self.read_rect()?,
            clip: self.read_rect()?,
            forced: self.read_bool()?,
            redrawn: self.read_bool()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_PAINT_TICK => self.decode_paint_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_DISPATCH => self.decode_dispatch(),
            TAG_SURFACE => self.decode_surface(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_LAYOUT => self.decode_layout(),
            TAG_REDRAW => self.decode_redraw(),
            TAG_INVALIDATE => self.decode_invalidate(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            now: HostTime(1_000_000),
            invalidated: 3,
            redrawn: true,
            collect_ticks: 10,
            redraw_ticks: 400,
            compose_ticks: 120,
            present_ticks: 30,
        }
    }

    #[test]
    fn paint_tick_and_phases_decode_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_paint_tick(&PaintTickEvent {
            frame_index: 2,
            now: HostTime(500),
            render_requested: true,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 2,
            phase: PhaseKind::Compose,
            timestamp: HostTime(510),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 2,
            phase: PhaseKind::Compose,
            timestamp: HostTime(530),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 3, "three records");
        match &events[0] {
            RecordedEvent::PaintTick(e) => {
                assert_eq!(e.frame_index, 2);
                assert_eq!(e.now, HostTime(500));
                assert!(e.render_requested, "flag survives");
            }
            other => panic!("expected PaintTick, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::PhaseBegin(e) => assert_eq!(e.phase, PhaseKind::Compose),
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::PhaseEnd(e) => assert_eq!(e.timestamp, HostTime(530)),
            other => panic!("expected PhaseEnd, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_keeps_event_kind() {
        let mut rec = RecorderSink::new();
        rec.on_dispatch(&DispatchEvent {
            control: 9,
            kind: EventKind::MouseUp,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::Dispatch(e)) => {
                assert_eq!(e.control, 9);
                assert_eq!(e.kind, EventKind::MouseUp, "kind decoded from its byte");
            }
            other => panic!("expected Dispatch, got {other:?}"),
        }
    }

    #[test]
    fn invalidation_keeps_control() {
        let mut rec = RecorderSink::new();
        rec.on_invalidate(&InvalidateEvent { control: 12 });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::Invalidate(e)) => assert_eq!(e.control, 12),
            other => panic!("expected Invalidate, got {other:?}"),
        }
    }

    #[test]
    fn surface_release_is_distinguished() {
        let mut rec = RecorderSink::new();
        rec.on_surface(&SurfaceEvent {
            control: 1,
            size: IntSize::new(40, 30),
            change: SurfaceChange::Released,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::Surface(e)) => {
                assert_eq!(e.size, IntSize::new(40, 30));
                assert_eq!(e.change, SurfaceChange::Released);
            }
            other => panic!("expected Surface, got {other:?}"),
        }
    }

    #[test]
    fn summary_timings_survive() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::FrameSummary(s)) => {
                assert_eq!(s.invalidated, 3);
                assert_eq!(s.redraw_ticks, 400, "redraw phase ticks");
                assert_eq!(s.present_ticks, 30, "last field read back");
            }
            other => panic!("expected FrameSummary, got {other:?}"),
        }
    }

    #[test]
    fn rich_records_carry_rects() {
        let mut rec = RecorderSink::new();
        rec.on_layout(&LayoutRecord {
            control: 4,
            area_in: IntRect::new(0, 0, 100, 50),
            bounds: IntRect::new(0, 0, 100, 20),
            area_out: IntRect::new(0, 20, 100, 30),
        });
        rec.on_redraw(&RedrawRecord {
            control: 4,
            bounds: IntRect::new(-5, 0, 10, 10),
            clip: IntRect::new(0, 0, 5, 10),
            forced: false,
            redrawn: true,
        });
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::Layout(l), RecordedEvent::Redraw(r)] => {
                assert_eq!(l.area_out, IntRect::new(0, 20, 100, 30));
                assert_eq!(r.bounds.x, -5, "negative coordinates survive");
                assert!(!r.forced && r.redrawn);
            }
            other => panic!("expected Layout then Redraw, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 1];
        assert_eq!(decode(cut).count(), 1, "only the complete record decodes");
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xff, 1, 2, 3]).count(), 0);
    }
}
