// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Paint phases become duration slices. Dispatches, invalidations, surface
//! changes and per-control records carry no timestamp of their own, so they
//! are stamped with the most recent paint tick or phase boundary.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use trellis_core::geometry::IntRect;
use trellis_core::time::Timebase;
use trellis_core::trace::SurfaceChange;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PaintTick(e) => {
                last_ts = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "Paint",
                    "cat": "Display",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "render_requested": e.render_requested,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Dispatch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": e.kind.name(),
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "control": e.control,
                    }
                }));
            }
            RecordedEvent::Invalidate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Invalidate",
                    "cat": "Tree",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "control": e.control,
                    }
                }));
            }
            RecordedEvent::Surface(e) => {
                let name = match e.change {
                    SurfaceChange::Allocated => "SurfaceAllocated",
                    SurfaceChange::Released => "SurfaceReleased",
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Surface",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "control": e.control,
                        "width": e.size.width,
                        "height": e.size.height,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "C",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "invalidated": s.invalidated,
                        "collect_us": ticks_to_us(s.collect_ticks, timebase),
                        "redraw_us": ticks_to_us(s.redraw_ticks, timebase),
                        "compose_us": ticks_to_us(s.compose_ticks, timebase),
                        "present_us": ticks_to_us(s.present_ticks, timebase),
                    }
                }));
            }
            RecordedEvent::Layout(r) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Layout",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "control": r.control,
                        "area_in": rect(r.area_in),
                        "bounds": rect(r.bounds),
                        "area_out": rect(r.area_out),
                    }
                }));
            }
            RecordedEvent::Redraw(r) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Redraw",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "control": r.control,
                        "bounds": rect(r.bounds),
                        "clip": rect(r.clip),
                        "forced": r.forced,
                        "redrawn": r.redrawn,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

fn rect(r: IntRect) -> Value {
    json!([r.x, r.y, r.width, r.height])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use trellis_core::event::EventKind;
    use trellis_core::time::HostTime;
    use trellis_core::trace::{
        DispatchEvent, PaintTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_paint_tick(&PaintTickEvent {
            frame_index: 0,
            now: HostTime(1_000_000),
            render_requested: true,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Redraw,
            timestamp: HostTime(1_000_000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Redraw,
            timestamp: HostTime(1_000_100),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3, "one object per record");

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "Paint");

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "Redraw");

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["name"], "Redraw");
    }

    #[test]
    fn dispatch_is_stamped_with_last_phase_boundary() {
        let mut rec = RecorderSink::new();
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 4,
            phase: PhaseKind::Present,
            timestamp: HostTime(2_000),
        });
        rec.on_dispatch(&DispatchEvent {
            control: 5,
            kind: EventKind::MouseClick,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[1]["name"], "MouseClick");
        assert_eq!(parsed[1]["ts"], 2.0, "inherits the phase end time");
        assert_eq!(parsed[1]["args"]["control"], 5);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty(), "no events");
    }
}
