// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw and compositing onto per-level surfaces.
//!
//! A redraw pass walks a subtree and repaints the controls that need it into
//! the surface of their level. A control that owns a surface starts a new
//! level: it and its descendants draw into that surface with coordinates
//! restated at its origin. Everything else draws into the surface it was
//! handed by its parent.
//!
//! Per control the pass:
//!
//! 1. repaints background and border if the control needs a redraw or an
//!    ancestor was repainted, which forces all of its descendants too;
//! 2. redraws visible children bottom-most first, each clipped to its bounds
//!    within the current clip;
//! 3. lets the widget paint its client area, and, for a control owning a
//!    surface below another level, paint through to the parent surface.

use alloc::vec::Vec;

use crate::control::{ControlId, ControlTree};
use crate::geometry::{IntPoint, IntRect};
use crate::surface::{Brush, Surface};
#[cfg(feature = "trace-rich")]
use crate::trace::RedrawRecord;

/// The parent surface, with this control's bounds and clip on it.
type PaintThrough<'a> = (&'a mut dyn Surface, IntRect, IntRect);

impl ControlTree {
    /// Redraws `id` and its subtree.
    ///
    /// `bounds` is the control's rectangle and `clip` the drawable region,
    /// both in `parent_target` coordinates. A control that owns a surface
    /// draws into it and ignores both; a control that does not must be given
    /// a `parent_target` or nothing is drawn.
    ///
    /// Returns `true` if this control or any descendant repainted.
    pub fn redraw(
        &mut self,
        id: ControlId,
        parent_target: Option<&mut dyn Surface>,
        bounds: IntRect,
        clip: IntRect,
        force: bool,
    ) -> bool {
        self.validate(id);
        let idx = id.idx as usize;
        if !self.backings[idx].is_owned() {
            return match parent_target {
                Some(target) => self.redraw_level(id, target, bounds, clip, force, None),
                None => false,
            };
        }

        let mut backing = core::mem::take(&mut self.backings[idx]);
        let redrawn = match backing.surface_mut() {
            Some(own) => {
                let local = IntRect::from_origin_size(IntPoint::ZERO, own.size());
                let through = parent_target.map(|p| (p, bounds, clip));
                self.redraw_level(id, own, local, local, force, through)
            }
            None => false,
        };
        self.backings[idx] = backing;
        redrawn
    }

    fn redraw_level(
        &mut self,
        id: ControlId,
        target: &mut dyn Surface,
        bounds: IntRect,
        clip: IntRect,
        mut force: bool,
        through: Option<PaintThrough<'_>>,
    ) -> bool {
        let idx = id.idx as usize;
        let mut redrawn = false;

        if self.state[idx].needs_redraw || force {
            target.set_clip(clip.to_kurbo());
            self.draw_box(idx, target, bounds);
            force = true;
            self.state[idx].needs_redraw = false;
            redrawn = true;
        }

        let client = IntRect::new(
            bounds.x + self.client_left_margin(id),
            bounds.y + self.client_top_margin(id),
            self.client_width(id),
            self.client_height(id),
        )
        .clamped();

        let children: Vec<ControlId> = self.children(id).collect();
        for &child in children.iter().rev() {
            if !self.is_visible(child) {
                continue;
            }
            let child_bounds = self.bounds(child).translate(client.x, client.y);
            let child_clip = child_bounds.intersect(clip);
            redrawn |= self.redraw(child, Some(&mut *target), child_bounds, child_clip, force);
        }

        if force {
            target.set_clip(clip.to_kurbo());
            if let Some(mut widget) = self.take_widget(idx) {
                widget.paint(self, id, client, target);
                if let Some((parent, parent_bounds, parent_clip)) = through {
                    parent.set_clip(parent_clip.to_kurbo());
                    widget.paint_parent(self, id, &*target, parent_bounds, parent);
                }
                self.restore_widget(id, widget);
            }
        }

        #[cfg(feature = "trace-rich")]
        self.tracer.redraw(&RedrawRecord {
            control: id.idx,
            bounds,
            clip,
            forced: force,
            redrawn,
        });

        redrawn
    }

    /// Paints the background and, when the border width is positive, the
    /// border inside the margin.
    pub(crate) fn draw_box(&self, idx: usize, target: &mut dyn Surface, bounds: IntRect) {
        self.draw_back(idx, target, bounds);
        let props = &self.props[idx];
        if props.border_width > 0 {
            target.stroke_rect(
                bounds.inset(props.margin).to_kurbo(),
                props.border_color,
                f64::from(props.border_width),
            );
        }
    }

    /// Fills the background unless the back color is transparent.
    ///
    /// The clip region is cleared first so translucent backgrounds do not
    /// accumulate across redraws.
    fn draw_back(&self, idx: usize, target: &mut dyn Surface, bounds: IntRect) {
        let props = &self.props[idx];
        if props.back_color.is_transparent() {
            return;
        }
        target.clear(crate::color::Color::TRANSPARENT);
        let brush = match props.gradient {
            Some(g) => Brush::LinearGradient {
                start: props.back_color,
                end: g.end,
                angle: g.angle,
            },
            None => Brush::Solid(props.back_color),
        };
        target.fill_rect(bounds.to_kurbo(), &brush);
    }
}
