// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-ordered hit testing.

use crate::control::{ControlId, ControlTree};
use crate::geometry::IntPoint;

impl ControlTree {
    /// Finds the deepest visible control under `point`, which is given in the
    /// client coordinates of `id`'s parent.
    ///
    /// Bounds are tested inclusively, so a point on the right or bottom edge
    /// still hits. Children are offset by the widget's
    /// [`child_offset`](crate::widget::Widget::child_offset). Children are
    /// searched topmost first and the first hit wins; a point inside `id` but
    /// over none of its children returns `id`.
    #[must_use]
    pub fn find_control_over(&self, id: ControlId, point: IntPoint) -> Option<ControlId> {
        let bounds = self.bounds(id);
        if !bounds.contains_inclusive(point) {
            return None;
        }
        let scroll = self.widgets[id.idx as usize]
            .as_ref()
            .map_or(IntPoint::ZERO, |w| w.child_offset());
        let local = IntPoint::new(
            point
                .x
                .saturating_sub(bounds.left())
                .saturating_sub(self.client_left_margin(id))
                .saturating_sub(scroll.x),
            point
                .y
                .saturating_sub(bounds.top())
                .saturating_sub(self.client_top_margin(id))
                .saturating_sub(scroll.y),
        );
        self.children(id)
            .filter(|&c| self.is_visible(c))
            .find_map(|c| self.find_control_over(c, local))
            .or(Some(id))
    }
}
