// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Docking layout.
//!
//! A layout pass on a control runs in two steps:
//!
//! 1. **Size**: every visible child gets a chance to resize itself
//!    ([`Widget::perform_size`](crate::widget::Widget::perform_size)). Size
//!    changes made here do not re-enter the parent's layout.
//! 2. **Position**: the control's client rectangle is offered to the
//!    visible children in z-order. Each child positions itself inside the
//!    area it is offered ([`ControlTree::layout`]) and returns what is left
//!    for the next sibling, then lays out its own children.
//!
//! The default positioning policy is [`ControlTree::dock_layout`]:
//!
//! | Dock          | Bounds                                    | Remaining area             |
//! |---------------|-------------------------------------------|----------------------------|
//! | `None`        | unchanged                                 | unchanged                  |
//! | `Fill`        | the whole area                            | empty                      |
//! | `Center`      | own size clamped to the area, centered    | unchanged                  |
//! | `Left`/`Right`| full-height slice on that edge            | area minus the slice       |
//! | `Top`/`Bottom`| full-width slice on that edge             | area minus the slice       |
//! | `LeftCenter`/`RightCenter` | edge slice, own height, vertically centered | area minus the slice |
//!
//! A slice is `area * dock_percent` (rounded) when the percent is positive,
//! otherwise the control's own width or height, and never exceeds the area.

use alloc::vec::Vec;

use crate::control::{ControlId, ControlTree, DockType};
use crate::geometry::IntRect;
#[cfg(feature = "trace-rich")]
use crate::trace::LayoutRecord;

impl ControlTree {
    /// Lays out the children of `id`.
    ///
    /// Dispatches to the control's widget, whose default is
    /// [`layout_children`](Self::layout_children). While layout is suspended
    /// on the control, the request is only recorded.
    pub fn perform_layout(&mut self, id: ControlId) {
        self.validate(id);
        let idx = id.idx as usize;
        if self.state[idx].layout_suspended {
            self.state[idx].layout_pending = true;
            return;
        }
        match self.take_widget(idx) {
            Some(mut widget) => {
                widget.perform_layout(self, id);
                self.restore_widget(id, widget);
            }
            None => self.layout_children(id),
        }
    }

    /// The default layout pass: size every visible child, then dock each one
    /// into what its predecessors left of the client rectangle.
    pub fn layout_children(&mut self, id: ControlId) {
        self.validate(id);
        let children: Vec<ControlId> = self.children(id).collect();

        for &child in &children {
            if self.is_alive(child) && self.is_visible(child) {
                self.perform_size(child);
            }
        }

        if !self.is_alive(id) {
            return;
        }
        let mut area = self.client_rect(id);
        for child in children {
            if !self.is_alive(child) || !self.is_visible(child) {
                continue;
            }
            area = self.layout(child, area);
            if self.is_alive(child) {
                self.perform_layout(child);
            }
        }
    }

    /// Lets the control resize itself ahead of its parent's layout pass.
    ///
    /// Size changes made by the widget here do not trigger a parent layout.
    pub fn perform_size(&mut self, id: ControlId) {
        self.validate(id);
        let idx = id.idx as usize;
        let Some(mut widget) = self.take_widget(idx) else {
            return;
        };
        self.state[idx].in_auto_size = true;
        widget.perform_size(self, id);
        if self.is_alive(id) {
            self.state[idx].in_auto_size = false;
        }
        self.restore_widget(id, widget);
    }

    /// Positions `id` inside `area` and returns the area left for later
    /// siblings.
    ///
    /// Dispatches to the control's widget, whose default is
    /// [`dock_layout`](Self::dock_layout).
    pub fn layout(&mut self, id: ControlId, area: IntRect) -> IntRect {
        self.validate(id);
        match self.take_widget(id.idx as usize) {
            Some(mut widget) => {
                let remaining = widget.layout(self, id, area);
                self.restore_widget(id, widget);
                remaining
            }
            None => self.dock_layout(id, area),
        }
    }

    /// Positions `id` inside `area` according to its [`DockType`] and
    /// returns the area left for later siblings.
    ///
    /// A size change fires [`Resize`](crate::event::ControlEvent::Resize) and
    /// reallocates an owned surface. The parent is not laid out again.
    pub fn dock_layout(&mut self, id: ControlId, area: IntRect) -> IntRect {
        self.validate(id);
        let area = area.clamped();
        let props = &self.props[id.idx as usize];
        let own = props.bounds;
        let percent = props.dock_percent;

        let (ws, hs) = if percent > 0.0 {
            (scale(area.width, percent), scale(area.height, percent))
        } else {
            (own.width, own.height)
        };
        let ws = ws.min(area.width);
        let hs = hs.min(area.height);
        let hl = own.height.min(area.height);

        let (bounds, remaining) = match props.dock {
            DockType::None => (own, area),
            DockType::Fill => (area, IntRect::ZERO),
            DockType::Center => {
                let w = own.width.min(area.width);
                let h = own.height.min(area.height);
                let xc = (area.left() + area.right()) / 2;
                let yc = (area.top() + area.bottom()) / 2;
                (IntRect::new(xc - w / 2, yc - h / 2, w, h), area)
            }
            DockType::Left => (
                IntRect::new(area.x, area.y, ws, area.height),
                IntRect::new(area.x + ws, area.y, area.width - ws, area.height),
            ),
            DockType::LeftCenter => (
                IntRect::new(area.x, area.y + area.height / 2 - hl / 2, ws, hl),
                IntRect::new(area.x + ws, area.y, area.width - ws, area.height),
            ),
            DockType::Right => (
                IntRect::new(area.right() - ws, area.y, ws, area.height),
                IntRect::new(area.x, area.y, area.width - ws, area.height),
            ),
            DockType::RightCenter => (
                IntRect::new(area.right() - ws, area.y + area.height / 2 - hl / 2, ws, hl),
                IntRect::new(area.x, area.y, area.width - ws, area.height),
            ),
            DockType::Top => (
                IntRect::new(area.x, area.y, area.width, hs),
                IntRect::new(area.x, area.y + hs, area.width, area.height - hs),
            ),
            DockType::Bottom => (
                IntRect::new(area.x, area.bottom() - hs, area.width, hs),
                IntRect::new(area.x, area.y, area.width, area.height - hs),
            ),
        };

        #[cfg(feature = "trace-rich")]
        self.tracer.layout(&LayoutRecord {
            control: id.idx,
            area_in: area,
            bounds,
            area_out: remaining,
        });

        self.apply_bounds(id.idx, bounds);
        remaining
    }
}

/// `len * percent`, rounded to the nearest pixel and never negative.
fn scale(len: i32, percent: f32) -> i32 {
    let v = f64::from(len.max(0)) * f64::from(percent) + 0.5;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is non-negative and saturates on overflow; truncation rounds it"
    )]
    let v = v as i32;
    v.max(0)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::event::{ControlEvent, EventKind};
    use crate::geometry::{Insets, IntSize};
    use crate::test_util::{CountingLayout, tree};

    /// A detached 100x50 parent with no insets.
    fn parent(t: &mut ControlTree) -> ControlId {
        let p = t.create_control();
        t.set_size(p, IntSize::new(100, 50));
        p
    }

    fn docked(t: &mut ControlTree, p: ControlId, dock: DockType, size: IntSize) -> ControlId {
        let c = t.create_control();
        t.set_size(c, size);
        t.set_dock(c, dock);
        t.add(p, c);
        c
    }

    #[test]
    fn every_dock_type_stays_inside_the_area() {
        let area = IntRect::new(5, 7, 60, 40);
        for dock in [
            DockType::Left,
            DockType::Right,
            DockType::Top,
            DockType::Bottom,
            DockType::Fill,
            DockType::Center,
            DockType::LeftCenter,
            DockType::RightCenter,
        ] {
            for size in [IntSize::new(10, 10), IntSize::new(500, 500)] {
                let mut t = tree();
                let c = t.create_control();
                t.set_size(c, size);
                t.set_dock(c, dock);
                let remaining = t.dock_layout(c, area);
                let b = t.bounds(c);
                assert!(area.contains_rect(b), "{dock:?} {size:?}: {b:?} in {area:?}");
                assert!(
                    area.contains_rect(remaining) || remaining.is_empty(),
                    "{dock:?}: remaining {remaining:?}"
                );
                assert!(b.width >= 0 && b.height >= 0, "{dock:?}: non-negative");
            }
        }
    }

    #[test]
    fn none_leaves_bounds_and_area() {
        let mut t = tree();
        let c = t.create_control();
        t.set_bounds(c, IntRect::new(3, 4, 20, 10));
        let area = IntRect::new(0, 0, 100, 50);
        assert_eq!(t.dock_layout(c, area), area, "area passed on");
        assert_eq!(t.bounds(c), IntRect::new(3, 4, 20, 10), "bounds kept");
    }

    #[test]
    fn fill_exhausts_the_area() {
        let mut t = tree();
        let p = parent(&mut t);
        // Added first, so laid out last.
        let after = docked(&mut t, p, DockType::Left, IntSize::new(10, 10));
        let fill = docked(&mut t, p, DockType::Fill, IntSize::new(10, 10));
        assert_eq!(t.bounds(fill), IntRect::new(0, 0, 100, 50), "fill takes all");
        assert_eq!(t.width(after), 0, "nothing left for later siblings");
    }

    #[test]
    fn siblings_consume_area_in_order() {
        let mut t = tree();
        let p = parent(&mut t);
        t.suspend_layout(p);
        let fill = docked(&mut t, p, DockType::Fill, IntSize::new(1, 1));
        let right = docked(&mut t, p, DockType::Right, IntSize::new(20, 1));
        let left = docked(&mut t, p, DockType::Left, IntSize::new(10, 1));
        t.resume_layout(p);

        assert_eq!(t.bounds(left), IntRect::new(0, 0, 10, 50), "left slice");
        assert_eq!(t.bounds(right), IntRect::new(80, 0, 20, 50), "right slice");
        assert_eq!(t.bounds(fill), IntRect::new(10, 0, 70, 50), "fill gets the rest");

        let mut area = t.client_rect(p);
        area = t.dock_layout(left, area);
        assert_eq!(area.width, 90, "after left");
        area = t.dock_layout(right, area);
        assert_eq!(area.width, 70, "after right");
    }

    #[test]
    fn percent_slices_are_rounded() {
        let mut t = tree();
        let p = parent(&mut t);
        let top = t.create_control();
        t.set_dock(top, DockType::Top);
        t.set_dock_percent(top, 0.25);
        t.add(p, top);
        assert_eq!(t.height(top), 13, "50 * 0.25 = 12.5 rounds to 13");
        assert_eq!(t.width(top), 100, "full width");
    }

    #[test]
    fn center_is_centered_and_clamped() {
        let mut t = tree();
        let p = parent(&mut t);
        let c = docked(&mut t, p, DockType::Center, IntSize::new(20, 80));
        assert_eq!(t.bounds(c), IntRect::new(40, 0, 20, 50), "height clamped");
    }

    #[test]
    fn left_center_is_vertically_centered() {
        let mut t = tree();
        let p = parent(&mut t);
        let c = docked(&mut t, p, DockType::LeftCenter, IntSize::new(10, 20));
        assert_eq!(t.bounds(c), IntRect::new(0, 15, 10, 20), "centered");
        let r = docked(&mut t, p, DockType::RightCenter, IntSize::new(10, 20));
        assert_eq!(t.bounds(r), IntRect::new(90, 15, 10, 20), "right centered");
    }

    #[test]
    fn layout_uses_client_area() {
        let mut t = tree();
        let p = parent(&mut t);
        t.set_margin(p, Insets::uniform(2));
        t.set_border_width(p, 1);
        let c = docked(&mut t, p, DockType::Fill, IntSize::new(1, 1));
        assert_eq!(t.bounds(c), IntRect::new(0, 0, 94, 44), "client-relative");
    }

    #[test]
    fn invisible_children_are_skipped() {
        let mut t = tree();
        let p = parent(&mut t);
        let fill = docked(&mut t, p, DockType::Fill, IntSize::new(1, 1));
        let left = docked(&mut t, p, DockType::Left, IntSize::new(30, 1));
        assert_eq!(t.width(fill), 70, "left consumed 30");
        t.set_visible(left, false);
        assert_eq!(t.width(fill), 100, "hidden left consumes nothing");
    }

    #[test]
    fn degenerate_area_never_goes_negative() {
        let mut t = tree();
        let p = t.create_control();
        t.set_size(p, IntSize::new(4, 4));
        t.set_margin(p, Insets::uniform(5));
        let c = docked(&mut t, p, DockType::Left, IntSize::new(10, 10));
        let b = t.bounds(c);
        assert!(b.width >= 0 && b.height >= 0, "clamped: {b:?}");
    }

    #[test]
    fn layout_resize_fires_event() {
        let mut t = tree();
        let p = parent(&mut t);
        let c = t.create_control();
        let resized = Rc::new(RefCell::new(Vec::new()));
        let r = resized.clone();
        t.add_handler(c, EventKind::Resize, move |tree, id, e| {
            assert_eq!(*e, ControlEvent::Resize, "resize payload");
            r.borrow_mut().push(tree.size(id));
        });
        t.set_dock(c, DockType::Fill);
        t.add(p, c);
        assert_eq!(*resized.borrow(), vec![IntSize::new(100, 50)], "one resize");
    }

    #[derive(Default)]
    struct ResizeCounter(Rc<RefCell<u32>>);

    impl crate::widget::Widget for ResizeCounter {
        fn on_event(&mut self, _tree: &mut ControlTree, _id: ControlId, event: &ControlEvent) {
            if *event == ControlEvent::Resize {
                *self.0.borrow_mut() += 1;
            }
        }
    }

    #[test]
    fn docked_widget_sees_its_own_resize() {
        let mut t = tree();
        let p = parent(&mut t);
        let counter = ResizeCounter::default();
        let seen = counter.0.clone();
        let c = t.create_widget(counter);
        t.set_dock(c, DockType::Fill);
        t.add(p, c);
        assert_eq!(t.size(c), IntSize::new(100, 50), "filled the parent");
        assert_eq!(*seen.borrow(), 1, "resize delivered after layout");

        t.set_dock(c, DockType::None);
        t.set_size(c, IntSize::new(10, 10));
        assert_eq!(*seen.borrow(), 2, "direct resize delivered immediately");
    }

    #[test]
    fn self_sizing_widget_sees_its_own_resize() {
        struct Shrink(Rc<RefCell<u32>>);
        impl crate::widget::Widget for Shrink {
            fn perform_size(&mut self, tree: &mut ControlTree, id: ControlId) {
                tree.set_size(id, IntSize::new(20, 20));
            }
            fn on_event(&mut self, _tree: &mut ControlTree, _id: ControlId, event: &ControlEvent) {
                if *event == ControlEvent::Resize {
                    *self.0.borrow_mut() += 1;
                }
            }
        }

        let mut t = tree();
        let p = parent(&mut t);
        let seen = Rc::new(RefCell::new(0));
        let c = t.create_widget(Shrink(seen.clone()));
        t.add(p, c);
        assert_eq!(t.size(c), IntSize::new(20, 20), "size pass applied");
        assert_eq!(*seen.borrow(), 1, "resize from its own size pass");
    }

    #[test]
    fn perform_size_guard_blocks_parent_relayout() {
        struct Grow;
        impl crate::widget::Widget for Grow {
            fn perform_size(&mut self, tree: &mut ControlTree, id: ControlId) {
                tree.set_width(id, 30);
            }
        }

        let mut t = tree();
        let p = t.create_control();
        let laid_out = Rc::new(RefCell::new(0));
        t.set_widget(p, Some(alloc::boxed::Box::new(CountingLayout(laid_out.clone()))));
        let c = t.create_widget(Grow);
        t.add(p, c);
        // CountingLayout does not size children, so lay out directly.
        *laid_out.borrow_mut() = 0;
        t.layout_children(p);
        assert_eq!(t.width(c), 30, "widget resized itself");
        assert_eq!(*laid_out.borrow(), 0, "no re-entrant parent layout");
    }
}
