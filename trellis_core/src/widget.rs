// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-control behavior.
//!
//! A [`Widget`] customizes how a control sizes itself, lays out its children,
//! paints, and reacts to events. Every method has a default matching a plain
//! control, so a widget only overrides what it needs.
//!
//! While one of its methods runs, the widget is taken out of the tree. Calls
//! that re-enter the same control in the meantime fall back to the defaults,
//! and events dispatched to it are handed to [`Widget::on_event`] once the
//! method returns.

use core::any::Any;

use crate::control::{ControlId, ControlTree};
use crate::event::ControlEvent;
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::surface::{Backing, Surface};

/// Behavior attached to a control.
///
/// Recover the concrete type with [`ControlTree::widget`].
pub trait Widget: Any {
    /// Resizes the control before its parent positions it.
    ///
    /// Runs when the parent lays out, for visible controls only. Size changes
    /// made here do not re-enter the parent's layout.
    fn perform_size(&mut self, tree: &mut ControlTree, id: ControlId) {
        _ = (tree, id);
    }

    /// Positions the control inside `area` and returns what is left for
    /// later siblings.
    fn layout(&mut self, tree: &mut ControlTree, id: ControlId, area: IntRect) -> IntRect {
        tree.dock_layout(id, area)
    }

    /// Lays out the control's children.
    fn perform_layout(&mut self, tree: &mut ControlTree, id: ControlId) {
        tree.layout_children(id);
    }

    /// Paints the client area, after background, border and children.
    ///
    /// `client` is in `surface` coordinates and the surface is clipped to the
    /// control's visible region.
    fn paint(
        &mut self,
        tree: &ControlTree,
        id: ControlId,
        client: IntRect,
        surface: &mut dyn Surface,
    ) {
        _ = (tree, id, client, surface);
    }

    /// Paints from the control's own surface into its parent's.
    ///
    /// Only called for controls that own a surface and are drawn beneath
    /// another level. `area` is the control's bounds on `parent`, which is
    /// clipped to them.
    fn paint_parent(
        &mut self,
        tree: &ControlTree,
        id: ControlId,
        own: &dyn Surface,
        area: IntRect,
        parent: &mut dyn Surface,
    ) {
        _ = (tree, id, own, area, parent);
    }

    /// Reacts to an event before registered handlers run.
    fn on_event(&mut self, tree: &mut ControlTree, id: ControlId, event: &ControlEvent) {
        _ = (tree, id, event);
    }

    /// Offset applied to children for hit testing, in client coordinates.
    fn child_offset(&self) -> IntPoint {
        IntPoint::ZERO
    }
}

/// Pixels scrolled per wheel notch.
const WHEEL_STEP: i32 = 20;

/// Wheel delta reported for one notch.
const WHEEL_NOTCH: i32 = 120;

/// A vertically scrolling container.
///
/// The panel draws its content into a self-managed surface as tall as the
/// content and paints a window of it, starting at the scroll position, into
/// its parent. A scroll panel can therefore not be a direct child of the
/// root.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollPanel {
    scroll_pos: i32,
}

impl ScrollPanel {
    /// Creates a detached scroll panel control.
    pub fn create(tree: &mut ControlTree) -> ControlId {
        let id = tree.create_widget(Self::default());
        let size = tree.size(id);
        tree.set_self_managed_surface(id, size);
        id
    }

    /// Current scroll offset in pixels from the top of the content.
    #[must_use]
    pub fn scroll_pos(&self) -> i32 {
        self.scroll_pos
    }

    /// Largest valid scroll offset for the panel `id`.
    #[must_use]
    pub fn max_scroll(tree: &ControlTree, id: ControlId) -> i32 {
        let content = tree.surface(id).map_or(0, |s| s.size().height);
        (content - tree.height(id)).max(0)
    }

    /// Scrolls the panel `id` to `pos`, clamped to the valid range, and
    /// repaints it.
    ///
    /// Does nothing if `id` is not a scroll panel.
    pub fn scroll_to(tree: &mut ControlTree, id: ControlId, pos: i32) {
        let max = Self::max_scroll(tree, id);
        let Some(panel) = tree.widget_mut::<Self>(id) else {
            return;
        };
        let pos = pos.clamp(0, max);
        if panel.scroll_pos != pos {
            panel.scroll_pos = pos;
            repaint_through(tree, id);
        }
    }

    fn content_size(tree: &ControlTree, id: ControlId) -> IntSize {
        let content = tree.child_area(id).map_or(0, |a| a.bottom());
        let height = tree.client_top_margin(id)
            + content.max(tree.client_height(id))
            + tree.client_bottom_margin(id);
        IntSize::new(tree.width(id), height).clamped()
    }
}

/// Invalidates the panel and its parent so the scrolled window is repainted
/// onto a fresh parent background.
fn repaint_through(tree: &mut ControlTree, id: ControlId) {
    tree.invalidate(id);
    if let Some(parent) = tree.parent(id) {
        tree.invalidate(parent);
    }
}

impl Widget for ScrollPanel {
    fn perform_layout(&mut self, tree: &mut ControlTree, id: ControlId) {
        tree.layout_children(id);
        if !tree.is_alive(id) {
            return;
        }
        let size = Self::content_size(tree, id);
        let current = match tree.backing(id) {
            Backing::SelfManaged(s) => Some(s.size()),
            _ => None,
        };
        if current != Some(size) {
            tree.set_self_managed_surface(id, size);
        }
        self.scroll_pos = self.scroll_pos.clamp(0, (size.height - tree.height(id)).max(0));
    }

    fn paint_parent(
        &mut self,
        _tree: &ControlTree,
        _id: ControlId,
        own: &dyn Surface,
        area: IntRect,
        parent: &mut dyn Surface,
    ) {
        let window = IntRect::new(0, self.scroll_pos, area.width, area.height);
        parent.blit(own, window, area.origin());
    }

    fn on_event(&mut self, tree: &mut ControlTree, id: ControlId, event: &ControlEvent) {
        if let ControlEvent::MouseWheel(m) = event {
            let max = Self::max_scroll(tree, id);
            let pos = (self.scroll_pos - m.wheel_delta * WHEEL_STEP / WHEEL_NOTCH).clamp(0, max);
            if pos != self.scroll_pos {
                self.scroll_pos = pos;
                repaint_through(tree, id);
            }
        }
    }

    fn child_offset(&self) -> IntPoint {
        IntPoint::new(0, -self.scroll_pos)
    }
}
