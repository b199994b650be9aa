// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for controls with allocation, topology, and property management.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{ControlId, INVALID};
use super::props::{ControlProps, ControlState, DockType, Gradient, InvalidateOn};
use super::traverse::{Children, Descendants};
use crate::color::{Color, Font};
use crate::dirty;
use crate::event::{ControlEvent, HandlerEntry, MouseButtons};
use crate::geometry::{IntPoint, IntRect, IntSize, Margin, Padding};
use crate::surface::{Backing, Surface, SurfaceAllocator};
use crate::trace::{InvalidateEvent, SurfaceChange, SurfaceEvent, Tracer};
use crate::widget::Widget;

/// Storage for every control in a window.
///
/// Controls are addressed by [`ControlId`] handles. Topology lives in
/// parallel index arrays; destroyed controls are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// The tree is created with a single root control representing the display
/// surface. Direct children of the root always own a backing surface from the
/// tree's [`SurfaceAllocator`].
pub struct ControlTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Per-control data --
    pub(crate) props: Vec<ControlProps>,
    pub(crate) state: Vec<ControlState>,
    pub(crate) backings: Vec<Backing>,
    pub(crate) widgets: Vec<Option<Box<dyn Widget>>>,
    /// `Some` while the control's widget is out of its slot; collects the
    /// events dispatched to the control meanwhile.
    pub(crate) pending_events: Vec<Option<Vec<ControlEvent>>>,
    pub(crate) handlers: Vec<Vec<HandlerEntry>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) next_handler: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Services --
    pub(crate) allocator: Box<dyn SurfaceAllocator>,
    pub(crate) tracer: Tracer,

    // -- Display state --
    pub(crate) root: ControlId,
    pub(crate) render_requested: bool,
    pub(crate) focus: Option<ControlId>,
    pub(crate) capture: Option<ControlId>,
    pub(crate) hover: Option<ControlId>,
    pub(crate) pressed: Option<ControlId>,
}

impl fmt::Debug for ControlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("root", &self.root)
            .field("render_requested", &self.render_requested)
            .field("focus", &self.focus)
            .field("capture", &self.capture)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}

impl ControlTree {
    /// Creates a tree holding only the root control.
    ///
    /// Backing surfaces for the root's children come from `allocator`.
    #[must_use]
    pub fn new(allocator: Box<dyn SurfaceAllocator>) -> Self {
        let mut tree = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            props: Vec::new(),
            state: Vec::new(),
            backings: Vec::new(),
            widgets: Vec::new(),
            pending_events: Vec::new(),
            handlers: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            next_handler: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            allocator,
            tracer: Tracer::none(),
            root: ControlId {
                idx: INVALID,
                generation: 0,
            },
            render_requested: false,
            focus: None,
            capture: None,
            hover: None,
            pressed: None,
        };
        let root = tree.create_control();
        tree.props[root.idx as usize].name = String::from("display");
        tree.root = root;
        tree
    }

    /// Installs a trace sink wrapper, replacing the current one.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    /// Returns the tracer for emitting events from outside the tree.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Returns the root control.
    #[inline]
    #[must_use]
    pub fn root(&self) -> ControlId {
        self.root
    }

    /// Returns `true` if something attached to the root was invalidated since
    /// the last paint.
    #[inline]
    #[must_use]
    pub fn render_requested(&self) -> bool {
        self.render_requested
    }

    /// The control holding keyboard focus, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ControlId> {
        self.focus
    }

    /// The control capturing the mouse, if any.
    #[must_use]
    pub fn capture(&self) -> Option<ControlId> {
        self.capture
    }

    /// The control under the pointer, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<ControlId> {
        self.hover
    }

    // -- Allocation API --

    /// Creates a detached control and returns its handle.
    ///
    /// The control starts with bounds `(0, 0, 100, 100)`, a transparent
    /// background, no widget, and `needs_redraw` set.
    pub fn create_control(&mut self) -> ControlId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.props[i] = ControlProps::default();
            self.state[i] = ControlState::default();
            self.backings[i] = Backing::Inherited;
            self.widgets[i] = None;
            self.pending_events[i] = None;
            self.handlers[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.props.push(ControlProps::default());
            self.state.push(ControlState::default());
            self.backings.push(Backing::Inherited);
            self.widgets.push(None);
            self.pending_events.push(None);
            self.handlers.push(Vec::new());
            self.generation.push(0);
            idx
        };

        self.dirty.mark(idx, dirty::REDRAW);

        ControlId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Creates a detached control driven by `widget`.
    pub fn create_widget(&mut self, widget: impl Widget) -> ControlId {
        let id = self.create_control();
        self.widgets[id.idx as usize] = Some(Box::new(widget));
        id
    }

    /// Destroys a control and its whole subtree, releasing owned surfaces.
    ///
    /// An attached control is first removed from its parent, exactly as by
    /// [`remove`](Self::remove).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or refers to the root.
    pub fn destroy(&mut self, id: ControlId) {
        self.validate(id);
        assert!(id != self.root, "cannot destroy the root control");
        match self.parent(id) {
            Some(parent) => self.remove(parent, id),
            None => {
                self.forget_subtree(id.idx);
                self.destroy_subtree(id.idx);
            }
        }
    }

    /// Returns whether the given handle refers to a live control.
    #[must_use]
    pub fn is_alive(&self, id: ControlId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    // -- Topology API --

    /// Adds `child` to `parent` as its topmost child.
    ///
    /// A child of the root receives its own backing surface, sized to its
    /// bounds, if it does not already own one. The parent receives
    /// [`ControlEvent::ControlAdded`], is invalidated, and re-runs its layout.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, if
    /// `child` is the root or an ancestor of `parent`, or if `child` holds a
    /// self-managed surface and `parent` is the root.
    pub fn add(&mut self, parent: ControlId, child: ControlId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(child != self.root, "the root control cannot be a child");
        assert!(
            !self.is_ancestor_or_self(c, p),
            "cannot add a control beneath itself"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = self.first_child[p as usize];
        if self.first_child[p as usize] != INVALID {
            self.prev_sibling[self.first_child[p as usize] as usize] = c;
        }
        self.first_child[p as usize] = c;
        self.dirty.mark(p, dirty::TOPOLOGY);

        if parent == self.root {
            assert!(
                !matches!(self.backings[c as usize], Backing::SelfManaged(_)),
                "a control with a self-managed surface cannot be a direct child of the root"
            );
            if !self.backings[c as usize].is_owned() {
                let size = self.props[c as usize].bounds.size();
                let surface = self.allocate_surface(c, size);
                self.backings[c as usize] = Backing::Owned(surface);
            }
        }

        self.dispatch(parent, &ControlEvent::ControlAdded(child));
        if self.is_alive(parent) {
            self.invalidate(parent);
            self.perform_layout(parent);
        }
    }

    /// Removes and destroys `child` if it is a child of `parent`; otherwise
    /// does nothing.
    ///
    /// The parent receives [`ControlEvent::ControlRemoved`] before the child
    /// is unlinked. Focus, capture and hover pointing into the removed subtree
    /// are cleared, every owned surface in it is released, and the parent is
    /// invalidated and laid out again.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn remove(&mut self, parent: ControlId, child: ControlId) {
        self.validate(parent);
        self.validate(child);
        if self.parent[child.idx as usize] != parent.idx {
            return;
        }

        self.dispatch(parent, &ControlEvent::ControlRemoved(child));
        if !self.is_alive(parent) {
            return;
        }
        if self.is_alive(child) && self.parent[child.idx as usize] == parent.idx {
            self.forget_subtree(child.idx);
            self.unlink_from_parent(child.idx);
            self.destroy_subtree(child.idx);
            self.dirty.mark(parent.idx, dirty::TOPOLOGY);
        }

        self.invalidate(parent);
        self.perform_layout(parent);
    }

    /// Returns the parent of a control, if any.
    #[must_use]
    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a control, topmost
    /// first.
    #[must_use]
    pub fn children(&self, id: ControlId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns a depth-first iterator over `id` and all its descendants.
    #[must_use]
    pub fn descendants(&self, id: ControlId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns `true` if the control is the root or has the root as an
    /// ancestor.
    #[must_use]
    pub fn is_attached(&self, id: ControlId) -> bool {
        self.validate(id);
        self.is_ancestor_or_self(self.root.idx, id.idx)
    }

    /// Finds the first control named `name` in `under`'s subtree, searching
    /// depth-first in z-order.
    #[must_use]
    pub fn find_by_name(&self, under: ControlId, name: &str) -> Option<ControlId> {
        self.descendants(under)
            .find(|c| self.props[c.idx as usize].name == name)
    }

    /// Lists the name and `needs_redraw` flag of `id` and every descendant,
    /// depth-first.
    #[must_use]
    pub fn debug_redraw_flags(&self, id: ControlId) -> Vec<(&str, bool)> {
        self.descendants(id)
            .map(|c| {
                let i = c.idx as usize;
                (self.props[i].name.as_str(), self.state[i].needs_redraw)
            })
            .collect()
    }

    // -- Widget API --

    /// Returns the widget of type `W` driving `id`, if any.
    #[must_use]
    pub fn widget<W: Widget>(&self, id: ControlId) -> Option<&W> {
        self.validate(id);
        let widget: &dyn Widget = self.widgets[id.idx as usize].as_deref()?;
        let any: &dyn core::any::Any = widget;
        any.downcast_ref::<W>()
    }

    /// Returns the widget of type `W` driving `id` mutably, if any.
    #[must_use]
    pub fn widget_mut<W: Widget>(&mut self, id: ControlId) -> Option<&mut W> {
        self.validate(id);
        let widget: &mut dyn Widget = self.widgets[id.idx as usize].as_deref_mut()?;
        let any: &mut dyn core::any::Any = widget;
        any.downcast_mut::<W>()
    }

    /// Replaces the widget driving `id`, returning the previous one.
    pub fn set_widget(
        &mut self,
        id: ControlId,
        widget: Option<Box<dyn Widget>>,
    ) -> Option<Box<dyn Widget>> {
        self.validate(id);
        let old = core::mem::replace(&mut self.widgets[id.idx as usize], widget);
        self.invalidate(id);
        old
    }

    // -- Surface API --

    /// Returns the backing of a control.
    #[must_use]
    pub fn backing(&self, id: ControlId) -> &Backing {
        self.validate(id);
        &self.backings[id.idx as usize]
    }

    /// Returns the surface owned by a control, if any.
    #[must_use]
    pub fn surface(&self, id: ControlId) -> Option<&dyn Surface> {
        self.backing(id).surface()
    }

    /// Gives `id` a surface of `size` that the tree never resizes, releasing
    /// any surface it already owned.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the control is a direct child of the
    /// root.
    pub fn set_self_managed_surface(&mut self, id: ControlId, size: IntSize) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] != self.root.idx,
            "a control with a self-managed surface cannot be a direct child of the root"
        );
        let surface = self.allocate_surface(id.idx, size.clamped());
        let mut old = core::mem::replace(
            &mut self.backings[id.idx as usize],
            Backing::SelfManaged(surface),
        );
        if let Some(old) = old.take_surface() {
            self.release_surface(id.idx, old);
        }
        self.invalidate(id);
    }

    // -- Geometry getters --

    /// Bounds in the parent's client coordinates.
    #[must_use]
    pub fn bounds(&self, id: ControlId) -> IntRect {
        self.validate(id);
        self.props[id.idx as usize].bounds
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self, id: ControlId) -> i32 {
        self.bounds(id).left()
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self, id: ControlId) -> i32 {
        self.bounds(id).top()
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self, id: ControlId) -> i32 {
        self.bounds(id).right()
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self, id: ControlId) -> i32 {
        self.bounds(id).bottom()
    }

    /// Width including margin, border and padding.
    #[must_use]
    pub fn width(&self, id: ControlId) -> i32 {
        self.bounds(id).width
    }

    /// Height including margin, border and padding.
    #[must_use]
    pub fn height(&self, id: ControlId) -> i32 {
        self.bounds(id).height
    }

    /// Top-left corner.
    #[must_use]
    pub fn location(&self, id: ControlId) -> IntPoint {
        self.bounds(id).origin()
    }

    /// Bounds size.
    #[must_use]
    pub fn size(&self, id: ControlId) -> IntSize {
        self.bounds(id).size()
    }

    // -- Geometry setters --

    /// Moves and resizes a control.
    ///
    /// Negative dimensions are clamped to zero. If the rectangle changes, the
    /// control is marked for redraw, an owned surface is reallocated on a size
    /// change (firing [`ControlEvent::Resize`]), the parent is invalidated,
    /// and the parent re-runs its layout unless it is currently sizing its
    /// children.
    pub fn set_bounds(&mut self, id: ControlId, bounds: IntRect) {
        self.validate(id);
        if !self.apply_bounds(id.idx, bounds) || !self.is_alive(id) {
            return;
        }
        let p = self.parent[id.idx as usize];
        if p != INVALID {
            let parent = self.id_at(p);
            self.invalidate(parent);
            if !self.state[id.idx as usize].in_auto_size {
                self.perform_layout(parent);
            }
        }
    }

    /// Sets the left edge, keeping the size.
    pub fn set_left(&mut self, id: ControlId, left: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(left, b.y, b.width, b.height));
    }

    /// Sets the top edge, keeping the size.
    pub fn set_top(&mut self, id: ControlId, top: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(b.x, top, b.width, b.height));
    }

    /// Sets the right edge by changing the width.
    pub fn set_right(&mut self, id: ControlId, right: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(b.x, b.y, right - b.x, b.height));
    }

    /// Sets the bottom edge by changing the height.
    pub fn set_bottom(&mut self, id: ControlId, bottom: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(b.x, b.y, b.width, bottom - b.y));
    }

    /// Sets the width.
    pub fn set_width(&mut self, id: ControlId, width: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(b.x, b.y, width, b.height));
    }

    /// Sets the height.
    pub fn set_height(&mut self, id: ControlId, height: i32) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::new(b.x, b.y, b.width, height));
    }

    /// Moves the control, keeping the size.
    pub fn set_location(&mut self, id: ControlId, location: IntPoint) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::from_origin_size(location, b.size()));
    }

    /// Resizes the control, keeping the location.
    pub fn set_size(&mut self, id: ControlId, size: IntSize) {
        let b = self.bounds(id);
        self.set_bounds(id, IntRect::from_origin_size(b.origin(), size));
    }

    /// Shrinks the control so that it fits within `max`; never grows it.
    pub fn size_clipped(&mut self, id: ControlId, max: IntSize) {
        let b = self.bounds(id);
        self.set_size(
            id,
            IntSize::new(b.width.min(max.width), b.height.min(max.height)),
        );
    }

    // -- Style getters --

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self, id: ControlId) -> &str {
        self.validate(id);
        &self.props[id.idx as usize].name
    }

    /// Background color; the gradient start if a gradient is set.
    #[must_use]
    pub fn back_color(&self, id: ControlId) -> Color {
        self.validate(id);
        self.props[id.idx as usize].back_color
    }

    /// Background gradient, if any.
    #[must_use]
    pub fn back_color_gradient(&self, id: ControlId) -> Option<Gradient> {
        self.validate(id);
        self.props[id.idx as usize].gradient
    }

    /// Border color.
    #[must_use]
    pub fn border_color(&self, id: ControlId) -> Color {
        self.validate(id);
        self.props[id.idx as usize].border_color
    }

    /// Border width in pixels.
    #[must_use]
    pub fn border_width(&self, id: ControlId) -> i32 {
        self.validate(id);
        self.props[id.idx as usize].border_width
    }

    /// Space outside the border.
    #[must_use]
    pub fn margin(&self, id: ControlId) -> Margin {
        self.validate(id);
        self.props[id.idx as usize].margin
    }

    /// Space inside the border.
    #[must_use]
    pub fn padding(&self, id: ControlId) -> Padding {
        self.validate(id);
        self.props[id.idx as usize].padding
    }

    /// Docking mode.
    #[must_use]
    pub fn dock(&self, id: ControlId) -> DockType {
        self.validate(id);
        self.props[id.idx as usize].dock
    }

    /// Docked fraction of the available area; 0 means "use own size".
    #[must_use]
    pub fn dock_percent(&self, id: ControlId) -> f32 {
        self.validate(id);
        self.props[id.idx as usize].dock_percent
    }

    /// Whether the control takes part in layout, drawing and hit testing.
    #[must_use]
    pub fn is_visible(&self, id: ControlId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].visible
    }

    /// Whether the control receives input.
    #[must_use]
    pub fn is_enabled(&self, id: ControlId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].enabled
    }

    /// Whether the control sizes itself before layout.
    #[must_use]
    pub fn auto_size(&self, id: ControlId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].auto_size
    }

    /// Whether a mouse press gives the control keyboard focus.
    #[must_use]
    pub fn is_focusable(&self, id: ControlId) -> bool {
        self.validate(id);
        self.props[id.idx as usize].focusable
    }

    /// Whether the control holds keyboard focus.
    #[must_use]
    pub fn is_focused(&self, id: ControlId) -> bool {
        self.validate(id);
        self.state[id.idx as usize].focused
    }

    /// Whether the pointer is over the control.
    #[must_use]
    pub fn is_hovered(&self, id: ControlId) -> bool {
        self.validate(id);
        self.state[id.idx as usize].hover
    }

    /// Buttons pressed while over the control and not yet released.
    #[must_use]
    pub fn mouse_buttons_down(&self, id: ControlId) -> MouseButtons {
        self.validate(id);
        self.state[id.idx as usize].mouse_buttons_down
    }

    /// Whether the control will repaint on the next redraw pass.
    #[must_use]
    pub fn needs_redraw(&self, id: ControlId) -> bool {
        self.validate(id);
        self.state[id.idx as usize].needs_redraw
    }

    /// Table-layout row hint.
    #[must_use]
    pub fn row(&self, id: ControlId) -> i32 {
        self.validate(id);
        self.props[id.idx as usize].row
    }

    /// Table-layout column hint.
    #[must_use]
    pub fn column(&self, id: ControlId) -> i32 {
        self.validate(id);
        self.props[id.idx as usize].column
    }

    /// Interactions that repaint the control.
    #[must_use]
    pub fn invalidate_on(&self, id: ControlId) -> InvalidateOn {
        self.validate(id);
        self.props[id.idx as usize].invalidate_on
    }

    /// Resolved font: the control's own, or the nearest ancestor's.
    #[must_use]
    pub fn font(&self, id: ControlId) -> Option<&Font> {
        self.validate(id);
        let mut idx = id.idx;
        loop {
            if let Some(font) = &self.props[idx as usize].font {
                return Some(font);
            }
            idx = self.parent[idx as usize];
            if idx == INVALID {
                return None;
            }
        }
    }

    /// The control's own font, ignoring ancestors.
    #[must_use]
    pub fn own_font(&self, id: ControlId) -> Option<&Font> {
        self.validate(id);
        self.props[id.idx as usize].font.as_ref()
    }

    // -- Style setters --

    /// Sets the diagnostic name.
    pub fn set_name(&mut self, id: ControlId, name: impl Into<String>) {
        self.validate(id);
        self.props[id.idx as usize].name = name.into();
    }

    /// Sets the background color.
    pub fn set_back_color(&mut self, id: ControlId, color: Color) {
        self.validate(id);
        if self.props[id.idx as usize].back_color != color {
            self.props[id.idx as usize].back_color = color;
            self.invalidate(id);
        }
    }

    /// Sets or clears the background gradient.
    pub fn set_back_color_gradient(&mut self, id: ControlId, gradient: Option<Gradient>) {
        self.validate(id);
        if self.props[id.idx as usize].gradient != gradient {
            self.props[id.idx as usize].gradient = gradient;
            self.invalidate(id);
        }
    }

    /// Sets the border color.
    pub fn set_border_color(&mut self, id: ControlId, color: Color) {
        self.validate(id);
        if self.props[id.idx as usize].border_color != color {
            self.props[id.idx as usize].border_color = color;
            self.invalidate(id);
        }
    }

    /// Sets the border width and re-runs the control's layout.
    pub fn set_border_width(&mut self, id: ControlId, width: i32) {
        self.validate(id);
        if self.props[id.idx as usize].border_width != width {
            self.props[id.idx as usize].border_width = width;
            self.invalidate_layout(id);
        }
    }

    /// Sets the padding and re-runs the control's layout.
    pub fn set_padding(&mut self, id: ControlId, padding: Padding) {
        self.validate(id);
        if self.props[id.idx as usize].padding != padding {
            self.props[id.idx as usize].padding = padding;
            self.invalidate_layout(id);
        }
    }

    /// Sets the margin and re-runs the control's layout.
    pub fn set_margin(&mut self, id: ControlId, margin: Margin) {
        self.validate(id);
        if self.props[id.idx as usize].margin != margin {
            self.props[id.idx as usize].margin = margin;
            self.invalidate_layout(id);
        }
    }

    /// Sets margin, border and padding together with a single layout pass.
    pub fn set_margin_border_padding(
        &mut self,
        id: ControlId,
        margin: Margin,
        border_width: i32,
        border_color: Color,
        padding: Padding,
    ) {
        self.validate(id);
        let props = &mut self.props[id.idx as usize];
        props.margin = margin;
        props.border_width = border_width;
        props.border_color = border_color;
        props.padding = padding;
        self.invalidate_layout(id);
    }

    /// Sets or clears the control's own font.
    ///
    /// [`ControlEvent::FontChanged`] is delivered to the control and then,
    /// depth-first, to every descendant that inherits it. The control's
    /// layout is re-run.
    pub fn set_font(&mut self, id: ControlId, font: Option<Font>) {
        self.validate(id);
        if self.props[id.idx as usize].font == font {
            return;
        }
        self.props[id.idx as usize].font = font;
        self.propagate_font_changed(id);
        if self.is_alive(id) {
            self.invalidate_layout(id);
        }
    }

    /// Sets the docking mode and re-runs the parent's layout.
    pub fn set_dock(&mut self, id: ControlId, dock: DockType) {
        self.validate(id);
        if self.props[id.idx as usize].dock != dock {
            self.props[id.idx as usize].dock = dock;
            self.invalidate_layout_parent(id);
        }
    }

    /// Sets the docked fraction and re-runs the parent's layout.
    pub fn set_dock_percent(&mut self, id: ControlId, percent: f32) {
        self.validate(id);
        if self.props[id.idx as usize].dock_percent != percent {
            self.props[id.idx as usize].dock_percent = percent;
            self.invalidate_layout_parent(id);
        }
    }

    /// Shows or hides the control and re-runs the parent's layout.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) {
        self.validate(id);
        if self.props[id.idx as usize].visible != visible {
            self.props[id.idx as usize].visible = visible;
            self.invalidate_layout_parent(id);
        }
    }

    /// Enables or disables auto-sizing and re-runs the parent's layout.
    pub fn set_auto_size(&mut self, id: ControlId, auto_size: bool) {
        self.validate(id);
        if self.props[id.idx as usize].auto_size != auto_size {
            self.props[id.idx as usize].auto_size = auto_size;
            self.invalidate_layout_parent(id);
        }
    }

    /// Sets the table row hint and re-runs the parent's layout.
    pub fn set_row(&mut self, id: ControlId, row: i32) {
        self.validate(id);
        if self.props[id.idx as usize].row != row {
            self.props[id.idx as usize].row = row;
            self.invalidate_layout_parent(id);
        }
    }

    /// Sets the table column hint and re-runs the parent's layout.
    pub fn set_column(&mut self, id: ControlId, column: i32) {
        self.validate(id);
        if self.props[id.idx as usize].column != column {
            self.props[id.idx as usize].column = column;
            self.invalidate_layout_parent(id);
        }
    }

    /// Enables or disables the control.
    ///
    /// The new value is written to every descendant, overwriting any state
    /// they held individually.
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        self.validate(id);
        if self.props[id.idx as usize].enabled == enabled {
            return;
        }
        let subtree: Vec<u32> = self.descendants(id).map(|c| c.idx).collect();
        for idx in subtree {
            self.props[idx as usize].enabled = enabled;
        }
        self.invalidate(id);
    }

    /// Sets whether a mouse press focuses the control.
    pub fn set_focusable(&mut self, id: ControlId, focusable: bool) {
        self.validate(id);
        self.props[id.idx as usize].focusable = focusable;
    }

    /// Sets which interactions repaint the control.
    pub fn set_invalidate_on(&mut self, id: ControlId, flags: InvalidateOn) {
        self.validate(id);
        self.props[id.idx as usize].invalidate_on = flags;
    }

    // -- Client area --

    /// Distance from the left bounds edge to the client area.
    #[must_use]
    pub fn client_left_margin(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.margin.left + p.padding.left + p.border_width
    }

    /// Distance from the top bounds edge to the client area.
    #[must_use]
    pub fn client_top_margin(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.margin.top + p.padding.top + p.border_width
    }

    /// Distance from the right bounds edge to the client area.
    #[must_use]
    pub fn client_right_margin(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.margin.right + p.padding.right + p.border_width
    }

    /// Distance from the bottom bounds edge to the client area.
    #[must_use]
    pub fn client_bottom_margin(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.margin.bottom + p.padding.bottom + p.border_width
    }

    /// Client width: bounds width minus margin, padding and both borders.
    ///
    /// May be negative when the insets exceed the bounds.
    #[must_use]
    pub fn client_width(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.bounds.width - p.margin.total_width() - p.padding.total_width() - p.border_width * 2
    }

    /// Client height: bounds height minus margin, padding and both borders.
    ///
    /// May be negative when the insets exceed the bounds.
    #[must_use]
    pub fn client_height(&self, id: ControlId) -> i32 {
        self.validate(id);
        let p = &self.props[id.idx as usize];
        p.bounds.height - p.margin.total_height() - p.padding.total_height() - p.border_width * 2
    }

    /// Client area at the client origin, clamped to a non-negative size.
    #[must_use]
    pub fn client_rect(&self, id: ControlId) -> IntRect {
        IntRect::new(0, 0, self.client_width(id), self.client_height(id)).clamped()
    }

    /// Window-space position of a control's top-left corner, or of its
    /// client origin when `adjust_client` is set.
    ///
    /// Ancestors' [`child_offset`](Widget::child_offset) is included, so the
    /// result matches what hit testing sees.
    #[must_use]
    pub fn display_control_coords(&self, id: ControlId, adjust_client: bool) -> IntPoint {
        self.validate(id);
        let mut point = self.props[id.idx as usize].bounds.origin();
        let mut idx = self.parent[id.idx as usize];
        while idx != INVALID {
            let parent = self.id_at(idx);
            let scroll = self.widgets[idx as usize]
                .as_ref()
                .map_or(IntPoint::ZERO, |w| w.child_offset());
            point = point.offset(
                self.left(parent) + self.client_left_margin(parent) + scroll.x,
                self.top(parent) + self.client_top_margin(parent) + scroll.y,
            );
            idx = self.parent[idx as usize];
        }
        if adjust_client {
            point = point.offset(self.client_left_margin(id), self.client_top_margin(id));
        }
        point
    }

    /// Bounding rectangle of all children, or `None` without children.
    #[must_use]
    pub fn child_area(&self, id: ControlId) -> Option<IntRect> {
        self.children(id)
            .map(|c| self.bounds(c))
            .reduce(IntRect::union)
    }

    // -- Invalidation --

    /// Marks the control for redraw and, if it is attached, requests a render.
    pub fn invalidate(&mut self, id: ControlId) {
        self.validate(id);
        self.mark_redraw(id.idx);
        if self.is_attached(id) {
            self.render_requested = true;
        }
    }

    /// Invalidates the control and re-runs its layout.
    pub fn invalidate_layout(&mut self, id: ControlId) {
        self.invalidate(id);
        self.perform_layout(id);
    }

    /// Invalidates the control and its parent and re-runs the parent's
    /// layout. Detached roots are only marked.
    pub fn invalidate_layout_parent(&mut self, id: ControlId) {
        self.validate(id);
        self.mark_redraw(id.idx);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            return;
        }
        let parent = self.id_at(p);
        self.invalidate(parent);
        self.perform_layout(parent);
    }

    // -- Suspend / resume --

    /// Defers layout passes on this control until
    /// [`resume_layout`](Self::resume_layout).
    pub fn suspend_layout(&mut self, id: ControlId) {
        self.validate(id);
        self.state[id.idx as usize].layout_suspended = true;
    }

    /// Re-enables layout and runs one pass if any was requested while
    /// suspended.
    pub fn resume_layout(&mut self, id: ControlId) {
        self.validate(id);
        let state = &mut self.state[id.idx as usize];
        state.layout_suspended = false;
        if core::mem::take(&mut state.layout_pending) {
            self.perform_layout(id);
        }
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> ControlId {
        ControlId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Sets `needs_redraw` and records the invalidation in the dirty tracker.
    pub(crate) fn mark_redraw(&mut self, idx: u32) {
        self.state[idx as usize].needs_redraw = true;
        self.dirty.mark(idx, dirty::REDRAW);
        self.tracer.invalidate(&InvalidateEvent { control: idx });
    }

    /// Writes new bounds without touching the parent.
    ///
    /// Returns `true` if the bounds changed. A size change reallocates an
    /// owned surface and fires [`ControlEvent::Resize`].
    pub(crate) fn apply_bounds(&mut self, idx: u32, bounds: IntRect) -> bool {
        let bounds = bounds.clamped();
        let old = self.props[idx as usize].bounds;
        if old == bounds {
            return false;
        }
        self.props[idx as usize].bounds = bounds;
        self.mark_redraw(idx);
        if old.size() != bounds.size() {
            if matches!(self.backings[idx as usize], Backing::Owned(_)) {
                let surface = self.allocate_surface(idx, bounds.size());
                let old = core::mem::replace(&mut self.backings[idx as usize], Backing::Owned(surface));
                if let Backing::Owned(old) = old {
                    self.release_surface(idx, old);
                }
            }
            self.dispatch(self.id_at(idx), &ControlEvent::Resize);
        }
        true
    }

    /// Takes a control's widget out of its slot for the duration of a call.
    ///
    /// Until [`restore_widget`](Self::restore_widget), events dispatched to
    /// the control are queued for the widget.
    pub(crate) fn take_widget(&mut self, idx: usize) -> Option<Box<dyn Widget>> {
        let widget = self.widgets[idx].take()?;
        self.pending_events[idx] = Some(Vec::new());
        Some(widget)
    }

    /// Delivers the events queued while the widget was out, then puts it back
    /// in its slot unless the control died or the widget was replaced
    /// meanwhile.
    pub(crate) fn restore_widget(&mut self, id: ControlId, mut widget: Box<dyn Widget>) {
        let idx = id.idx as usize;
        loop {
            if !self.is_alive(id) {
                return;
            }
            let queued = self.pending_events[idx]
                .as_mut()
                .map(core::mem::take)
                .unwrap_or_default();
            if queued.is_empty() {
                break;
            }
            for event in &queued {
                widget.on_event(self, id, event);
                if !self.is_alive(id) {
                    return;
                }
            }
        }
        self.pending_events[idx] = None;
        if self.widgets[idx].is_none() {
            self.widgets[idx] = Some(widget);
        }
    }

    fn allocate_surface(&mut self, idx: u32, size: IntSize) -> Box<dyn Surface> {
        let size = size.clamped();
        self.tracer.surface(&SurfaceEvent {
            control: idx,
            size,
            change: SurfaceChange::Allocated,
        });
        self.allocator.allocate(size)
    }

    fn release_surface(&mut self, idx: u32, surface: Box<dyn Surface>) {
        self.tracer.surface(&SurfaceEvent {
            control: idx,
            size: surface.size(),
            change: SurfaceChange::Released,
        });
        self.allocator.release(surface);
    }

    fn propagate_font_changed(&mut self, id: ControlId) {
        self.dispatch(id, &ControlEvent::FontChanged);
        if !self.is_alive(id) {
            return;
        }
        let inheriting: Vec<ControlId> = self
            .children(id)
            .filter(|c| self.props[c.idx as usize].font.is_none())
            .collect();
        for child in inheriting {
            if self.is_alive(child) {
                self.propagate_font_changed(child);
            }
        }
    }

    /// Returns `true` if `ancestor` is `idx` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: u32, idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Clears focus, capture, hover and pressed references that point into
    /// the subtree rooted at `idx`.
    fn forget_subtree(&mut self, idx: u32) {
        let inside = |tree: &Self, slot: Option<ControlId>| {
            slot.is_some_and(|c| tree.is_alive(c) && tree.is_ancestor_or_self(idx, c.idx))
        };
        if inside(self, self.focus) {
            self.focus = None;
        }
        if inside(self, self.capture) {
            self.capture = None;
        }
        if inside(self, self.hover) {
            self.hover = None;
        }
        if inside(self, self.pressed) {
            self.pressed = None;
        }
    }

    /// Frees every slot in the subtree rooted at the detached control `idx`.
    fn destroy_subtree(&mut self, idx: u32) {
        let subtree: Vec<u32> = Descendants::new(self, idx).map(|c| c.idx).collect();
        for i in subtree {
            if let Some(surface) = self.backings[i as usize].take_surface() {
                self.release_surface(i, surface);
            }
            self.widgets[i as usize] = None;
            self.pending_events[i as usize] = None;
            self.handlers[i as usize].clear();
            self.parent[i as usize] = INVALID;
            self.first_child[i as usize] = INVALID;
            self.next_sibling[i as usize] = INVALID;
            self.prev_sibling[i as usize] = INVALID;

            self.dirty.remove_key(i);
            // Bump generation so old handles immediately fail validation.
            self.generation[i as usize] += 1;
            self.free_list.push(i);
            self.dirty.mark(i, dirty::TOPOLOGY);
        }
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i];
        let prev = self.prev_sibling[i];
        let next = self.next_sibling[i];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.next_sibling[i] = INVALID;
    }

    /// Panics if the handle is stale.
    #[inline]
    pub(crate) fn validate(&self, id: ControlId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ControlId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::event::EventKind;
    use crate::geometry::Insets;
    use crate::test_util::{clear_redraw, tree, tree_with_counts};

    #[test]
    fn create_and_destroy() {
        let mut t = tree();
        let id = t.create_control();
        assert!(t.is_alive(id), "fresh control is alive");
        t.destroy(id);
        assert!(!t.is_alive(id), "destroyed control is dead");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut t = tree();
        let id1 = t.create_control();
        t.destroy(id1);
        let id2 = t.create_control();
        assert!(!t.is_alive(id1), "old handle is stale");
        assert!(t.is_alive(id2), "new handle is live");
        assert_eq!(id1.idx, id2.idx, "slot reused");
        assert_ne!(id1.generation, id2.generation, "generation bumped");
    }

    #[test]
    #[should_panic(expected = "stale ControlId")]
    fn stale_handle_panics() {
        let mut t = tree();
        let id = t.create_control();
        t.destroy(id);
        let _ = t.bounds(id);
    }

    #[test]
    #[should_panic(expected = "cannot destroy the root control")]
    fn destroying_root_panics() {
        let mut t = tree();
        let root = t.root();
        t.destroy(root);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_add_panics() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_control();
        let b = t.create_control();
        t.add(root, a);
        t.add(b, a);
    }

    #[test]
    #[should_panic(expected = "cannot add a control beneath itself")]
    fn cycle_panics() {
        let mut t = tree();
        let a = t.create_control();
        let b = t.create_control();
        t.add(a, b);
        t.add(b, a);
    }

    #[test]
    fn defaults() {
        let mut t = tree();
        let c = t.create_control();
        assert_eq!(t.bounds(c), IntRect::new(0, 0, 100, 100), "default bounds");
        assert!(t.needs_redraw(c), "new controls need a redraw");
        assert!(t.is_visible(c) && t.is_enabled(c), "visible and enabled");
        assert_eq!(t.back_color(c), Color::TRANSPARENT, "transparent back");
        assert_eq!(t.dock(c), DockType::None, "not docked");
    }

    #[test]
    fn add_inserts_topmost() {
        let mut t = tree();
        let p = t.create_control();
        let a = t.create_control();
        let b = t.create_control();
        t.add(p, a);
        t.add(p, b);
        let kids: Vec<_> = t.children(p).collect();
        assert_eq!(kids, vec![b, a], "last added is first (topmost)");
        assert_eq!(t.parent(a), Some(p), "parent link");
    }

    #[test]
    fn root_children_own_a_surface() {
        let (mut t, counts) = tree_with_counts();
        let root = t.root();
        let top = t.create_control();
        let inner = t.create_control();
        t.set_size(top, IntSize::new(40, 30));
        t.add(top, inner);
        t.add(root, top);
        assert!(t.backing(top).is_owned(), "root child owns a surface");
        assert!(!t.backing(inner).is_owned(), "grandchild inherits");
        assert_eq!(
            t.surface(top).map(|s| s.size()),
            Some(IntSize::new(40, 30)),
            "surface sized to bounds"
        );
        assert_eq!(counts.borrow().allocated, 1, "one allocation");
    }

    #[test]
    fn remove_releases_surfaces_and_ids() {
        let (mut t, counts) = tree_with_counts();
        let root = t.root();
        let top = t.create_control();
        let inner = t.create_control();
        t.add(top, inner);
        t.add(root, top);
        t.remove(root, top);
        assert!(!t.is_alive(top) && !t.is_alive(inner), "subtree destroyed");
        assert_eq!(counts.borrow().released, 1, "surface released");
        assert_eq!(t.children(root).count(), 0, "root is empty");
    }

    #[test]
    fn remove_of_non_child_is_noop() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_control();
        let b = t.create_control();
        t.add(root, a);
        t.remove(b, a);
        assert!(t.is_alive(a), "not removed");
        assert_eq!(t.parent(a), Some(root), "still attached");
    }

    #[test]
    fn remove_fires_event_before_unlink() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_control();
        t.add(root, a);
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        t.add_handler(root, EventKind::ControlRemoved, move |tree, _, e| {
            if let ControlEvent::ControlRemoved(child) = e {
                *s.borrow_mut() = Some(tree.parent(*child));
            }
        });
        t.remove(root, a);
        assert_eq!(*seen.borrow(), Some(Some(root)), "child still linked");
    }

    #[test]
    fn remove_clears_display_references() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_control();
        let b = t.create_control();
        t.add(a, b);
        t.add(root, a);
        t.focus = Some(b);
        t.hover = Some(b);
        t.capture = Some(a);
        t.remove(root, a);
        assert_eq!(t.focus, None, "focus cleared");
        assert_eq!(t.hover, None, "hover cleared");
        assert_eq!(t.capture, None, "capture cleared");
    }

    #[test]
    fn setter_marks_redraw_and_invalidates_parent() {
        let mut t = tree();
        let root = t.root();
        let c = t.create_control();
        t.add(root, c);
        clear_redraw(&mut t, c);
        clear_redraw(&mut t, root);
        t.render_requested = false;
        t.set_left(c, 5);
        assert!(t.needs_redraw(c), "control marked");
        assert!(t.needs_redraw(root), "parent marked");
        assert!(t.render_requested(), "render requested");
    }

    #[test]
    fn unchanged_setter_is_noop() {
        let mut t = tree();
        let c = t.create_control();
        t.set_back_color(c, Color::WHITE);
        clear_redraw(&mut t, c);
        t.set_back_color(c, Color::WHITE);
        assert!(!t.needs_redraw(c), "same color does nothing");
        t.set_bounds(c, t.bounds(c));
        assert!(!t.needs_redraw(c), "same bounds does nothing");
    }

    #[test]
    fn negative_size_is_clamped() {
        let mut t = tree();
        let c = t.create_control();
        t.set_width(c, -20);
        assert_eq!(t.width(c), 0, "width clamped to zero");
        t.set_right(c, -5);
        assert_eq!(t.width(c), 0, "right left of left clamps");
    }

    #[test]
    fn resize_reallocates_owned_surface() {
        let (mut t, counts) = tree_with_counts();
        let root = t.root();
        let c = t.create_control();
        t.add(root, c);
        let resized = Rc::new(RefCell::new(0));
        let r = resized.clone();
        t.add_handler(c, EventKind::Resize, move |_, _, _| *r.borrow_mut() += 1);
        t.set_size(c, IntSize::new(64, 48));
        assert_eq!(
            t.surface(c).map(|s| s.size()),
            Some(IntSize::new(64, 48)),
            "new surface matches bounds"
        );
        assert_eq!(counts.borrow().allocated, 2, "initial + resize");
        assert_eq!(counts.borrow().released, 1, "old surface released");
        assert_eq!(*resized.borrow(), 1, "resize event fired once");
        t.set_location(c, IntPoint::new(3, 3));
        assert_eq!(counts.borrow().allocated, 2, "move does not reallocate");
    }

    #[test]
    fn box_model_round_trip() {
        let mut t = tree();
        let c = t.create_control();
        t.set_bounds(c, IntRect::new(0, 0, 200, 120));
        t.set_margin(c, Insets::new(1, 2, 3, 4));
        t.set_padding(c, Insets::new(5, 6, 7, 8));
        t.set_border_width(c, 2);
        let width = t.client_width(c)
            + 2 * t.border_width(c)
            + t.margin(c).total_width()
            + t.padding(c).total_width();
        let height = t.client_height(c)
            + 2 * t.border_width(c)
            + t.margin(c).total_height()
            + t.padding(c).total_height();
        assert_eq!(width, t.width(c), "horizontal box model");
        assert_eq!(height, t.height(c), "vertical box model");
        assert_eq!(t.client_left_margin(c), 1 + 5 + 2, "left margin");
        assert_eq!(t.client_bottom_margin(c), 4 + 8 + 2, "bottom margin");
    }

    #[test]
    fn border_width_relays_out_leaf_synchronously() {
        let mut t = tree();
        let c = t.create_control();
        let laid_out = Rc::new(RefCell::new(0));
        t.set_widget(
            c,
            Some(Box::new(crate::test_util::CountingLayout(laid_out.clone()))),
        );
        clear_redraw(&mut t, c);
        t.set_border_width(c, 3);
        assert_eq!(*laid_out.borrow(), 1, "layout ran during the setter");
        assert!(t.needs_redraw(c), "needs redraw");
    }

    #[test]
    fn display_coords_accumulate_client_offsets() {
        let mut t = tree();
        let a = t.create_control();
        let b = t.create_control();
        t.set_bounds(a, IntRect::new(10, 20, 100, 100));
        t.set_margin(a, Insets::uniform(2));
        t.set_border_width(a, 1);
        t.add(a, b);
        t.set_location(b, IntPoint::new(5, 6));
        assert_eq!(
            t.display_control_coords(b, false),
            IntPoint::new(10 + 3 + 5, 20 + 3 + 6),
            "bounds origin"
        );
        t.set_padding(b, Insets::uniform(4));
        assert_eq!(
            t.display_control_coords(b, true),
            IntPoint::new(10 + 3 + 5 + 4, 20 + 3 + 6 + 4),
            "client origin"
        );
    }

    #[test]
    fn child_area_bounds_children() {
        let mut t = tree();
        let p = t.create_control();
        assert_eq!(t.child_area(p), None, "no children");
        let a = t.create_control();
        let b = t.create_control();
        t.add(p, a);
        t.add(p, b);
        t.set_bounds(a, IntRect::new(5, 5, 10, 10));
        t.set_bounds(b, IntRect::new(20, 0, 5, 30));
        assert_eq!(t.child_area(p), Some(IntRect::new(5, 0, 20, 30)));
    }

    #[test]
    fn font_inherits_and_propagates() {
        let mut t = tree();
        let p = t.create_control();
        let a = t.create_control();
        let b = t.create_control();
        t.add(p, a);
        t.add(p, b);
        t.set_font(b, Some(Font::new("Mono", 10.0)));
        let changed = Rc::new(RefCell::new(Vec::new()));
        for c in [p, a, b] {
            let log = changed.clone();
            t.add_handler(c, EventKind::FontChanged, move |_, id, _| {
                log.borrow_mut().push(id);
            });
        }
        t.set_font(p, Some(Font::new("Sans", 12.0)));
        assert_eq!(t.font(a).map(|f| f.family.as_str()), Some("Sans"), "inherited");
        assert_eq!(t.font(b).map(|f| f.family.as_str()), Some("Mono"), "own font wins");
        assert_eq!(*changed.borrow(), vec![p, a], "own-font child not notified");
    }

    #[test]
    fn enabled_flattens_subtree() {
        let mut t = tree();
        let p = t.create_control();
        let a = t.create_control();
        t.add(p, a);
        t.set_enabled(a, false);
        t.set_enabled(p, false);
        t.set_enabled(p, true);
        assert!(t.is_enabled(a), "child re-enabled with parent");
    }

    #[test]
    fn suspend_batches_layout() {
        let mut t = tree();
        let p = t.create_control();
        let laid_out = Rc::new(RefCell::new(0));
        t.set_widget(
            p,
            Some(Box::new(crate::test_util::CountingLayout(laid_out.clone()))),
        );
        t.suspend_layout(p);
        t.set_border_width(p, 1);
        t.set_padding(p, Insets::uniform(2));
        assert_eq!(*laid_out.borrow(), 0, "suspended");
        t.resume_layout(p);
        assert_eq!(*laid_out.borrow(), 1, "one pass on resume");
        t.suspend_layout(p);
        t.resume_layout(p);
        assert_eq!(*laid_out.borrow(), 1, "no pass when nothing was requested");
    }

    #[test]
    fn find_by_name_and_debug_flags() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_control();
        let b = t.create_control();
        t.set_name(a, "panel");
        t.set_name(b, "button");
        t.add(a, b);
        t.add(root, a);
        assert_eq!(t.find_by_name(root, "button"), Some(b), "found nested");
        assert_eq!(t.find_by_name(root, "missing"), None, "absent");
        let flags = t.debug_redraw_flags(root);
        let names: Vec<&str> = flags.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["display", "panel", "button"], "depth-first");
    }

    #[test]
    fn widget_downcast() {
        let mut t = tree();
        let laid_out = Rc::new(RefCell::new(0));
        let c = t.create_widget(crate::test_util::CountingLayout(laid_out));
        assert!(
            t.widget::<crate::test_util::CountingLayout>(c).is_some(),
            "downcast to the installed type"
        );
        assert!(
            t.widget::<crate::widget::ScrollPanel>(c).is_none(),
            "other types miss"
        );
    }
}
