// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window root: input routing, painting and presentation.
//!
//! A [`Display`] owns a [`ControlTree`], a frame surface the size of the
//! window, and a [`Presenter`]. Platform glue feeds it raw input and paint
//! callbacks:
//!
//! ```text
//!   host input ──► Display::mouse_* / key_* ──► ControlTree::dispatch
//!                          │
//!                          └─► Presenter::invalidate   (render requested)
//!
//!   paint callback ──► Display::paint
//!                          ├─ collect:  drain REDRAW / TOPOLOGY channels
//!                          ├─ redraw:   top-level controls into their surfaces
//!                          ├─ compose:  root background + surfaces, bottom first
//!                          └─ present:  Presenter::present(frame, damage)
//! ```
//!
//! # Mouse routing
//!
//! The target of a pointer event is the control capturing the mouse, or else
//! the deepest enabled control under the pointer. Pressing a button over a
//! control captures the mouse implicitly until the button is released, and
//! focuses the control if it is focusable. Releasing over the control that
//! was pressed also delivers a click. Locations are converted to the
//! target's client coordinates.
//!
//! Disabled controls receive no input.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::{DamageRegion, Presenter};
use crate::color::Color;
use crate::control::{ControlId, ControlTree};
use crate::dirty;
use crate::event::{ControlEvent, KeyEvent, MouseButtons, MouseEvent};
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::surface::{Surface, SurfaceAllocator};
use crate::time::HostTime;
use crate::trace::{FrameSummaryBuilder, PaintTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind};

/// Startup options for a [`Display`].
#[derive(Clone, Copy, Debug)]
pub struct DisplayConfig {
    /// Initial window size in pixels.
    pub size: IntSize,
    /// Back color of the root control.
    pub back_color: Color,
    /// Clock used to timestamp paint phases. Without one, every phase is
    /// stamped with the paint tick's time.
    pub clock: Option<fn() -> HostTime>,
    /// Deliver a key press after every key down that carries a character.
    pub synthesize_key_press: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            size: IntSize::new(800, 600),
            back_color: Color::BLACK,
            clock: None,
            synthesize_key_press: true,
        }
    }
}

/// What a call to [`Display::paint`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame counter, starting at zero.
    pub frame_index: u64,
    /// Slot indices of controls invalidated since the previous paint.
    pub invalidated: Vec<u32>,
    /// Slot indices of controls whose children changed since the previous
    /// paint, including slots freed by destruction.
    pub topology: Vec<u32>,
    /// Whether any top-level control redrew.
    pub redrawn: bool,
    /// The damage handed to the presenter.
    pub damage: DamageRegion,
}

/// The root of a window.
pub struct Display {
    tree: ControlTree,
    frame: Box<dyn Surface>,
    presenter: Box<dyn Presenter>,
    config: DisplayConfig,
    frame_index: u64,
    /// A frame has been requested from the presenter and not yet painted.
    invalidation_sent: bool,
    /// The next frame must be presented in full.
    full_damage: bool,
    /// The current capture was taken by a button press.
    implicit_capture: bool,
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("tree", &self.tree)
            .field("frame", &self.frame.size())
            .field("frame_index", &self.frame_index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Display {
    /// Creates a display with an empty root of `config.size`.
    ///
    /// All surfaces, including the frame, come from `allocator`.
    #[must_use]
    pub fn new(
        config: DisplayConfig,
        allocator: Box<dyn SurfaceAllocator>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let mut tree = ControlTree::new(allocator);
        let size = config.size.clamped();
        let root = tree.root();
        tree.set_back_color(root, config.back_color);
        tree.set_bounds(root, IntRect::from_origin_size(IntPoint::ZERO, size));
        let frame = tree.allocator.allocate(size);
        Self {
            tree,
            frame,
            presenter,
            config,
            frame_index: 0,
            invalidation_sent: false,
            full_damage: true,
            implicit_capture: false,
        }
    }

    /// The control tree.
    #[must_use]
    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    /// The control tree, for building and mutating the UI.
    ///
    /// Changes made through it are picked up by the next
    /// [`paint`](Self::paint). Call [`request_frame`](Self::request_frame)
    /// afterwards to ask the presenter for one.
    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    /// The root control.
    #[must_use]
    pub fn root(&self) -> ControlId {
        self.tree.root()
    }

    /// The most recently composed frame.
    #[must_use]
    pub fn frame(&self) -> &dyn Surface {
        &*self.frame
    }

    /// The options the display was created with.
    #[must_use]
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Number of paints so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Asks the presenter for a frame if a render is requested and none has
    /// been asked for since the last paint.
    pub fn request_frame(&mut self) {
        if self.tree.render_requested() && !self.invalidation_sent {
            self.invalidation_sent = true;
            self.presenter.invalidate();
        }
    }

    // -- Window --

    /// Resizes the window: the root takes the new size, the frame surface is
    /// reallocated, and the root lays out its children again.
    pub fn resize(&mut self, size: IntSize) {
        let size = size.clamped();
        let root = self.tree.root();
        self.tree
            .set_bounds(root, IntRect::from_origin_size(IntPoint::ZERO, size));
        if self.frame.size() != size {
            let frame = self.tree.allocator.allocate(size);
            let old = core::mem::replace(&mut self.frame, frame);
            self.tree.allocator.release(old);
        }
        self.tree.invalidate(root);
        self.tree.perform_layout(root);
        self.full_damage = true;
        self.request_frame();
    }

    // -- Mouse --

    /// The pointer moved to `point` (window coordinates) with `buttons` held.
    pub fn mouse_move(&mut self, point: IntPoint, buttons: MouseButtons) {
        let over = self.enabled_control_at(point);
        self.update_hover(over, point);
        if let Some(target) = self.mouse_target(over) {
            let e = self.mouse_event(target, point, buttons);
            self.tree.dispatch(target, &ControlEvent::MouseMove(e));
        }
        self.request_frame();
    }

    /// `button` went down at `point`. `clicks` is the host's consecutive
    /// click count.
    pub fn mouse_down(&mut self, point: IntPoint, button: MouseButtons, clicks: u32) {
        let over = self.enabled_control_at(point);
        self.update_hover(over, point);
        let Some(target) = self.mouse_target(over) else {
            self.request_frame();
            return;
        };

        if self.live_capture().is_none() {
            self.tree.capture = Some(target);
            self.implicit_capture = true;
        }
        self.tree.pressed = Some(target);
        if self.tree.is_focusable(target) {
            self.set_focus(target);
        }

        if self.tree.is_alive(target) {
            self.tree.state[target.idx as usize].mouse_buttons_down |= button;
            let e = MouseEvent {
                clicks,
                ..self.mouse_event(target, point, button)
            };
            self.tree.dispatch(target, &ControlEvent::MouseDown(e));
        }
        self.request_frame();
    }

    /// `button` was released at `point`.
    pub fn mouse_up(&mut self, point: IntPoint, button: MouseButtons) {
        let over = self.enabled_control_at(point);
        let target = self.mouse_target(over);

        if let Some(target) = target {
            let down = &mut self.tree.state[target.idx as usize].mouse_buttons_down;
            *down = down.without(button);
            let e = self.mouse_event(target, point, button);
            self.tree.dispatch(target, &ControlEvent::MouseUp(e));

            let pressed = self.tree.pressed.take();
            if pressed == Some(target) && over == Some(target) && self.tree.is_alive(target) {
                let e = MouseEvent {
                    clicks: 1,
                    ..self.mouse_event(target, point, button)
                };
                self.tree.dispatch(target, &ControlEvent::MouseClick(e));
            }
        }

        if core::mem::take(&mut self.implicit_capture) {
            self.tree.capture = None;
        }
        let over = self.enabled_control_at(point);
        self.update_hover(over, point);
        self.request_frame();
    }

    /// The wheel turned by `delta` at `point`.
    pub fn mouse_wheel(&mut self, point: IntPoint, delta: i32) {
        let over = self.enabled_control_at(point);
        if let Some(target) = self.mouse_target(over) {
            let e = MouseEvent {
                wheel_delta: delta,
                ..self.mouse_event(target, point, MouseButtons::NONE)
            };
            self.tree.dispatch(target, &ControlEvent::MouseWheel(e));
        }
        self.request_frame();
    }

    /// The pointer left the window.
    pub fn mouse_leave(&mut self, point: IntPoint) {
        self.update_hover(None, point);
        self.request_frame();
    }

    // -- Keyboard --

    /// A key went down. Goes to the focused control, or the root.
    pub fn key_down(&mut self, key: KeyEvent) {
        let target = self.key_target();
        if self.tree.is_enabled(target) {
            self.tree.dispatch(target, &ControlEvent::KeyDown(key));
        }
        if self.config.synthesize_key_press && key.character.is_some() {
            self.key_press(key);
        } else {
            self.request_frame();
        }
    }

    /// A key was released.
    pub fn key_up(&mut self, key: KeyEvent) {
        let target = self.key_target();
        if self.tree.is_enabled(target) {
            self.tree.dispatch(target, &ControlEvent::KeyUp(key));
        }
        self.request_frame();
    }

    /// A character was typed.
    pub fn key_press(&mut self, key: KeyEvent) {
        let target = self.key_target();
        if self.tree.is_enabled(target) {
            self.tree.dispatch(target, &ControlEvent::KeyPress(key));
        }
        self.request_frame();
    }

    // -- Focus and capture --

    /// Moves keyboard focus to `id`.
    ///
    /// The previously focused control receives `FocusChanged(false)`, then
    /// `id` receives `FocusChanged(true)`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_focus(&mut self, id: ControlId) {
        self.tree.validate(id);
        self.move_focus(Some(id));
    }

    /// Removes keyboard focus from whichever control holds it.
    pub fn clear_focus(&mut self) {
        self.move_focus(None);
    }

    /// Routes all mouse events to `id` until
    /// [`release_capture`](Self::release_capture).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_capture(&mut self, id: ControlId) {
        self.tree.validate(id);
        self.tree.capture = Some(id);
        self.implicit_capture = false;
    }

    /// Releases the capture held by `id`. Does nothing if `id` does not hold
    /// it.
    pub fn release_capture(&mut self, id: ControlId) {
        if self.tree.capture == Some(id) {
            self.tree.capture = None;
            self.implicit_capture = false;
        }
    }

    // -- Paint --

    /// Redraws what changed, composes the frame and presents it.
    pub fn paint(&mut self, now: HostTime) -> FrameReport {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let tick = PaintTickEvent {
            frame_index,
            now,
            render_requested: self.tree.render_requested,
        };
        self.tree.tracer.paint_tick(&tick);
        let mut summary = FrameSummaryBuilder::new(&tick);
        self.tree.render_requested = false;
        self.invalidation_sent = false;

        self.phase_begin(&mut summary, PhaseKind::Collect, frame_index, now);
        let invalidated: Vec<u32> = self
            .tree
            .dirty
            .drain(dirty::REDRAW)
            .deterministic()
            .run()
            .collect();
        let topology: Vec<u32> = self
            .tree
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        self.phase_end(&mut summary, PhaseKind::Collect, frame_index, now);

        self.phase_begin(&mut summary, PhaseKind::Redraw, frame_index, now);
        let root = self.tree.root();
        let full = IntRect::from_origin_size(IntPoint::ZERO, self.frame.size());
        let origin = self.tree.display_control_coords(root, true);
        let mut damage = if core::mem::take(&mut self.full_damage)
            || self.tree.needs_redraw(root)
            || !topology.is_empty()
        {
            DamageRegion::Full
        } else {
            DamageRegion::None
        };
        let tops: Vec<ControlId> = self
            .tree
            .children(root)
            .filter(|&c| self.tree.is_visible(c))
            .collect();
        let mut redrawn = false;
        for &c in &tops {
            if !self.tree.is_alive(c) {
                continue;
            }
            let bounds = self.tree.bounds(c);
            if self.tree.redraw(c, None, bounds, bounds, false) {
                redrawn = true;
                damage.add_rect(bounds.translate(origin.x, origin.y).intersect(full));
            }
        }
        self.phase_end(&mut summary, PhaseKind::Redraw, frame_index, now);

        self.phase_begin(&mut summary, PhaseKind::Compose, frame_index, now);
        if !damage.is_empty() {
            self.compose(&tops, origin, full);
        }
        self.tree.state[root.idx as usize].needs_redraw = false;
        self.phase_end(&mut summary, PhaseKind::Compose, frame_index, now);

        self.phase_begin(&mut summary, PhaseKind::Present, frame_index, now);
        self.presenter.present(&*self.frame, &damage);
        self.phase_end(&mut summary, PhaseKind::Present, frame_index, now);

        summary.set_outcome(u32::try_from(invalidated.len()).unwrap_or(u32::MAX), redrawn);
        self.tree.tracer.frame_summary(&summary.finish());

        // Something invalidated during the paint itself.
        self.request_frame();

        FrameReport {
            frame_index,
            invalidated,
            topology,
            redrawn,
            damage,
        }
    }

    /// Paints the root background and border, blits the top-level surfaces
    /// bottom first, then lets the root's widget paint over them.
    fn compose(&mut self, tops: &[ControlId], origin: IntPoint, full: IntRect) {
        let root = self.tree.root();
        let frame = &mut *self.frame;
        frame.set_clip(full.to_kurbo());
        frame.clear(Color::TRANSPARENT);
        self.tree.draw_box(root.idx as usize, frame, full);
        for &c in tops.iter().rev() {
            if !self.tree.is_alive(c) {
                continue;
            }
            let Some(src) = self.tree.surface(c) else {
                continue;
            };
            let bounds = self.tree.bounds(c).translate(origin.x, origin.y);
            frame.set_clip(bounds.intersect(full).to_kurbo());
            frame.blit(
                src,
                IntRect::from_origin_size(IntPoint::ZERO, src.size()),
                bounds.origin(),
            );
        }
        if let Some(mut widget) = self.tree.take_widget(root.idx as usize) {
            let client = IntRect::new(
                origin.x,
                origin.y,
                self.tree.client_width(root),
                self.tree.client_height(root),
            )
            .clamped();
            frame.set_clip(full.to_kurbo());
            widget.paint(&self.tree, root, client, frame);
            self.tree.restore_widget(root, widget);
        }
    }

    fn stamp(&self, fallback: HostTime) -> HostTime {
        self.config.clock.map_or(fallback, |clock| clock())
    }

    fn phase_begin(
        &mut self,
        summary: &mut FrameSummaryBuilder,
        phase: PhaseKind,
        frame_index: u64,
        now: HostTime,
    ) {
        let timestamp = self.stamp(now);
        summary.phase_begin(phase, timestamp);
        self.tree.tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            timestamp,
        });
    }

    fn phase_end(
        &mut self,
        summary: &mut FrameSummaryBuilder,
        phase: PhaseKind,
        frame_index: u64,
        now: HostTime,
    ) {
        let timestamp = self.stamp(now);
        summary.phase_end(phase, timestamp);
        self.tree.tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            timestamp,
        });
    }

    // -- Routing helpers --

    fn enabled_control_at(&self, point: IntPoint) -> Option<ControlId> {
        let root = self.tree.root();
        self.tree
            .find_control_over(root, point)
            .filter(|&c| self.tree.is_enabled(c))
    }

    fn live_capture(&self) -> Option<ControlId> {
        self.tree.capture.filter(|&c| self.tree.is_alive(c))
    }

    fn mouse_target(&self, over: Option<ControlId>) -> Option<ControlId> {
        self.live_capture()
            .or(over)
            .filter(|&c| self.tree.is_enabled(c))
    }

    fn key_target(&self) -> ControlId {
        self.tree
            .focus
            .filter(|&c| self.tree.is_alive(c))
            .unwrap_or(self.tree.root())
    }

    /// Builds a mouse event with `point` restated in `target`'s client
    /// coordinates.
    fn mouse_event(&self, target: ControlId, point: IntPoint, buttons: MouseButtons) -> MouseEvent {
        let origin = self.tree.display_control_coords(target, true);
        let location = IntPoint::new(point.x - origin.x, point.y - origin.y);
        let non_client = location.x < 0
            || location.y < 0
            || location.x >= self.tree.client_width(target)
            || location.y >= self.tree.client_height(target);
        MouseEvent {
            location,
            window_location: point,
            buttons,
            clicks: 0,
            wheel_delta: 0,
            non_client,
        }
    }

    fn update_hover(&mut self, over: Option<ControlId>, point: IntPoint) {
        let old = self.tree.hover.filter(|&c| self.tree.is_alive(c));
        if old == over {
            return;
        }
        self.tree.hover = over;
        if let Some(old) = old {
            self.tree.state[old.idx as usize].hover = false;
            if self.tree.is_enabled(old) {
                self.tree
                    .dispatch(old, &ControlEvent::MouseLeave(MouseEvent::at(point)));
            }
        }
        if let Some(new) = over {
            if self.tree.is_alive(new) && self.tree.hover == Some(new) {
                self.tree.state[new.idx as usize].hover = true;
                self.tree
                    .dispatch(new, &ControlEvent::MouseEnter(MouseEvent::at(point)));
            }
        }
    }

    fn move_focus(&mut self, to: Option<ControlId>) {
        let old = self.tree.focus.filter(|&c| self.tree.is_alive(c));
        if old == to {
            return;
        }
        self.tree.focus = to;
        if let Some(old) = old {
            self.tree.state[old.idx as usize].focused = false;
            self.tree.dispatch(old, &ControlEvent::FocusChanged(false));
        }
        if let Some(new) = to {
            if self.tree.is_alive(new) && self.tree.focus == Some(new) {
                self.tree.state[new.idx as usize].focused = true;
                self.tree.dispatch(new, &ControlEvent::FocusChanged(true));
            }
        }
        self.request_frame();
    }
}
