// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control events and handler dispatch.
//!
//! Every event delivered to a control goes through
//! [`ControlTree::dispatch`], which runs, in order:
//!
//! 1. the control's [`Widget::on_event`](crate::widget::Widget::on_event),
//! 2. handlers registered with [`ControlTree::add_handler`] for the event's
//!    [`EventKind`], in registration order,
//! 3. the control's [`InvalidateOn`](crate::control::InvalidateOn) flags.
//!
//! Handlers receive `&mut ControlTree` and may change anything, including
//! removing the control they are attached to. Handlers added while an event
//! is being dispatched first run for the next event.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use crate::control::{ControlId, ControlTree, HandlerId};
use crate::geometry::IntPoint;
use crate::trace::DispatchEvent;

/// A set of mouse buttons.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    /// No buttons.
    pub const NONE: Self = Self(0);
    /// The primary button.
    pub const LEFT: Self = Self(1);
    /// The secondary button.
    pub const RIGHT: Self = Self(1 << 1);
    /// The middle button or wheel press.
    pub const MIDDLE: Self = Self(1 << 2);

    /// Returns the raw bit set.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if no buttons are set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every button in `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `self` with the buttons in `other` cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MouseButtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::LEFT) {
            set.entry(&"Left");
        }
        if self.contains(Self::RIGHT) {
            set.entry(&"Right");
        }
        if self.contains(Self::MIDDLE) {
            set.entry(&"Middle");
        }
        set.finish()
    }
}

/// Pointer event payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseEvent {
    /// Position relative to the receiving control's client origin.
    ///
    /// For enter and leave events this is the window position instead.
    pub location: IntPoint,
    /// Position in window coordinates.
    pub window_location: IntPoint,
    /// Buttons that changed (down/up/click) or are held (move).
    pub buttons: MouseButtons,
    /// Consecutive click count reported by the host.
    pub clicks: u32,
    /// Wheel movement; positive away from the user.
    pub wheel_delta: i32,
    /// Set when the position falls on the margin, border or padding rather
    /// than inside the client area.
    pub non_client: bool,
}

impl MouseEvent {
    /// Creates an event at a window position with no buttons.
    #[must_use]
    pub fn at(window_location: IntPoint) -> Self {
        Self {
            location: window_location,
            window_location,
            ..Self::default()
        }
    }
}

/// Keyboard modifier state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Either shift key.
    pub shift: bool,
    /// Either control key.
    pub ctrl: bool,
    /// Either alt key.
    pub alt: bool,
}

/// Keyboard event payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host virtual key code.
    pub key_code: u32,
    /// Character produced by the key, if any.
    pub character: Option<char>,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
}

/// An event delivered to a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent {
    /// A mouse button went down over the control.
    MouseDown(MouseEvent),
    /// A mouse button was released.
    MouseUp(MouseEvent),
    /// The pointer moved over the control (or while it holds capture).
    MouseMove(MouseEvent),
    /// A button was pressed and released over the same control.
    MouseClick(MouseEvent),
    /// The wheel turned over the control.
    MouseWheel(MouseEvent),
    /// The pointer entered the control.
    MouseEnter(MouseEvent),
    /// The pointer left the control.
    MouseLeave(MouseEvent),
    /// A key went down while the control had focus.
    KeyDown(KeyEvent),
    /// A key was released while the control had focus.
    KeyUp(KeyEvent),
    /// A character was typed while the control had focus.
    KeyPress(KeyEvent),
    /// Keyboard focus was gained (`true`) or lost (`false`).
    FocusChanged(bool),
    /// The resolved font changed.
    FontChanged,
    /// The bounds size changed.
    Resize,
    /// A child was added to this control.
    ControlAdded(ControlId),
    /// A child is about to be removed from this control.
    ControlRemoved(ControlId),
}

impl ControlEvent {
    /// Returns the payload-free kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::MouseDown(_) => EventKind::MouseDown,
            Self::MouseUp(_) => EventKind::MouseUp,
            Self::MouseMove(_) => EventKind::MouseMove,
            Self::MouseClick(_) => EventKind::MouseClick,
            Self::MouseWheel(_) => EventKind::MouseWheel,
            Self::MouseEnter(_) => EventKind::MouseEnter,
            Self::MouseLeave(_) => EventKind::MouseLeave,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::FocusChanged(_) => EventKind::FocusChanged,
            Self::FontChanged => EventKind::FontChanged,
            Self::Resize => EventKind::Resize,
            Self::ControlAdded(_) => EventKind::ControlAdded,
            Self::ControlRemoved(_) => EventKind::ControlRemoved,
        }
    }

    /// Returns the mouse payload for pointer events.
    #[must_use]
    pub const fn mouse(&self) -> Option<&MouseEvent> {
        match self {
            Self::MouseDown(m)
            | Self::MouseUp(m)
            | Self::MouseMove(m)
            | Self::MouseClick(m)
            | Self::MouseWheel(m)
            | Self::MouseEnter(m)
            | Self::MouseLeave(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the key payload for keyboard events.
    #[must_use]
    pub const fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyDown(k) | Self::KeyUp(k) | Self::KeyPress(k) => Some(k),
            _ => None,
        }
    }
}

/// The kind of a [`ControlEvent`], used to register handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    /// See [`ControlEvent::MouseDown`].
    MouseDown = 0,
    /// See [`ControlEvent::MouseUp`].
    MouseUp = 1,
    /// See [`ControlEvent::MouseMove`].
    MouseMove = 2,
    /// See [`ControlEvent::MouseClick`].
    MouseClick = 3,
    /// See [`ControlEvent::MouseWheel`].
    MouseWheel = 4,
    /// See [`ControlEvent::MouseEnter`].
    MouseEnter = 5,
    /// See [`ControlEvent::MouseLeave`].
    MouseLeave = 6,
    /// See [`ControlEvent::KeyDown`].
    KeyDown = 7,
    /// See [`ControlEvent::KeyUp`].
    KeyUp = 8,
    /// See [`ControlEvent::KeyPress`].
    KeyPress = 9,
    /// See [`ControlEvent::FocusChanged`].
    FocusChanged = 10,
    /// See [`ControlEvent::FontChanged`].
    FontChanged = 11,
    /// See [`ControlEvent::Resize`].
    Resize = 12,
    /// See [`ControlEvent::ControlAdded`].
    ControlAdded = 13,
    /// See [`ControlEvent::ControlRemoved`].
    ControlRemoved = 14,
}

impl EventKind {
    /// Every kind, in discriminant order.
    pub const ALL: [Self; 15] = [
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseMove,
        Self::MouseClick,
        Self::MouseWheel,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::KeyDown,
        Self::KeyUp,
        Self::KeyPress,
        Self::FocusChanged,
        Self::FontChanged,
        Self::Resize,
        Self::ControlAdded,
        Self::ControlRemoved,
    ];

    /// Looks up a kind by discriminant.
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.get(usize::from(v)).copied()
    }

    /// Short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "MouseDown",
            Self::MouseUp => "MouseUp",
            Self::MouseMove => "MouseMove",
            Self::MouseClick => "MouseClick",
            Self::MouseWheel => "MouseWheel",
            Self::MouseEnter => "MouseEnter",
            Self::MouseLeave => "MouseLeave",
            Self::KeyDown => "KeyDown",
            Self::KeyUp => "KeyUp",
            Self::KeyPress => "KeyPress",
            Self::FocusChanged => "FocusChanged",
            Self::FontChanged => "FontChanged",
            Self::Resize => "Resize",
            Self::ControlAdded => "ControlAdded",
            Self::ControlRemoved => "ControlRemoved",
        }
    }
}

/// A boxed event callback.
///
/// Receives the tree, the control the handler is registered on, and the event.
pub type EventHandler = Box<dyn FnMut(&mut ControlTree, ControlId, &ControlEvent)>;

pub(crate) struct HandlerEntry {
    pub(crate) id: HandlerId,
    pub(crate) kind: EventKind,
    /// `None` while the callback is running.
    pub(crate) callback: Option<EventHandler>,
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ControlTree {
    /// Registers `callback` to run whenever `id` receives an event of `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn add_handler(
        &mut self,
        id: ControlId,
        kind: EventKind,
        callback: impl FnMut(&mut Self, ControlId, &ControlEvent) + 'static,
    ) -> HandlerId {
        self.validate(id);
        let handler = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers[id.idx as usize].push(HandlerEntry {
            id: handler,
            kind,
            callback: Some(Box::new(callback)),
        });
        handler
    }

    /// Unregisters a handler. Returns `false` if `handler` is not registered
    /// on `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_handler(&mut self, id: ControlId, handler: HandlerId) -> bool {
        self.validate(id);
        let list = &mut self.handlers[id.idx as usize];
        match list.iter().position(|h| h.id == handler) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to `id`.
    ///
    /// Dispatch stops early if a callback destroys the control.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn dispatch(&mut self, id: ControlId, event: &ControlEvent) {
        self.validate(id);
        let idx = id.idx as usize;
        let kind = event.kind();
        self.tracer.dispatch(&DispatchEvent {
            control: id.idx,
            kind,
        });

        if let Some(mut widget) = self.take_widget(idx) {
            widget.on_event(self, id, event);
            self.restore_widget(id, widget);
            if !self.is_alive(id) {
                return;
            }
        } else if let Some(queue) = &mut self.pending_events[idx] {
            queue.push(*event);
        }

        let pending: Vec<HandlerId> = self.handlers[idx]
            .iter()
            .filter(|h| h.kind == kind)
            .map(|h| h.id)
            .collect();
        for handler in pending {
            let Some(mut callback) = self.take_callback(idx, handler) else {
                continue;
            };
            callback(self, id, event);
            if !self.is_alive(id) {
                return;
            }
            if let Some(entry) = self.handlers[idx].iter_mut().find(|h| h.id == handler) {
                entry.callback = Some(callback);
            }
        }

        let flags = self.props[idx].invalidate_on;
        let repaint = match kind {
            EventKind::MouseEnter | EventKind::MouseLeave => flags.enter_leave,
            EventKind::MouseDown | EventKind::MouseUp => flags.mouse_down_up,
            EventKind::FocusChanged => flags.focus_change,
            _ => false,
        };
        if repaint {
            self.invalidate(id);
        }
    }

    /// Takes a handler's callback out of its slot for the duration of a call.
    ///
    /// Returns `None` if the handler was removed or is already running.
    fn take_callback(&mut self, idx: usize, handler: HandlerId) -> Option<EventHandler> {
        self.handlers[idx]
            .iter_mut()
            .find(|h| h.id == handler)
            .and_then(|h| h.callback.take())
    }
}
