// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-control style, layout and interaction state.

use alloc::string::String;

use crate::color::{Color, Font};
use crate::event::MouseButtons;
use crate::geometry::{IntRect, Margin, Padding};

/// How a control positions itself inside the area its parent offers.
///
/// Siblings are laid out in z-order (topmost first); each docked control
/// consumes part of the area and hands the remainder to the next sibling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DockType {
    /// Keep the current bounds; the area is passed on unchanged.
    #[default]
    None,
    /// Slice off the left edge.
    Left,
    /// Slice off the right edge.
    Right,
    /// Slice off the top edge.
    Top,
    /// Slice off the bottom edge.
    Bottom,
    /// Take the whole area, leaving nothing for later siblings.
    Fill,
    /// Center in the area without consuming any of it.
    Center,
    /// Slice off the left edge, vertically centered at the control's height.
    LeftCenter,
    /// Slice off the right edge, vertically centered at the control's height.
    RightCenter,
}

/// Second color and direction of a two-color background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    /// Color at the end of the gradient axis; the back color is the start.
    pub end: Color,
    /// Direction in degrees, clockwise from the positive x axis.
    pub angle: f64,
}

/// Interactions that repaint a control without any widget code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvalidateOn {
    /// Repaint when the pointer enters or leaves.
    pub enter_leave: bool,
    /// Repaint when a mouse button goes down or up over the control.
    pub mouse_down_up: bool,
    /// Repaint when keyboard focus is gained or lost.
    pub focus_change: bool,
}

/// Properties set through the tree's setters.
#[derive(Clone, Debug)]
pub(crate) struct ControlProps {
    pub(crate) name: String,
    pub(crate) bounds: IntRect,
    pub(crate) margin: Margin,
    pub(crate) padding: Padding,
    pub(crate) border_width: i32,
    pub(crate) border_color: Color,
    pub(crate) back_color: Color,
    pub(crate) gradient: Option<Gradient>,
    pub(crate) dock: DockType,
    pub(crate) dock_percent: f32,
    pub(crate) font: Option<Font>,
    pub(crate) row: i32,
    pub(crate) column: i32,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) auto_size: bool,
    pub(crate) focusable: bool,
    pub(crate) invalidate_on: InvalidateOn,
}

impl Default for ControlProps {
    fn default() -> Self {
        Self {
            name: String::new(),
            bounds: IntRect::new(0, 0, 100, 100),
            margin: Margin::ZERO,
            padding: Padding::ZERO,
            border_width: 0,
            border_color: Color::TRANSPARENT,
            back_color: Color::TRANSPARENT,
            gradient: None,
            dock: DockType::None,
            dock_percent: 0.0,
            font: None,
            row: 0,
            column: 0,
            visible: true,
            enabled: true,
            auto_size: false,
            focusable: false,
            invalidate_on: InvalidateOn::default(),
        }
    }
}

/// State maintained by the tree and display rather than by callers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlState {
    pub(crate) needs_redraw: bool,
    pub(crate) hover: bool,
    pub(crate) focused: bool,
    pub(crate) mouse_buttons_down: MouseButtons,
    pub(crate) layout_suspended: bool,
    pub(crate) layout_pending: bool,
    /// Set on a child while its parent runs its size pass, so that size
    /// changes do not re-enter the parent's layout.
    pub(crate) in_auto_size: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            needs_redraw: true,
            hover: false,
            focused: false,
            mouse_buttons_down: MouseButtons::NONE,
            layout_suspended: false,
            layout_pending: false,
            in_auto_size: false,
        }
    }
}
