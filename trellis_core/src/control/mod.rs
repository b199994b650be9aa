// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control tree data model.
//!
//! A *control* is a rectangular node in a window's UI tree. Each control has:
//!
//! - An identity ([`ControlId`]), a generational handle that becomes stale
//!   when the control is destroyed, preventing use-after-free bugs at the
//!   API level.
//! - Topology: parent, first-child and sibling links forming an ordered tree.
//!   The first child is the topmost: it is hit-tested first, laid out first,
//!   and drawn last.
//! - **Geometry**: bounds in the parent's client coordinates, plus margin,
//!   border width and padding that together define the client area.
//! - **Style**: back color with optional [`Gradient`], border color, font.
//! - **Layout hints**: [`DockType`], dock percent, visibility, auto-size,
//!   table row and column.
//! - **Behavior**: an optional [`Widget`](crate::widget::Widget) and any
//!   number of event handlers.
//! - A [`Backing`](crate::surface::Backing) describing where it draws.
//!
//! # Invalidation
//!
//! Setters fall into three groups:
//!
//! - **Plain**: colors. The control is marked for redraw.
//! - **Self layout**: border, padding, margin, font. The control is marked
//!   and re-runs its own layout.
//! - **Parent layout**: bounds, dock, dock percent, visibility, auto-size,
//!   row, column. The control and its parent are marked and the parent
//!   re-runs its layout.
//!
//! Invalidating anything attached to the root requests a render from the
//! display.

mod id;
mod props;
mod traverse;
mod tree;

pub use id::{ControlId, HandlerId, INVALID};
pub use props::{DockType, Gradient, InvalidateOn};
pub use traverse::{Children, Descendants};
pub use tree::ControlTree;
