// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use crate::color::Color;
use crate::control::{ControlId, ControlTree};
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::surface::{Brush, Surface, SurfaceAllocator};
use crate::widget::Widget;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Clip(IntRect),
    Clear(Color),
    Fill(IntRect, Brush),
    Stroke(IntRect, Color, f64),
    Blit(IntRect, IntPoint),
}

/// A surface that records calls instead of rasterizing.
#[derive(Debug)]
pub(crate) struct TestSurface {
    size: IntSize,
    pub(crate) ops: Vec<Op>,
}

impl TestSurface {
    pub(crate) fn new(size: IntSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "test rectangles hold integral coordinates"
)]
fn to_int(r: kurbo::Rect) -> IntRect {
    IntRect::from_edges(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
}

impl Surface for TestSurface {
    fn size(&self) -> IntSize {
        self.size
    }

    fn set_clip(&mut self, clip: kurbo::Rect) {
        self.ops.push(Op::Clip(to_int(clip)));
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(Op::Clear(color));
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, brush: &Brush) {
        self.ops.push(Op::Fill(to_int(rect), *brush));
    }

    fn stroke_rect(&mut self, rect: kurbo::Rect, color: Color, width: f64) {
        self.ops.push(Op::Stroke(to_int(rect), color, width));
    }

    fn blit(&mut self, _src: &dyn Surface, src_rect: IntRect, dest: IntPoint) {
        self.ops.push(Op::Blit(src_rect, dest));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Allocation and release counters.
#[derive(Debug, Default)]
pub(crate) struct Counts {
    pub(crate) allocated: u32,
    pub(crate) released: u32,
}

/// Hands out [`TestSurface`]s and counts them.
#[derive(Debug, Default)]
pub(crate) struct TestAllocator(pub(crate) Rc<RefCell<Counts>>);

impl SurfaceAllocator for TestAllocator {
    fn allocate(&mut self, size: IntSize) -> Box<dyn Surface> {
        self.0.borrow_mut().allocated += 1;
        Box::new(TestSurface::new(size))
    }

    fn release(&mut self, surface: Box<dyn Surface>) {
        self.0.borrow_mut().released += 1;
        drop(surface);
    }
}

pub(crate) fn tree() -> ControlTree {
    ControlTree::new(Box::new(TestAllocator::default()))
}

pub(crate) fn tree_with_counts() -> (ControlTree, Rc<RefCell<Counts>>) {
    let counts = Rc::new(RefCell::new(Counts::default()));
    let tree = ControlTree::new(Box::new(TestAllocator(counts.clone())));
    (tree, counts)
}

pub(crate) fn clear_redraw(tree: &mut ControlTree, id: ControlId) {
    tree.state[id.idx as usize].needs_redraw = false;
}

/// A widget that counts its layout passes and does nothing else.
#[derive(Debug)]
pub(crate) struct CountingLayout(pub(crate) Rc<RefCell<u32>>);

impl Widget for CountingLayout {
    fn perform_layout(&mut self, _tree: &mut ControlTree, _id: ControlId) {
        *self.0.borrow_mut() += 1;
    }
}

/// Recorded calls on the surface owned by `id`.
pub(crate) fn ops_of(tree: &ControlTree, id: ControlId) -> Vec<Op> {
    ops_of_surface(tree.surface(id))
}

pub(crate) fn ops_of_surface(surface: Option<&dyn Surface>) -> Vec<Op> {
    surface
        .and_then(|s| s.as_any().downcast_ref::<TestSurface>())
        .map(|s| s.ops.clone())
        .unwrap_or_default()
}
