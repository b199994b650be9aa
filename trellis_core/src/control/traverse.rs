// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{ControlId, INVALID};
use super::tree::ControlTree;

/// An iterator over the direct children of a control, topmost first.
///
/// Created by [`ControlTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a ControlTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a ControlTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ControlId;

    fn next(&mut self) -> Option<ControlId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// A depth-first, pre-order iterator over a control and all its descendants.
///
/// Created by [`ControlTree::descendants`]. Children are visited in z-order.
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a ControlTree,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a ControlTree, start: u32) -> Self {
        let mut stack = Vec::new();
        stack.push(start);
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = ControlId;

    fn next(&mut self) -> Option<ControlId> {
        let idx = self.stack.pop()?;
        // Push children in reverse so the topmost child is popped first.
        let mark = self.stack.len();
        let mut child = self.tree.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.tree.next_sibling[child as usize];
        }
        self.stack[mark..].reverse();
        Some(self.tree.id_at(idx))
    }
}
