// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software raster surfaces and headless presentation for trellis.
//!
//! This crate implements [`trellis_core`]'s drawing contracts in memory:
//!
//! - [`PixelSurface`]: an RGBA raster implementing
//!   [`Surface`](trellis_core::surface::Surface)
//! - [`CountingAllocator`]: hands out pixel surfaces and counts allocations,
//!   releases and live pixels
//! - [`CapturingPresenter`]: a [`Presenter`](trellis_core::backend::Presenter)
//!   that records paint requests and copies every presented frame
//!
//! Together they run a [`Display`](trellis_core::display::Display) without a
//! window, which is how tests and offscreen tools use it.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod allocator;
mod pixel;
mod presenter;

pub use allocator::CountingAllocator;
pub use pixel::PixelSurface;
pub use presenter::{CapturedFrame, CapturingPresenter};

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use trellis_core::backend::DamageRegion;
    use trellis_core::color::Color;
    use trellis_core::control::ControlId;
    use trellis_core::display::{Display, DisplayConfig};
    use trellis_core::geometry::{IntRect, IntSize};
    use trellis_core::control::ControlTree;
    use trellis_core::surface::{Brush, Surface};
    use trellis_core::time::HostTime;
    use trellis_core::widget::{ScrollPanel, Widget};

    use super::*;

    const RED: Color = Color::rgb8(255, 0, 0);
    const BLUE: Color = Color::rgb8(0, 0, 255);

    fn headless(size: IntSize) -> (Display, CountingAllocator, CapturingPresenter) {
        let allocator = CountingAllocator::new();
        let presenter = CapturingPresenter::new();
        let display = Display::new(
            DisplayConfig {
                size,
                ..DisplayConfig::default()
            },
            Box::new(allocator.clone()),
            Box::new(presenter.clone()),
        );
        (display, allocator, presenter)
    }

    fn add_top(d: &mut Display, r: IntRect, color: Color) -> ControlId {
        let root = d.root();
        let t = d.tree_mut();
        let c = t.create_control();
        t.set_bounds(c, r);
        t.set_back_color(c, color);
        t.add(root, c);
        c
    }

    #[test]
    fn renders_background_fill_and_border() {
        let (mut d, _, presenter) = headless(IntSize::new(100, 60));
        let c = add_top(&mut d, IntRect::new(10, 10, 20, 20), RED);
        d.tree_mut().set_border_width(c, 2);
        d.tree_mut().set_border_color(c, Color::WHITE);
        d.paint(HostTime(0));

        let frame = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK), "root background");
        assert_eq!(frame.pixel(10, 10), Some(Color::WHITE), "border corner");
        assert_eq!(frame.pixel(11, 20), Some(Color::WHITE), "border is 2px");
        assert_eq!(frame.pixel(12, 20), Some(RED), "fill inside the border");
        assert_eq!(frame.pixel(30, 30), Some(Color::BLACK), "outside the control");
    }

    #[test]
    fn root_border_and_widget_reach_the_frame() {
        struct Marker;
        impl Widget for Marker {
            fn paint(
                &mut self,
                _tree: &ControlTree,
                _id: ControlId,
                client: IntRect,
                surface: &mut dyn Surface,
            ) {
                let mark = IntRect::new(client.x, client.y, 4, 4);
                surface.fill_rect(mark.to_kurbo(), &Brush::Solid(BLUE));
            }
        }

        let (mut d, _, presenter) = headless(IntSize::new(100, 60));
        let root = d.root();
        d.tree_mut().set_border_width(root, 2);
        d.tree_mut().set_border_color(root, Color::WHITE);
        d.tree_mut().set_widget(root, Some(Box::new(Marker)));
        add_top(&mut d, IntRect::new(0, 0, 50, 50), RED);
        d.paint(HostTime(0));

        let frame = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(frame.pixel(0, 0), Some(Color::WHITE), "root border corner");
        assert_eq!(frame.pixel(99, 30), Some(Color::WHITE), "right border edge");
        assert_eq!(frame.pixel(60, 30), Some(Color::BLACK), "root background");
        assert_eq!(frame.pixel(3, 3), Some(BLUE), "root widget paints over children");
        assert_eq!(frame.pixel(10, 10), Some(RED), "child inside the root client area");
    }

    #[test]
    fn upper_control_covers_lower() {
        let (mut d, _, presenter) = headless(IntSize::new(50, 50));
        add_top(&mut d, IntRect::new(0, 0, 30, 30), RED);
        add_top(&mut d, IntRect::new(20, 20, 30, 30), BLUE);
        d.paint(HostTime(0));
        let frame = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(frame.pixel(25, 25), Some(BLUE), "later add is on top");
        assert_eq!(frame.pixel(5, 5), Some(RED));
    }

    #[test]
    fn partial_damage_after_local_change() {
        let (mut d, _, presenter) = headless(IntSize::new(50, 50));
        let a = add_top(&mut d, IntRect::new(0, 0, 10, 10), RED);
        d.paint(HostTime(0));
        d.tree_mut().set_back_color(a, BLUE);
        d.request_frame();
        assert_eq!(presenter.invalidations(), 1, "one request for the change");
        d.paint(HostTime(1));
        assert_eq!(
            presenter.damage_log(),
            vec![
                DamageRegion::Full,
                DamageRegion::Rects(vec![IntRect::new(0, 0, 10, 10)])
            ]
        );
        let frame = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(frame.pixel(5, 5), Some(BLUE), "recomposited");
    }

    #[test]
    fn scroll_panel_shows_scrolled_content() {
        let (mut d, _, presenter) = headless(IntSize::new(100, 60));
        let top = add_top(&mut d, IntRect::new(0, 0, 100, 60), Color::WHITE);
        let t = d.tree_mut();
        let panel = ScrollPanel::create(t);
        t.set_bounds(panel, IntRect::new(0, 0, 40, 30));
        t.add(top, panel);
        let child = t.create_control();
        t.set_bounds(child, IntRect::new(0, 40, 40, 20));
        t.set_back_color(child, BLUE);
        t.add(panel, child);

        d.paint(HostTime(0));
        let before = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(before.pixel(5, 15), Some(Color::WHITE), "child below the window");

        ScrollPanel::scroll_to(d.tree_mut(), panel, 30);
        d.paint(HostTime(1));
        let after = presenter.last_frame().expect("a frame with pixels");
        assert_eq!(after.pixel(5, 15), Some(BLUE), "child scrolled into view");
        assert_eq!(after.pixel(50, 15), Some(Color::WHITE), "outside the panel");
    }

    #[test]
    fn resize_swaps_frame_surface() {
        let (mut d, allocator, _) = headless(IntSize::new(10, 10));
        assert_eq!(allocator.allocated(), 1, "frame");
        d.resize(IntSize::new(20, 10));
        assert_eq!(allocator.live(), 1, "old frame released");
        assert_eq!(allocator.live_pixels(), 200);
    }
}
