#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot view
//!
//! Renders the Mandelbrot set into a bitmap sized to a display
//! surface, and re-renders it every time the surface is resized.  The
//! fractal itself is the classic escape-time iteration: take a point
//! on the complex plane, square it and add the original point back,
//! and count how many times you can do that before the result wanders
//! farther than 2.0 from the origin.
//!
//! The interesting part is everything around that loop.  The view is
//! owned by a single presentation thread that must never wait on the
//! math, so each frame is computed by a background task and handed
//! back through a one-slot mailbox.  Resizing or closing the view has
//! to stop those tasks, wait for them to get out of the way, and make
//! sure that nothing they were still holding ever reaches the screen.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod channel;
pub mod config;
pub mod errors;
pub mod frame;
pub mod headless;
pub mod kernel;
pub mod planes;
pub mod render;
pub mod tasks;
pub mod view;

pub use channel::ImageChannel;
pub use errors::RenderError;
pub use frame::FrameBuffer;
pub use kernel::{compute, RenderSettings, MAX_ITERATIONS};
pub use planes::{PlaneMapper, Viewport};
pub use tasks::{CancelToken, TaskGroup};
pub use view::{PaintOutcome, ResizeOutcome, Surface, View, ViewEvent};
