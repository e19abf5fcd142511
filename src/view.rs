// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The presentation side.
//!
//! A `View` lives on the one thread that owns the window and gets
//! told about paints, resizes, and the window going away.  It never
//! waits on the fractal: a paint either finds a finished frame in the
//! image channel and draws it, or starts a render task and leaves the
//! window as it was.  The render task asks for another paint when it
//! has published.
//!
//! Resizing and destroying are the two places where the view does
//! block, cancelling everything in flight and waiting for it to drain
//! so that nothing sized for the old window can be drawn into the new
//! one.

use failure::Error;
use std::sync::Arc;

use crate::channel::ImageChannel;
use crate::errors::RenderError;
use crate::frame::FrameBuffer;
use crate::kernel::RenderSettings;
use crate::render::{render_frame, Outcome};
use crate::tasks::TaskGroup;

/// Asks the windowing system for a future paint.  Called from render
/// tasks, so it has to be shareable across threads.
pub trait Invalidate: Send + Sync {
    /// Queue a paint of the whole surface.
    fn invalidate(&self) -> Result<(), Error>;
}

/// The graphics side of the window.
pub trait Surface {
    /// Draw a finished frame with its upper-left corner at 0,0.
    fn draw_pixels(&mut self, frame: &FrameBuffer);

    /// The window is now `width` by `height`.
    fn resize(&mut self, _width: usize, _height: usize) {}

    /// A handle render tasks can use to request a paint.
    fn invalidator(&self) -> Arc<dyn Invalidate>;
}

/// Notifications from the windowing system.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// The surface needs drawing.
    Paint,
    /// The surface changed size.
    Resize {
        /// New width in pixels.
        width: usize,
        /// New height in pixels.
        height: usize,
    },
    /// The surface is going away.
    Destroy,
}

/// What a paint did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PaintOutcome {
    /// A freshly rendered frame was drawn.
    Presented,
    /// The last presented frame still fits and was drawn again.
    Redrawn,
    /// Nothing to draw yet; a render task was started.
    Submitted,
    /// Nothing to draw and nothing started, because the surface has no
    /// area or the task could not be spawned.
    Deferred,
    /// The view is being destroyed.
    TornDown,
}

/// What a resize did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResizeOutcome {
    /// A render task for the new size was started.
    Submitted,
    /// The new size has no area, or the task could not be spawned.
    Deferred,
    /// The view is being destroyed.
    TornDown,
}

/// The Mandelbrot window.
pub struct View<S: Surface> {
    surface: S,
    images: Arc<ImageChannel>,
    tasks: TaskGroup,
    settings: RenderSettings,
    size: (usize, usize),
    tearing_down: bool,
    presented: Option<FrameBuffer>,
}

impl<S: Surface> View<S> {
    /// A view with no size yet.  Nothing is rendered until the first
    /// resize to a non-empty size.
    pub fn new(surface: S, settings: RenderSettings) -> Self {
        View {
            surface,
            images: Arc::new(ImageChannel::new()),
            tasks: TaskGroup::new("mandelbrot"),
            settings,
            size: (0, 0),
            tearing_down: false,
            presented: None,
        }
    }

    /// Route an event to its handler.
    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Paint => {
                let outcome = self.on_paint();
                trace!("paint: {:?}", outcome);
            }
            ViewEvent::Resize { width, height } => {
                let outcome = self.on_resize(width, height);
                trace!("resize to {}x{}: {:?}", width, height, outcome);
            }
            ViewEvent::Destroy => self.on_destroy(),
        }
    }

    /// Draw whatever is ready, or start making something that will be.
    pub fn on_paint(&mut self) -> PaintOutcome {
        if let Some(frame) = self.images.try_take() {
            self.surface.draw_pixels(&frame);
            self.presented = Some(frame);
            return PaintOutcome::Presented;
        }

        if self.tearing_down {
            return PaintOutcome::TornDown;
        }

        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return PaintOutcome::Deferred;
        }

        if let Some(ref frame) = self.presented {
            if frame.dimensions() == self.size {
                self.surface.draw_pixels(frame);
                return PaintOutcome::Redrawn;
            }
        }

        match self.submit_render(width, height) {
            Ok(_) => PaintOutcome::Submitted,
            Err(e) => {
                error!("could not start a {}x{} render: {}", width, height, e);
                PaintOutcome::Deferred
            }
        }
    }

    /// Stop everything sized for the old surface and start on the new
    /// one.  Blocks until in-flight tasks have drained.
    pub fn on_resize(&mut self, width: usize, height: usize) -> ResizeOutcome {
        self.tasks.cancel_all();
        self.tasks.wait_drain();
        // Anything still in the slot was published before the cancel.
        self.images.clear();

        if self.tearing_down {
            debug!("ignoring resize to {}x{} during teardown", width, height);
            return ResizeOutcome::TornDown;
        }

        self.size = (width, height);
        self.presented = None;
        self.surface.resize(width, height);

        if width == 0 || height == 0 {
            return ResizeOutcome::Deferred;
        }

        match self.submit_render(width, height) {
            Ok(_) => ResizeOutcome::Submitted,
            Err(e) => {
                error!("could not start a {}x{} render: {}", width, height, e);
                ResizeOutcome::Deferred
            }
        }
    }

    /// Stop for good.  The teardown flag goes up before anything else,
    /// so no later resize or paint can start another task.
    pub fn on_destroy(&mut self) {
        self.tearing_down = true;
        self.tasks.cancel_all();
        self.tasks.wait_drain();
        self.images.clear();
        info!("view destroyed");
    }

    fn submit_render(&mut self, width: usize, height: usize) -> Result<u64, RenderError> {
        let images = self.images.clone();
        let invalidator = self.surface.invalidator();
        let settings = self.settings;
        self.tasks.submit(move |token| {
            if render_frame(width, height, &settings, token, &images)? == Outcome::Published {
                invalidator.invalidate()?;
            }
            Ok(())
        })
    }

    /// The size of the surface as of the last resize.
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// Dimensions of the frame currently on screen, if any.
    pub fn presented_size(&self) -> Option<(usize, usize)> {
        self.presented.as_ref().map(|frame| frame.dimensions())
    }

    /// True once `on_destroy` has been called.
    pub fn is_tearing_down(&self) -> bool {
        self.tearing_down
    }

    /// The render tasks.
    pub fn tasks(&self) -> &TaskGroup {
        &self.tasks
    }

    /// The handoff between render tasks and this view.
    pub fn images(&self) -> &ImageChannel {
        &self.images
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
