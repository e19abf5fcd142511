// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A window without a window.  The surface is an in-memory RGB image,
//! and "asking for a paint" means putting a `ViewEvent::Paint` on a
//! channel that `run_events` pumps into the view.

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use failure::{bail, format_err, Error};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::{ColorType, Rgb, RgbImage};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::frame::FrameBuffer;
use crate::kernel::unpack_rgb;
use crate::view::{Invalidate, Surface, View, ViewEvent};

/// Queues a paint on the headless event loop.
pub struct EventInvalidator {
    events: Sender<ViewEvent>,
}

impl Invalidate for EventInvalidator {
    fn invalidate(&self) -> Result<(), Error> {
        self.events
            .send(ViewEvent::Paint)
            .map_err(|_| format_err!("the event loop has gone away"))
    }
}

/// An RGB canvas the size of the window.
pub struct HeadlessSurface {
    canvas: RgbImage,
    invalidator: Arc<EventInvalidator>,
    draws: usize,
}

impl HeadlessSurface {
    /// An empty surface whose paint requests go to `events`.
    pub fn new(events: Sender<ViewEvent>) -> Self {
        HeadlessSurface {
            canvas: RgbImage::new(0, 0),
            invalidator: Arc::new(EventInvalidator { events }),
            draws: 0,
        }
    }

    /// What is on screen.
    pub fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// How many times a frame has been drawn.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Save the canvas as a binary PPM.
    pub fn write_pnm(&self, path: &Path) -> Result<(), Error> {
        let (width, height) = self.canvas.dimensions();
        if width == 0 || height == 0 {
            bail!("nothing has been drawn");
        }
        let output = File::create(path)?;
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(&*self.canvas, width, height, ColorType::RGB(8))?;
        Ok(())
    }
}

impl Surface for HeadlessSurface {
    fn draw_pixels(&mut self, frame: &FrameBuffer) {
        let width = frame.width().min(self.canvas.width() as usize);
        let height = frame.height().min(self.canvas.height() as usize);
        for y in 0..height {
            for x in 0..width {
                let packed = frame.pixels()[y * frame.width() + x];
                self.canvas.put_pixel(x as u32, y as u32, Rgb(unpack_rgb(packed)));
            }
        }
        self.draws += 1;
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.canvas = RgbImage::new(width as u32, height as u32);
    }

    fn invalidator(&self) -> Arc<dyn Invalidate> {
        self.invalidator.clone()
    }
}

/// Pump events into `view` until `done` says so.  Fails if nothing
/// satisfying arrives within `timeout`.
pub fn run_events<S, F>(
    view: &mut View<S>,
    events: &Receiver<ViewEvent>,
    timeout: Duration,
    mut done: F,
) -> Result<(), Error>
where
    S: Surface,
    F: FnMut(&View<S>) -> bool,
{
    let deadline = Instant::now() + timeout;
    while !done(&*view) {
        let now = Instant::now();
        if now >= deadline {
            bail!("no finished frame after {:?}", timeout);
        }
        match events.recv_timeout(deadline - now) {
            Ok(event) => view.dispatch(event),
            Err(RecvTimeoutError::Timeout) => bail!("no finished frame after {:?}", timeout),
            Err(RecvTimeoutError::Disconnected) => bail!("the event source has closed"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{compute, RenderSettings, MAX_ITERATIONS};
    use crate::planes::MANDELBROT;
    use crossbeam::channel;
    use tempfile::tempdir;

    #[test]
    fn draw_clips_to_the_canvas() {
        let (tx, _rx) = channel::unbounded();
        let mut surface = HeadlessSurface::new(tx);
        surface.resize(2, 2);
        let mut frame = FrameBuffer::allocate(3, 1).unwrap();
        {
            let mut bits = frame.begin_write().unwrap();
            bits.copy_from_slice(&[0x01_02_03, 0x04_05_06, 0x07_08_09]);
            bits.end_write();
        }
        surface.draw_pixels(&frame);
        assert_eq!(surface.canvas().get_pixel(0, 0), &Rgb([1, 2, 3]));
        assert_eq!(surface.canvas().get_pixel(1, 0), &Rgb([4, 5, 6]));
        assert_eq!(surface.canvas().get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(surface.draws(), 1);
    }

    #[test]
    fn invalidate_queues_a_paint() {
        let (tx, rx) = channel::unbounded();
        let surface = HeadlessSurface::new(tx);
        surface.invalidator().invalidate().unwrap();
        assert_eq!(rx.try_recv().unwrap(), ViewEvent::Paint);
    }

    #[test]
    fn invalidate_fails_once_the_loop_is_gone() {
        let (tx, rx) = channel::unbounded();
        let surface = HeadlessSurface::new(tx);
        drop(rx);
        assert!(surface.invalidator().invalidate().is_err());
    }

    #[test]
    fn event_loop_presents_the_final_size() {
        let (tx, rx) = channel::unbounded();
        let mut view = View::new(HeadlessSurface::new(tx), RenderSettings::default());
        view.dispatch(ViewEvent::Resize { width: 30, height: 20 });
        view.dispatch(ViewEvent::Paint);
        run_events(&mut view, &rx, Duration::from_secs(30), |v| {
            v.presented_size() == Some((30, 20))
        })
        .unwrap();
        view.on_destroy();

        let expected = unpack_rgb(compute(29, 0, 30, 20, &MANDELBROT, MAX_ITERATIONS));
        assert_eq!(view.surface().canvas().get_pixel(29, 0), &Rgb(expected));
    }

    #[test]
    fn event_loop_times_out() {
        let (tx, rx) = channel::unbounded();
        let mut view = View::new(HeadlessSurface::new(tx), RenderSettings::default());
        let result = run_events(&mut view, &rx, Duration::from_millis(20), |_| false);
        assert!(result.is_err());
    }

    #[test]
    fn empty_canvas_is_not_written() {
        let dir = tempdir().unwrap();
        let (tx, _rx) = channel::unbounded();
        let surface = HeadlessSurface::new(tx);
        assert!(surface.write_pnm(&dir.path().join("empty.ppm")).is_err());
    }

    #[test]
    fn canvas_is_written_as_ppm() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let (tx, _rx) = channel::unbounded();
        let mut surface = HeadlessSurface::new(tx);
        surface.resize(4, 3);
        surface.write_pnm(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[0; 36]));
    }
}
