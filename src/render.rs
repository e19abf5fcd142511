// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The body of a render task: allocate a frame, scan every pixel of
//! it, and hand it to the image channel.  The cancel token is looked
//! at twice, once before any work is done and once right before the
//! handoff, never inside the pixel loop.

use crate::channel::ImageChannel;
use crate::errors::RenderError;
use crate::frame::FrameBuffer;
use crate::kernel::{self, RenderSettings};
use crate::planes::PlaneMapper;
use crate::tasks::CancelToken;

/// What a render task ended up doing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The frame is in the channel.
    Published,
    /// The frame was finished, but its generation had been cancelled
    /// by then, so it was thrown away.
    Discarded,
    /// The generation was cancelled before the task started.
    Skipped,
}

/// Allocate a `width` by `height` frame and fill it.
pub fn scan(width: usize, height: usize, settings: &RenderSettings) -> Result<FrameBuffer, RenderError> {
    let mut frame = FrameBuffer::allocate(width, height)?;
    {
        let mut bits = frame.begin_write()?;
        let plane = PlaneMapper::new(width, height, settings.viewport);
        kernel::render(&plane, &mut bits, settings.max_iterations);
        bits.end_write();
    }
    Ok(frame)
}

/// Put a finished frame into the channel, unless its generation has
/// been cancelled in the meantime.
pub fn publish(frame: FrameBuffer, token: &CancelToken, images: &ImageChannel) -> Result<(), RenderError> {
    if !frame.is_sealed() {
        return Err(RenderError::TaskFailure(format!(
            "refusing to publish an unfinished {}x{} frame",
            frame.width(),
            frame.height()
        )));
    }
    if token.is_cancelled() {
        return Err(RenderError::StaleCancelledResult);
    }
    images.put(frame);
    Ok(())
}

/// The whole task: checkpoint, scan, checkpoint, publish.
pub fn render_frame(
    width: usize,
    height: usize,
    settings: &RenderSettings,
    token: &CancelToken,
    images: &ImageChannel,
) -> Result<Outcome, RenderError> {
    if token.is_cancelled() {
        debug!("skipping {}x{} render; already cancelled", width, height);
        return Ok(Outcome::Skipped);
    }

    let frame = scan(width, height, settings)?;
    match publish(frame, token, images) {
        Ok(()) => {
            debug!("published {}x{} frame", width, height);
            Ok(Outcome::Published)
        }
        Err(RenderError::StaleCancelledResult) => {
            debug!("discarding {}x{} frame: {}", width, height, RenderError::StaleCancelledResult);
            Ok(Outcome::Discarded)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{compute, MAX_ITERATIONS};
    use crate::planes::MANDELBROT;

    #[test]
    fn scan_matches_the_kernel() {
        let frame = scan(13, 9, &RenderSettings::default()).unwrap();
        assert!(frame.is_sealed());
        assert!(!frame.is_locked());
        assert_eq!(frame.pixel(6, 4), Some(compute(6, 4, 13, 9, &MANDELBROT, MAX_ITERATIONS)));
        assert_eq!(frame.pixel(0, 0), Some(compute(0, 0, 13, 9, &MANDELBROT, MAX_ITERATIONS)));
    }

    #[test]
    fn scan_refuses_zero_area() {
        match scan(0, 9, &RenderSettings::default()) {
            Err(RenderError::InvalidDimensions { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn render_frame_publishes() {
        let images = ImageChannel::new();
        let outcome = render_frame(8, 6, &RenderSettings::default(), &CancelToken::new(), &images);
        assert_eq!(outcome.unwrap(), Outcome::Published);
        let frame = images.try_take().unwrap();
        assert_eq!(frame.dimensions(), (8, 6));
        assert!(frame.is_sealed());
    }

    #[test]
    fn render_frame_skips_when_cancelled_up_front() {
        let images = ImageChannel::new();
        let token = CancelToken::new();
        token.cancel();
        let outcome = render_frame(8, 6, &RenderSettings::default(), &token, &images);
        assert_eq!(outcome.unwrap(), Outcome::Skipped);
        assert_eq!(images.put_count(), 0);
    }

    #[test]
    fn publish_discards_cancelled_results() {
        let images = ImageChannel::new();
        let token = CancelToken::new();
        let frame = scan(4, 4, &RenderSettings::default()).unwrap();
        token.cancel();
        match publish(frame, &token, &images) {
            Err(RenderError::StaleCancelledResult) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(images.put_count(), 0);
    }

    #[test]
    fn publish_refuses_unfinished_frames() {
        let images = ImageChannel::new();
        let frame = FrameBuffer::allocate(4, 4).unwrap();
        assert!(publish(frame, &CancelToken::new(), &images).is_err());
        assert!(images.try_take().is_none());
    }
}
