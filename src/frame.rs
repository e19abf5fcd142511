// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frame buffers: an owned block of packed `0x00RRGGBB` pixels that a
//! single render task fills exactly once.
//!
//! Writing goes through a `WriteGuard`.  Taking the guard locks the
//! buffer; dropping it unlocks the buffer again, whether the scan
//! finished, bailed out early, or panicked halfway through.  Only a
//! guard that is explicitly finished with `end_write` seals the
//! buffer, and only sealed buffers are worth publishing.

use std::ops::{Deref, DerefMut};

use crate::errors::RenderError;

/// A bitmap produced by a render task.
#[derive(Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    locked: bool,
    sealed: bool,
}

impl FrameBuffer {
    /// Allocate a black buffer.  Zero-area buffers are refused so that
    /// the caller skips rendering instead of producing a degenerate
    /// frame.
    pub fn allocate(width: usize, height: usize) -> Result<FrameBuffer, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(FrameBuffer {
            width,
            height,
            pixels: vec![0 as u32; width * height],
            locked: false,
            sealed: false,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True while a `WriteGuard` is alive.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True once a full write pass has completed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// The pixels, row-major, top row first.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The packed pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Lock the buffer for its one and only write pass.
    pub fn begin_write(&mut self) -> Result<WriteGuard<'_>, RenderError> {
        if self.sealed {
            return Err(RenderError::BufferSealed);
        }
        self.locked = true;
        trace!("locked {}x{} frame for writing", self.width, self.height);
        Ok(WriteGuard { frame: self })
    }
}

/// Exclusive write access to a frame buffer's pixels.
pub struct WriteGuard<'a> {
    frame: &'a mut FrameBuffer,
}

impl<'a> WriteGuard<'a> {
    /// Width in pixels of the frame being written.
    pub fn width(&self) -> usize {
        self.frame.width
    }

    /// Height in pixels of the frame being written.
    pub fn height(&self) -> usize {
        self.frame.height
    }

    /// Seal the frame after a complete scan.  The lock itself is
    /// released when the guard drops, here as on every other path.
    pub fn end_write(self) {
        self.frame.sealed = true;
    }
}

impl<'a> Deref for WriteGuard<'a> {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.frame.pixels
    }
}

impl<'a> DerefMut for WriteGuard<'a> {
    fn deref_mut(&mut self) -> &mut [u32] {
        &mut self.frame.pixels
    }
}

impl<'a> Drop for WriteGuard<'a> {
    fn drop(&mut self) {
        self.frame.locked = false;
        trace!(
            "unlocked {}x{} frame (sealed: {})",
            self.frame.width,
            self.frame.height,
            self.frame.sealed
        );
    }
}
