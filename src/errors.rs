// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The things that can go wrong between a resize and a painted frame.
//! None of them ever reach the presentation thread as an error value;
//! compute-side failures stop at the task boundary and are logged.

use failure::Fail;
use std::io;

/// Errors raised while allocating, rendering or publishing a frame.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// One of the requested frame dimensions was zero.  The caller
    /// should skip the render entirely.
    #[fail(display = "invalid frame dimensions {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The corners of a viewport were out of order.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// A frame buffer may only be written once.
    #[fail(display = "frame buffer has already been written")]
    BufferSealed,

    /// A render task returned an error or panicked.
    #[fail(display = "render task failed: {}", _0)]
    TaskFailure(String),

    /// A render task finished after its generation was cancelled.
    #[fail(display = "render result belongs to a cancelled generation")]
    StaleCancelledResult,

    /// The operating system refused to start another worker thread.
    #[fail(display = "could not spawn render task: {}", _0)]
    Spawn(#[cause] io::Error),
}
