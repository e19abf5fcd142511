// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single-slot mailbox between render tasks and the presentation
//! thread.  Only the newest finished frame is ever worth drawing, so a
//! put replaces whatever is waiting instead of queueing behind it.

use crossbeam::atomic::AtomicCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::frame::FrameBuffer;

/// Holds at most one finished frame.
pub struct ImageChannel {
    slot: AtomicCell<Option<FrameBuffer>>,
    puts: AtomicUsize,
}

impl ImageChannel {
    /// An empty channel.
    pub fn new() -> Self {
        ImageChannel {
            slot: AtomicCell::new(None),
            puts: AtomicUsize::new(0),
        }
    }

    /// Hand a frame over.  Never blocks; a frame nobody has taken yet
    /// is dropped.
    pub fn put(&self, frame: FrameBuffer) {
        let (width, height) = frame.dimensions();
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(stale) = self.slot.swap(Some(frame)) {
            debug!(
                "dropping undrawn {}x{} frame in favour of {}x{}",
                stale.width(),
                stale.height(),
                width,
                height
            );
        }
    }

    /// Take the waiting frame, if there is one.  Never blocks.
    pub fn try_take(&self) -> Option<FrameBuffer> {
        self.slot.swap(None)
    }

    /// Throw away the waiting frame, if there is one.
    pub fn clear(&self) {
        if let Some(stale) = self.slot.swap(None) {
            debug!("discarding pending {}x{} frame", stale.width(), stale.height());
        }
    }

    /// The number of frames ever handed over, taken or not.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Default for ImageChannel {
    fn default() -> Self {
        ImageChannel::new()
    }
}
