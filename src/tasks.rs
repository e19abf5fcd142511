// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A group of background tasks that can be cancelled and waited on
//! as a whole.
//!
//! Each submission gets its own named thread; there is no cap on how
//! many run at once.  Cancellation is cooperative: every task is
//! handed the `CancelToken` of the generation it was submitted in,
//! and it is up to the task to look at it.  `wait_drain` blocks until
//! every task has returned, and a task that errors or panics counts
//! as returned.
//!
//! The group moves through `Idle -> Running -> Cancelling -> Drained`
//! and back to `Idle` when the drain completes, at which point a new
//! generation with a fresh token begins.

use crossbeam::sync::WaitGroup;
use failure::Error;
use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::errors::RenderError;

/// A shared flag that tells tasks of one generation to stop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    /// Ask every holder of this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Has `cancel` been called on this token or any of its clones?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Where a task group is in its cancel/drain cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GroupState {
    /// Nothing running, nothing cancelled.
    Idle,
    /// This many tasks are running in the current generation.
    Running(usize),
    /// Cancelled, but this many tasks have not returned yet.
    Cancelling(usize),
    /// Cancelled and empty; waiting for `wait_drain` to start the
    /// next generation.
    Drained,
}

// Held by a task's thread for its whole life.  The running count is
// decremented before the wait-group handle is released, so the count
// is already zero by the time `wait_drain` wakes up.
struct Ticket {
    running: Arc<AtomicUsize>,
    _drain: WaitGroup,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A cancellable pool of background tasks.
pub struct TaskGroup {
    name: String,
    token: CancelToken,
    running: Arc<AtomicUsize>,
    drain: WaitGroup,
    cancelling: bool,
    generation: u64,
    next_id: u64,
}

impl TaskGroup {
    /// An idle group.  `name` prefixes the names of the threads it
    /// spawns.
    pub fn new(name: &str) -> Self {
        TaskGroup {
            name: name.to_string(),
            token: CancelToken::new(),
            running: Arc::new(AtomicUsize::new(0)),
            drain: WaitGroup::new(),
            cancelling: false,
            generation: 0,
            next_id: 0,
        }
    }

    /// Run `work` on a new background thread.  The closure receives
    /// the current generation's token.  Returns the task's id.
    pub fn submit<F>(&mut self, work: F) -> Result<u64, RenderError>
    where
        F: FnOnce(&CancelToken) -> Result<(), Error> + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        let generation = self.generation;
        let token = self.token.clone();

        self.running.fetch_add(1, Ordering::SeqCst);
        let ticket = Ticket {
            running: self.running.clone(),
            _drain: self.drain.clone(),
        };

        // On failure the closure, and the ticket inside it, is dropped
        // here, which undoes the count above.
        thread::Builder::new()
            .name(format!("{}-{}", self.name, id))
            .spawn(move || {
                let _ticket = ticket;
                run_task(id, generation, &token, work);
            })
            .map_err(RenderError::Spawn)?;

        debug!(
            "{}: submitted task {} in generation {}",
            self.name, id, generation
        );
        Ok(id)
    }

    /// Signal every task of the current generation to stop.  Tasks
    /// submitted before the next `wait_drain` are born cancelled.
    pub fn cancel_all(&mut self) {
        if !self.cancelling {
            debug!(
                "{}: cancelling generation {} ({} running)",
                self.name,
                self.generation,
                self.running()
            );
        }
        self.token.cancel();
        self.cancelling = true;
    }

    /// Block until every submitted task has returned.  If the group
    /// was cancelled, a new generation begins afterwards.
    pub fn wait_drain(&mut self) {
        let drain = mem::replace(&mut self.drain, WaitGroup::new());
        drain.wait();

        if self.cancelling {
            self.generation += 1;
            self.token = CancelToken::new();
            self.cancelling = false;
            debug!("{}: drained; now on generation {}", self.name, self.generation);
        }
    }

    /// The number of tasks that have not returned yet.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// The current generation number.  Starts at zero and goes up by
    /// one with every drain that follows a cancel.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A snapshot of where the group is.
    pub fn state(&self) -> GroupState {
        match (self.cancelling, self.running()) {
            (false, 0) => GroupState::Idle,
            (false, n) => GroupState::Running(n),
            (true, 0) => GroupState::Drained,
            (true, n) => GroupState::Cancelling(n),
        }
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        if self.running() > 0 {
            warn!("{}: dropped with tasks still running; draining", self.name);
            self.cancel_all();
        }
        self.wait_drain();
    }
}

fn run_task<F>(id: u64, generation: u64, token: &CancelToken, work: F)
where
    F: FnOnce(&CancelToken) -> Result<(), Error>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| work(token))) {
        Ok(Ok(())) => trace!("task {} (generation {}) returned", id, generation),
        Ok(Err(e)) => {
            let failure = RenderError::TaskFailure(e.to_string());
            error!("task {} (generation {}): {}", id, generation, failure);
        }
        Err(cause) => {
            let failure = RenderError::TaskFailure(panic_message(&*cause));
            error!("task {} (generation {}) panicked: {}", id, generation, failure);
        }
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
