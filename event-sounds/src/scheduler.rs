//! Deferral of the drain pass to the host's idle phase.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

/// Work to run once the host loop goes idle.
pub type IdleTask = Box<dyn FnOnce()>;

/// Something that can run a task later, on the same thread, after the
/// current callback has returned.
pub trait IdleScheduler {
    fn schedule(&self, task: IdleTask);
}

impl<S: IdleScheduler + ?Sized> IdleScheduler for Rc<S> {
    fn schedule(&self, task: IdleTask) {
        (**self).schedule(task)
    }
}

/// Scheduler driven by hand. Tasks run only when [`run_pending`] is called,
/// which makes the idle boundary explicit in tests and replays.
///
/// [`run_pending`]: ManualIdleScheduler::run_pending
#[derive(Clone, Default)]
pub struct ManualIdleScheduler {
    tasks: Rc<RefCell<VecDeque<IdleTask>>>,
}

impl ManualIdleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs queued tasks until none remain, including tasks scheduled by the
    /// tasks themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl std::fmt::Debug for ManualIdleScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualIdleScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl IdleScheduler for ManualIdleScheduler {
    fn schedule(&self, task: IdleTask) {
        trace!("Idle task queued");
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Scheduler backed by a tokio `LocalSet`. Tasks are spawned with
/// [`tokio::task::spawn_local`], so they run after the current task yields.
///
/// Must be used from within a `LocalSet` context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioIdleScheduler;

impl TokioIdleScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl IdleScheduler for TokioIdleScheduler {
    fn schedule(&self, task: IdleTask) {
        tokio::task::spawn_local(async move { task() });
    }
}
