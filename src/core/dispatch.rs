//! Deferred execution of handler output
//!
//! Handlers decide synchronously whether to accept an event, then hand the
//! actual rendering and I/O to a [`Scheduler`] so the producer never waits
//! on output. Two schedulers are provided:
//!
//! - [`Dispatcher`]: a single worker thread fed through a channel. Tasks run
//!   in the order they were scheduled.
//! - [`TaskQueue`]: an explicit cooperative queue, drained one turn at a time
//!   by whoever owns it.
//!
//! Output ordering across handlers is best effort: tasks scheduled during the
//! same turn run FIFO, but nothing else is promised.

use crossbeam_channel::{bounded, unbounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Default time to wait for queued tasks during flush and shutdown (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after the scheduling call has returned.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Task);

    /// Wait up to `timeout` for everything scheduled so far to run.
    ///
    /// Cooperative schedulers are driven by their owner and return `true`
    /// immediately.
    fn drain(&self, timeout: Duration) -> bool {
        let _ = timeout;
        true
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run a task so that a panic inside it cannot take down the scheduler.
fn run_isolated(task: Task) {
    if let Err(panic) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
        eprintln!(
            "[LOGGER CRITICAL] Deferred task panicked: {}. Scheduler continues.",
            panic_message(panic.as_ref())
        );
    }
}

enum Job {
    Run(Task),
    Barrier(Sender<()>),
}

/// Worker-thread scheduler.
///
/// ```
/// use rust_fanout_logger::{Dispatcher, Scheduler};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// dispatcher.schedule(Box::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// assert!(dispatcher.flush());
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct Dispatcher {
    sender: RwLock<Option<Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    worker: ThreadId,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded::<Job>();

        let handle = thread::spawn(move || {
            for job in receiver.iter() {
                match job {
                    Job::Run(task) => run_isolated(task),
                    Job::Barrier(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });
        let worker = handle.thread().id();

        Self {
            sender: RwLock::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            worker,
        }
    }

    /// The process-wide dispatcher used by handlers that are not given a
    /// scheduler of their own.
    pub fn global() -> Arc<Dispatcher> {
        static GLOBAL: OnceLock<Arc<Dispatcher>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Dispatcher::new())))
    }

    /// Wait until every task scheduled before this call has run.
    ///
    /// Returns `false` on timeout, after shutdown, or when called from a
    /// task running on the dispatcher itself.
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        if thread::current().id() == self.worker {
            return false;
        }

        let (ack, done) = bounded(1);
        {
            let sender = self.sender.read();
            let Some(sender) = sender.as_ref() else {
                return false;
            };
            if sender.send(Job::Barrier(ack)).is_err() {
                return false;
            }
        }
        done.recv_timeout(timeout).is_ok()
    }

    pub fn flush(&self) -> bool {
        self.flush_timeout(DEFAULT_SHUTDOWN_TIMEOUT)
    }

    /// Stop accepting tasks and wait for the queued ones to drain.
    ///
    /// Returns `true` if the worker finished within `timeout`. Tasks
    /// scheduled after shutdown are discarded.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.write().take());

        let Some(handle) = self.handle.lock().take() else {
            return true;
        };
        if thread::current().id() == self.worker {
            return false;
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Dispatcher worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Dispatcher worker did not finish within {:?}. \
                     Some log output may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for Dispatcher {
    fn schedule(&self, task: Task) {
        if let Some(sender) = self.sender.read().as_ref() {
            // Disconnected means the worker is gone; nothing left to run it
            let _ = sender.send(Job::Run(task));
        }
    }

    fn drain(&self, timeout: Duration) -> bool {
        // Shutdown already ran everything that was queued
        self.is_shut_down() || self.flush_timeout(timeout)
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

/// Cooperative scheduler: tasks wait until the owner runs a turn.
///
/// ```
/// use rust_fanout_logger::{Scheduler, TaskQueue};
///
/// let queue = TaskQueue::new();
/// queue.schedule(Box::new(|| println!("later")));
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.run_pending(), 1);
/// assert!(queue.is_empty());
/// ```
#[derive(Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one turn: every task queued before this call, in FIFO order.
    /// Tasks scheduled while the turn runs wait for the next one.
    pub fn run_pending(&self) -> usize {
        let turn: Vec<Task> = self.tasks.lock().drain(..).collect();
        let count = turn.len();
        for task in turn {
            run_isolated(task);
        }
        count
    }

    /// Run turns until no task is left.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }
}
