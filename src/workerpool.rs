//! Bounded background-task pool with graceless-quit and cancellation
//! semantics, re-architected from `pan/general/worker-pool.{h,cc}` as an
//! async task-handle wrapper over `tokio::task` instead of `GThreadPool`.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

/// Process-wide "gracelessly quit everything" flag, mirroring the
/// original's `all_workers()`/`quitAllWorkers()` static registry. Any
/// in-flight work started before the flag is raised checks it before
/// notifying its listener.
fn graceless_quit_flag() -> &'static AtomicBool {
    static FLAG: OnceLock<AtomicBool> = OnceLock::new();
    FLAG.get_or_init(|| AtomicBool::new(false))
}

/// Tell every worker pool in the process to treat in-flight work as
/// gracelessly quit: listeners will not be notified when it finishes.
pub fn quit_all_workers() {
    graceless_quit_flag().store(true, Ordering::SeqCst);
}

/// Per-task cancellation handle, checked cooperatively by the worker body.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn was_gracelessly_quit(&self) -> bool {
        graceless_quit_flag().load(Ordering::SeqCst)
    }
}

/// Outcome delivered to a pushed work item's listener.
pub enum WorkOutcome<T> {
    Complete(T),
    Cancelled,
}

/// A bounded pool of background tasks. `max_threads = None` means
/// unbounded concurrency; `Some(n)` gates concurrent work via a semaphore,
/// matching `g_thread_pool_new(..., nthr, exclusive, ...)`.
pub struct WorkerPool {
    semaphore: Option<Arc<Semaphore>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(max_threads: Option<usize>) -> Self {
        WorkerPool {
            semaphore: max_threads.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn `work` with its own [`CancelToken`], invoking `on_complete`
    /// with the result unless the token was cancelled or the pool was
    /// gracelessly quit before the work finished, in which case
    /// `on_cancelled` runs instead (or nothing runs, for a graceless quit,
    /// matching the original's "aborting without notifying listeners").
    pub async fn push_work<F, Fut, T, OnComplete, OnCancelled>(
        &self,
        work: F,
        on_complete: OnComplete,
        on_cancelled: OnCancelled,
    ) -> CancelToken
    where
        F: FnOnce(CancelToken) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        OnComplete: FnOnce(T) + Send + 'static,
        OnCancelled: FnOnce() + Send + 'static,
    {
        let token = CancelToken::new();
        let token_for_task = token.clone();
        let semaphore = self.semaphore.clone();

        let handle = tokio::spawn(async move {
            let _permit = match &semaphore {
                Some(sem) => Some(sem.clone().acquire_owned().await.expect("semaphore closed")),
                None => None,
            };
            let result = work(token_for_task.clone()).await;

            if token_for_task.was_gracelessly_quit() {
                return;
            }
            if token_for_task.is_cancelled() {
                on_cancelled();
            } else {
                on_complete(result);
            }
        });

        self.handles.lock().await.push(handle);
        token
    }

    /// Block until every pushed task has finished, mirroring the
    /// destructor's blocking `g_thread_pool_free(tpool, false, true)`.
    pub async fn join_all(&self) {
        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }
}
