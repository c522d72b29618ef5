//! Tracked fire-and-forget task spawning.

use std::future::Future;
use std::sync::Mutex;
use tokio::task::JoinHandle;

/// Registry of detached background tasks.
///
/// Follow-up deliveries must outlive the request that produced the HTTP
/// response, but the hosting process still has to stay alive until they
/// finish. Hosts hold a handle to this registry and call [`wait_idle`]
/// before shutting down.
///
/// [`wait_idle`]: BackgroundTasks::wait_idle
pub struct BackgroundTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundTasks {
    /// Create an empty task registry.
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a detached task and track its handle.
    ///
    /// There is no cancellation path: once enqueued, the task runs to
    /// completion or process shutdown.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.handles.lock().unwrap().push(handle);
    }

    /// Number of tasks spawned and not yet joined via [`wait_idle`].
    ///
    /// [`wait_idle`]: BackgroundTasks::wait_idle
    pub fn pending(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    /// Wait until every tracked task has completed.
    ///
    /// Loops in case a tracked task was spawned while waiting on an
    /// earlier batch.
    pub async fn wait_idle(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut handles = self.handles.lock().unwrap();
                handles.drain(..).collect()
            };
            if drained.is_empty() {
                return;
            }
            for handle in drained {
                // A panicked task is already logged by the runtime; waiting
                // callers only care that nothing is still running.
                let _ = handle.await;
            }
        }
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
