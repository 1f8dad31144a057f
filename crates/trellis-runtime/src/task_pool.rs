//! Background task pool for module resolution.
//!
//! Discovery hands each unique widget name to the pool, so resolutions
//! run concurrently and complete in any order; instantiation still
//! happens on the caller's thread as results arrive.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use async_executor::{Executor, Task};

/// A thread pool driving an async executor.
pub struct TaskPool {
    executor: Arc<Executor<'static>>,
    threads: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl TaskPool {
    /// Create a pool with the given number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is 0.
    pub fn new(num_threads: usize) -> Self {
        assert!(num_threads > 0, "TaskPool must have at least one thread");

        let executor = Arc::new(Executor::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::with_capacity(num_threads);

        for i in 0..num_threads {
            let exec = executor.clone();
            let shutdown_flag = shutdown.clone();
            let handle = thread::Builder::new()
                .name(format!("trellis-resolve-{}", i))
                .spawn(move || {
                    while !shutdown_flag.load(Ordering::Relaxed) {
                        if !exec.try_tick() {
                            thread::sleep(std::time::Duration::from_millis(1));
                        }
                    }
                })
                .expect("failed to spawn task pool thread");
            threads.push(handle);
        }

        Self {
            executor,
            threads,
            shutdown,
        }
    }

    /// Create a pool sized to leave one core free for the UI thread.
    pub fn default_threads() -> Self {
        Self::new(num_cpus::get().saturating_sub(1).max(1))
    }

    /// Spawn a future on the pool. Dropping the returned [`Task`] cancels
    /// it.
    pub fn spawn<T>(&self, future: impl Future<Output = T> + Send + 'static) -> Task<T>
    where
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Stop the workers and wait for them to finish.
    pub fn shutdown(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for handle in std::mem::take(&mut self.threads) {
            if let Err(e) = handle.join() {
                tracing::error!("task pool thread panicked: {:?}", e);
            }
        }
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::default_threads()
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
