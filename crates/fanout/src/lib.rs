//! Bounded-concurrency task fan-out.
//!
//! [`FanOut`] spawns one tokio task per item and hands each task an owned
//! [`Semaphore`] permit that lives exactly as long as the task, so at most
//! `capacity` tasks are ever in flight. The permit is dropped on every exit
//! path, including panics. [`FanOut::join`] is the barrier that waits for the
//! remaining tasks to drain.
//!
//! Task outputs are folded into an accumulator as soon as they are reaped, so
//! a fan-out over many items only holds the outputs of tasks that finished
//! since the last spawn.

use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::task::{JoinError, JoinSet};

#[derive(Debug, thiserror::Error)]
pub enum FanOutError {
    #[error("concurrency gate closed: {0}")]
    Closed(#[from] AcquireError),
}

/// Accumulated output once every spawned task has finished.
#[derive(Debug)]
pub struct Joined<A> {
    /// Every task output folded into the accumulator, in completion order.
    pub output: A,
    /// Tasks that panicked or were aborted instead of returning.
    pub failed: usize,
}

pub struct FanOut<T, A = Vec<T>> {
    gate: Arc<Semaphore>,
    capacity: usize,
    tasks: JoinSet<T>,
    acc: A,
    fold: fn(&mut A, T),
    failed: usize,
}

impl<T: Send + 'static> FanOut<T, Vec<T>> {
    /// Create a fan-out that runs at most `capacity` tasks at once and
    /// collects every output. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self::folding(capacity, Vec::new(), |outputs, output| outputs.push(output))
    }
}

impl<T: Send + 'static, A> FanOut<T, A> {
    /// Create a fan-out that runs at most `capacity` tasks at once and folds
    /// each output into `init` with `fold` as soon as the task is reaped.
    pub fn folding(capacity: usize, init: A, fold: fn(&mut A, T)) -> Self {
        let capacity = capacity.max(1);
        Self {
            gate: Arc::new(Semaphore::new(capacity)),
            capacity,
            tasks: JoinSet::new(),
            acc: init,
            fold,
            failed: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Outputs folded so far.
    pub fn folded(&self) -> &A {
        &self.acc
    }

    /// Number of tasks currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.gate.available_permits()
    }

    /// Wait for a free slot, then spawn `task` holding it.
    ///
    /// Suspends the caller while `capacity` tasks are already running.
    pub async fn spawn<F>(&mut self, task: F) -> Result<(), FanOutError>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permit = self.gate.clone().acquire_owned().await?;
        self.reap();

        self.tasks.spawn(async move {
            let _permit = permit;
            task.await
        });

        Ok(())
    }

    /// Collect outputs of tasks that already finished without waiting.
    fn reap(&mut self) {
        while let Some(Some(result)) = self.tasks.join_next().now_or_never() {
            self.collect(result);
        }
    }

    fn collect(&mut self, result: Result<T, JoinError>) {
        match result {
            Ok(output) => (self.fold)(&mut self.acc, output),
            Err(e) => {
                self.failed += 1;
                log::error!("fan-out task did not complete: {}", e);
            }
        }
    }

    /// Wait for every spawned task to finish and return the accumulator.
    pub async fn join(mut self) -> Joined<A> {
        while let Some(result) = self.tasks.join_next().await {
            self.collect(result);
        }

        Joined {
            output: self.acc,
            failed: self.failed,
        }
    }
}
