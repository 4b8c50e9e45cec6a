use std::future::Future;
use std::pin::Pin;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::JoinHandle,
    time::timeout,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{Instrument, Span, debug, info, warn};

use crate::config::PoolConfig;
use crate::error::ExtractionError;

type BoxedTask<T> = Pin<Box<dyn Future<Output = Result<T, ExtractionError>> + Send>>;

/// Eventual outcome of a submitted task.
pub enum TaskHandle<T> {
    /// Running, or queued, on a pool worker.
    Spawned(JoinHandle<Result<T, ExtractionError>>),
    /// Pool saturated: the task runs when the submitter awaits it.
    CallerRuns(BoxedTask<T>),
    /// Settled without running anything (validation failure, cache hit).
    Ready(Result<T, ExtractionError>),
}

impl<T> TaskHandle<T> {
    pub async fn join(self) -> Result<T, ExtractionError> {
        match self {
            Self::Spawned(handle) => handle
                .await
                .unwrap_or_else(|e| Err(ExtractionError::WorkerFailed(e.to_string()))),
            Self::CallerRuns(task) => task.await,
            Self::Ready(result) => result,
        }
    }

    pub fn runs_on_caller(&self) -> bool {
        matches!(self, Self::CallerRuns(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Decrements the backlog count when a queued task starts or is dropped.
struct QueueSlot(Arc<AtomicUsize>);

impl Drop for QueueSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bounded async worker pool.
///
/// Submissions take a core permit if one is free, otherwise wait in a backlog
/// of `queue_capacity`. With the backlog full the pool grows up to
/// `max_size` workers; beyond that the submitter runs the task itself.
pub struct WorkerPool {
    name: &'static str,
    config: PoolConfig,
    core: Arc<Semaphore>,
    overflow: Arc<Semaphore>,
    queued: Arc<AtomicUsize>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl WorkerPool {
    pub fn new(name: &'static str, config: PoolConfig) -> Self {
        let overflow_size = config.max_size.saturating_sub(config.core_size);
        Self {
            name,
            core: Arc::new(Semaphore::new(config.core_size)),
            overflow: Arc::new(Semaphore::new(overflow_size)),
            queued: Arc::new(AtomicUsize::new(0)),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            config,
        }
    }

    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: Future<Output = Result<T, ExtractionError>> + Send + 'static,
        T: Send + 'static,
    {
        if self.tracker.is_closed() {
            return TaskHandle::Ready(Err(ExtractionError::PoolShutdown));
        }

        if let Ok(permit) = self.core.clone().try_acquire_owned() {
            return self.spawn_with(permit, task);
        }

        if let Some(slot) = self.try_enqueue() {
            let core = self.core.clone();
            let queued = async move {
                let permit = core.acquire_owned().await;
                drop(slot);
                let _permit = permit.map_err(|_| ExtractionError::PoolShutdown)?;
                task.await
            };
            return TaskHandle::Spawned(self.tracker.spawn(Self::cancellable(self.cancel.clone(), queued)));
        }

        if let Ok(permit) = self.overflow.clone().try_acquire_owned() {
            debug!(pool = self.name, "Backlog full, growing past core size");
            return self.spawn_with(permit, task);
        }

        warn!(pool = self.name, "Pool saturated, running task on caller");
        TaskHandle::CallerRuns(Box::pin(task.instrument(Span::current())))
    }

    fn spawn_with<F, T>(&self, permit: OwnedSemaphorePermit, task: F) -> TaskHandle<T>
    where
        F: Future<Output = Result<T, ExtractionError>> + Send + 'static,
        T: Send + 'static,
    {
        let task = async move {
            let _permit = permit;
            task.await
        };
        TaskHandle::Spawned(self.tracker.spawn(Self::cancellable(self.cancel.clone(), task)))
    }

    fn try_enqueue(&self) -> Option<QueueSlot> {
        let capacity = self.config.queue_capacity;
        self.queued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < capacity).then_some(n + 1)
            })
            .ok()
            .map(|_| QueueSlot(self.queued.clone()))
    }

    fn cancellable<F, T>(
        cancel: CancellationToken,
        task: F,
    ) -> impl Future<Output = Result<T, ExtractionError>> + Send + 'static
    where
        F: Future<Output = Result<T, ExtractionError>> + Send + 'static,
        T: Send + 'static,
    {
        async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(ExtractionError::PoolShutdown),
                result = task => result,
            }
        }
        .instrument(Span::current())
    }

    /// Stops accepting work and waits for in-flight tasks for up to the
    /// configured grace period, then cancels whatever is left.
    pub async fn shutdown(&self) {
        self.tracker.close();
        info!(pool = self.name, in_flight = self.tracker.len(), "Shutting down worker pool");

        if timeout(self.config.shutdown_grace, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                pool = self.name,
                remaining = self.tracker.len(),
                "Grace period elapsed, cancelling in-flight tasks"
            );
            self.cancel.cancel();
            self.tracker.wait().await;
        }
        info!(pool = self.name, "Worker pool stopped");
    }

    /// Workers currently holding a permit.
    pub fn active(&self) -> usize {
        let overflow_size = self.config.max_size.saturating_sub(self.config.core_size);
        (self.config.core_size - self.core.available_permits())
            + (overflow_size - self.overflow.available_permits())
    }

    /// Tasks waiting for a core worker.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shutdown_grace(&self) -> Duration {
        self.config.shutdown_grace
    }
}
