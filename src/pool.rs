//! Bounded worker pool the bus hands its jobs to.
//!
//! - A single bounded queue (`tokio::sync::mpsc`) shared by `max_workers` worker loops.
//! - `submit()` never waits: a full queue or a stopped pool rejects the job immediately.
//! - Each worker runs one job at a time on Tokio's blocking pool, so jobs may block.
//! - `shutdown()` stops intake and waits until every accepted job has run (drain, not cancel).
//!
//! Jobs are FIFO within the queue. With one worker that is also the execution
//! order; with more, jobs taken by different workers may run in any order.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{
    select,
    sync::{
        Mutex,
        mpsc::{Receiver, Sender, channel},
    },
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{Config, Rejection, Result};

/// A unit of work executed exactly once by exactly one worker.
///
/// Any `FnOnce() + Send + 'static` closure is a job.
pub trait Job: Send + 'static {
    fn run(self);
}

impl<F> Job for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self) {
        self()
    }
}

pub struct WorkerPool<J: Job> {
    name: Arc<str>,
    config: Config,
    sender: Sender<J>,
    receiver: Arc<Mutex<Receiver<J>>>,
    workers: Mutex<JoinSet<()>>,
    cancel_token: CancellationToken,
    started: AtomicBool,
}

impl<J: Job> WorkerPool<J> {
    /// Create a stopped pool. Call [`start`](Self::start) to spawn the workers.
    pub fn new<N: Into<Arc<str>>>(name: N, config: Config) -> Result<Self> {
        config.validate()?;
        let (tx, rx) = channel::<J>(config.channel_capacity());
        Ok(Self {
            name: name.into(),
            config,
            sender: tx,
            receiver: Arc::new(Mutex::new(rx)),
            workers: Mutex::new(JoinSet::new()),
            cancel_token: CancellationToken::new(),
            started: AtomicBool::new(false),
        })
    }

    /// Spawn `max_workers` worker loops on the current Tokio runtime.
    ///
    /// Does nothing if the pool was already started.
    pub fn start(&mut self) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()?;
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        let workers = self.workers.get_mut();
        for id in 0..self.config.max_workers {
            let worker = Worker {
                id,
                pool: self.name.clone(),
                receiver: self.receiver.clone(),
                cancel_token: self.cancel_token.clone(),
            };
            workers.spawn_on(worker.run(), &handle);
        }

        self.started.store(true, Ordering::Release);
        Ok(())
    }

    /// Queue a job without waiting.
    ///
    /// Fails with [`Rejection::QueueFull`] when the queue is at capacity and
    /// with [`Rejection::PoolStopped`] when the pool isn't running.
    pub fn submit(&self, job: J) -> Result<()> {
        if !self.is_running() {
            return Err(Rejection::PoolStopped.into());
        }
        self.sender.try_send(job)?;
        Ok(())
    }

    /// Stop accepting jobs, then wait until queued and in-flight jobs finish.
    ///
    /// Safe to call repeatedly and concurrently; every caller returns once
    /// the workers are gone.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();

        let mut workers = self.workers.lock().await;
        while let Some(res) = workers.join_next().await {
            if let Err(e) = res {
                tracing::error!(pool = %self.name, error = %e, "Worker join error");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.cancel_token.is_cancelled()
    }

    /// Number of jobs waiting for a worker.
    pub fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<J: Job> std::fmt::Debug for WorkerPool<J> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("queued", &self.queued())
            .finish()
    }
}

struct Worker<J: Job> {
    id: usize,
    pool: Arc<str>,
    receiver: Arc<Mutex<Receiver<J>>>,
    cancel_token: CancellationToken,
}

impl<J: Job> Worker<J> {
    async fn run(self) {
        tracing::debug!(pool = %self.pool, worker = self.id, "Worker started");

        while let Some(job) = self.next_job().await {
            if let Err(e) = tokio::task::spawn_blocking(move || job.run()).await {
                tracing::error!(pool = %self.pool, worker = self.id, error = %e, "Job failed to complete");
            }
        }

        tracing::debug!(pool = %self.pool, worker = self.id, "Worker stopped");
    }

    /// Next queued job, or `None` once the pool is cancelled and the queue is drained.
    ///
    /// The first worker to observe cancellation closes the queue, so later
    /// submissions are rejected instead of being stranded.
    async fn next_job(&self) -> Option<J> {
        let mut receiver = self.receiver.lock().await;
        select! {
            biased;
            job = receiver.recv() => job,
            _ = self.cancel_token.cancelled() => {
                receiver.close();
                receiver.recv().await
            }
        }
    }
}
