//! Bounded parallel execution of independent jobs with per-job failure capture.

use crate::ReportError;
use std::{fmt::Debug, future::Future, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};

/// Outcome of a batch: every job ends up in exactly one of the two lists, in completion order.
#[derive(Debug)]
pub struct BatchReport<J, T> {
    pub succeeded: Vec<(J, T)>,
    pub failed: Vec<(J, ReportError)>,
}

impl<J, T> Default for BatchReport<J, T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<J, T> BatchReport<J, T> {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs `work` on every job, at most `concurrency` at a time, on the current tokio runtime.
///
/// A job's error (or panic) is recorded against that job and does not affect the others.
pub async fn run_batch<J, T, F, Fut>(jobs: Vec<J>, concurrency: usize, work: F) -> BatchReport<J, T>
where
    J: Clone + Debug + Send + 'static,
    T: Send + 'static,
    F: Fn(J) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ReportError>> + Send + 'static,
{
    log::trace!("entering `run_batch` with {} jobs", jobs.len());
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let work = Arc::new(work);
    let mut set = JoinSet::new();

    for job in jobs {
        let semaphore = semaphore.clone();
        let work = work.clone();
        set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    // Run in a task of its own so a panic is caught as a `JoinError`.
                    match tokio::spawn(work(job.clone())).await {
                        Ok(result) => result,
                        Err(e) => Err(ReportError::Worker(format!("{job:?}: {e}"))),
                    }
                }
                Err(e) => Err(ReportError::Worker(format!("{job:?}: {e}"))),
            };
            (job, result)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((job, Ok(value))) => report.succeeded.push((job, value)),
            Ok((job, Err(e))) => {
                log::warn!("{job:?} failed: {e}");
                report.failed.push((job, e));
            }
            // The outer task only awaits; it is never aborted and can't panic.
            Err(e) => log::error!("batch task lost: {e}"),
        }
    }
    report
}

/// Same as [`run_batch`] for blocking work, which runs on tokio's blocking thread pool.
pub async fn run_blocking_batch<J, T, F>(jobs: Vec<J>, concurrency: usize, work: F) -> BatchReport<J, T>
where
    J: Clone + Debug + Send + 'static,
    T: Send + 'static,
    F: Fn(J) -> Result<T, ReportError> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    run_batch(jobs, concurrency, move |job| {
        let work = work.clone();
        async move {
            tokio::task::spawn_blocking(move || work(job))
                .await
                .unwrap_or_else(|e| Err(ReportError::Worker(e.to_string())))
        }
    })
    .await
}

/// Runs [`run_batch`] on a fresh multi-thread runtime, for callers outside async code.
pub fn block_on_batch<J, T, F, Fut>(
    jobs: Vec<J>,
    concurrency: usize,
    work: F,
) -> Result<BatchReport<J, T>, ReportError>
where
    J: Clone + Debug + Send + 'static,
    T: Send + 'static,
    F: Fn(J) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ReportError>> + Send + 'static,
{
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ReportError::Worker(format!("runtime: {e}")))?;
    Ok(rt.block_on(run_batch(jobs, concurrency, work)))
}
