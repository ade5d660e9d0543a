//! # Concurrency Scheduler Module
//!
//! Scheduler a concorrenza limitata: una coda FIFO di file in attesa e un
//! `JoinSet` di pipeline in esecuzione, mai più di `concurrency` alla volta.
//!
//! ## Algoritmo:
//! 1. Riempie il set finché `in_flight < concurrency` e la coda non è vuota
//! 2. Attende il completamento di una pipeline qualsiasi
//! 3. Registra il risultato e torna al punto 1
//! 4. Termina quando coda e set sono entrambi vuoti
//!
//! Il fallimento di una pipeline non interrompe le altre: ogni risultato
//! viene raccolto nel `BatchReport`. Coda e set sono posseduti dal solo
//! loop dello scheduler, quindi non servono lock.

use crate::error::OptimizeError;
use futures::FutureExt;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// One input file awaiting processing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem(PathBuf);

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for WorkItem {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A work item whose pipeline failed
#[derive(Debug)]
pub struct ItemFailure {
    pub item: WorkItem,
    pub error: OptimizeError,
}

/// Results of a scheduler run, in completion order
#[derive(Debug)]
pub struct BatchReport<T> {
    pub completed: Vec<(WorkItem, T)>,
    pub failures: Vec<ItemFailure>,
}

impl<T> BatchReport<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            completed: Vec::with_capacity(capacity),
            failures: Vec::new(),
        }
    }

    /// Number of items that reached completion
    pub fn total(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    /// True only if every pipeline succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Bounded-concurrency driver for per-item pipelines
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyScheduler {
    concurrency: usize,
}

impl ConcurrencyScheduler {
    pub fn new(concurrency: usize) -> Result<Self, OptimizeError> {
        if concurrency == 0 {
            return Err(OptimizeError::Config(
                "Concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { concurrency })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `task` for every item, at most `concurrency` at a time.
    ///
    /// Items start in the given order; completion order is unspecified.
    /// Resolves once every started task has finished.
    pub async fn run<T, F, Fut>(&self, items: Vec<WorkItem>, task: F) -> BatchReport<T>
    where
        F: Fn(WorkItem) -> Fut,
        Fut: Future<Output = Result<T, OptimizeError>> + Send + 'static,
        T: Send + 'static,
    {
        let mut pending: VecDeque<WorkItem> = items.into();
        let mut in_flight: JoinSet<(WorkItem, Result<T, OptimizeError>)> = JoinSet::new();
        let mut report = BatchReport::with_capacity(pending.len());
        // Items whose task has not handed back a result yet
        let mut running: Vec<WorkItem> = Vec::with_capacity(self.concurrency);

        loop {
            while in_flight.len() < self.concurrency {
                let Some(item) = pending.pop_front() else {
                    break;
                };
                debug!(
                    path = %item,
                    in_flight = in_flight.len() + 1,
                    pending = pending.len(),
                    "Starting pipeline"
                );

                running.push(item.clone());
                let future = task(item.clone());
                in_flight.spawn(async move {
                    let result = match AssertUnwindSafe(future).catch_unwind().await {
                        Ok(result) => result,
                        Err(panic) => Err(OptimizeError::Panicked(panic_message(panic.as_ref()))),
                    };
                    (item, result)
                });
            }

            // Empty set here means the queue is drained too
            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            if let Ok((item, _)) = &joined {
                if let Some(pos) = running.iter().position(|r| r == item) {
                    running.swap_remove(pos);
                }
            }

            match joined {
                Ok((item, Ok(output))) => {
                    debug!(path = %item, "Pipeline completed");
                    report.completed.push((item, output));
                }
                Ok((item, Err(e))) => {
                    debug!(path = %item, kind = e.kind(), "Pipeline failed");
                    report.failures.push(ItemFailure { item, error: e });
                }
                Err(join_err) => {
                    error!(error = %join_err, "Pipeline task ended without a result");
                }
            }
        }

        // Every started item is accounted for, even if its task was lost
        for item in running {
            let error = OptimizeError::Aborted(format!("no result for {}", item));
            report.failures.push(ItemFailure { item, error });
        }

        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
