//! Concurrent seeding phase.
//!
//! Independent seeders run as tokio tasks under one deadline. A task looks
//! at the deadline once, before doing anything; once started it runs to
//! completion. Failures go to a bounded channel that is drained after every
//! task has been joined, and the first one ends the run.

use seed_populate_postgresql::{Credential, SeedError};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, warn};

type TaskFuture = Pin<Box<dyn Future<Output = Result<TaskOutput, SeedError>> + Send>>;

/// What a finished seeding task hands back to the orchestrator.
#[derive(Debug, Default)]
pub struct TaskOutput {
    pub rows: u64,
    /// Private credential buffer, merged at the join point.
    pub credentials: Vec<Credential>,
}

impl TaskOutput {
    pub fn rows(rows: u64) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

/// A named seeding task. The future is not polled before the task starts.
pub struct SeedTask {
    name: &'static str,
    future: TaskFuture,
}

impl SeedTask {
    pub fn new<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = Result<TaskOutput, SeedError>> + Send + 'static,
    {
        Self {
            name,
            future: Box::pin(future),
        }
    }
}

#[derive(Debug)]
struct TaskFailure {
    task: &'static str,
    error: SeedError,
}

enum TaskStatus {
    Completed(TaskOutput),
    PastDeadline,
    Failed,
}

/// Outcome of a phase in which no task failed.
#[derive(Debug, Default)]
pub struct PhaseReport {
    /// `(task, rows)` for every completed task, in completion order.
    pub completed: Vec<(&'static str, u64)>,
    /// Tasks that found the deadline already passed.
    pub skipped: Vec<&'static str>,
    pub credentials: Vec<Credential>,
}

/// Run `tasks` concurrently and wait for all of them.
///
/// Returns the first reported failure (or a panicked task) as an error.
/// Work committed by other tasks is left in place.
pub async fn run_concurrent_phase(
    tasks: Vec<SeedTask>,
    deadline: Instant,
) -> anyhow::Result<PhaseReport> {
    let (err_tx, mut err_rx) = mpsc::channel::<TaskFailure>(tasks.len().max(1));
    let mut set = JoinSet::new();

    for task in tasks {
        let err_tx = err_tx.clone();
        set.spawn(async move {
            if Instant::now() >= deadline {
                return (task.name, TaskStatus::PastDeadline);
            }
            info!("Creating {}...", task.name);
            match task.future.await {
                Ok(output) => {
                    info!("Creating {} done ({} rows)", task.name, output.rows);
                    (task.name, TaskStatus::Completed(output))
                }
                Err(error) => {
                    // Capacity equals the task count, so this never waits
                    let _ = err_tx
                        .send(TaskFailure {
                            task: task.name,
                            error,
                        })
                        .await;
                    (task.name, TaskStatus::Failed)
                }
            }
        });
    }
    drop(err_tx);

    let mut report = PhaseReport::default();
    let mut panicked = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, TaskStatus::Completed(output))) => {
                report.completed.push((name, output.rows));
                report.credentials.extend(output.credentials);
            }
            Ok((name, TaskStatus::PastDeadline)) => {
                warn!("Deadline passed before {} started, skipping", name);
                report.skipped.push(name);
            }
            Ok((_, TaskStatus::Failed)) => {}
            Err(e) => {
                error!("Seeding task panicked: {}", e);
                panicked.get_or_insert(e);
            }
        }
    }

    if let Some(failure) = err_rx.recv().await {
        error!("Seeding task {} failed: {}", failure.task, failure.error);
        return Err(anyhow::Error::new(failure.error)
            .context(format!("Seeding task '{}' failed", failure.task)));
    }
    if let Some(e) = panicked {
        anyhow::bail!("Seeding task panicked: {e}");
    }
    Ok(report)
}
