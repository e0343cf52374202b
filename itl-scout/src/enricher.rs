//! Roster enrichment
//!
//! Fans out one fetch task per (role, category) pair, ten tasks for a full
//! roster, and waits for all of them before judging completeness.
//!
//! # Concurrency
//! Tasks are spawned on the tokio runtime into a [`JoinSet`]; a [`Semaphore`]
//! with `max_concurrency` permits bounds the number of fetches in flight.
//! Every task writes a different write-once cell, so tasks never contend
//! for the same field.
//!
//! # Failure isolation
//! A failed or timed-out fetch leaves its field absent; a rejected write
//! leaves the earlier value in place. Both are logged and neither is
//! returned to the caller. The only verdict is a boolean computed once every
//! task has settled.

use crate::error::{FetchError, ModelError};
use crate::model::{Category, Entity, Queue, Role, Roster};
use crate::source::{FetchRequest, SummarySource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Fetches in flight when not configured otherwise
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Terminal state of one fetch task
#[derive(Debug)]
pub enum TaskOutcome {
    /// Collection stored
    Succeeded { summaries: usize },
    /// The source returned an error (timeouts included)
    Failed(FetchError),
    /// The fetch succeeded but the collection was already set
    Rejected(ModelError),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded { .. })
    }
}

/// Outcome of one (role, category) task
#[derive(Debug)]
pub struct TaskReport {
    pub role: Role,
    pub category: Category,
    pub outcome: TaskOutcome,
}

/// Result of an enrichment run
#[derive(Debug)]
pub struct EnrichReport {
    /// Settled tasks, in completion order
    pub tasks: Vec<TaskReport>,
    /// Tasks that ended without reporting (panicked or aborted)
    pub aborted: usize,
    /// Every task succeeded and the roster is complete
    pub complete: bool,
}

impl EnrichReport {
    pub fn succeeded(&self) -> usize {
        self.tasks.iter().filter(|t| t.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.tasks.len() - self.succeeded() + self.aborted
    }
}

/// Concurrent roster enricher
pub struct Enricher {
    source: Arc<dyn SummarySource>,
    max_concurrency: usize,
    task_timeout: Option<Duration>,
    queue: Option<Queue>,
    champion: Option<String>,
}

impl Enricher {
    /// `max_concurrency` below 1 is raised to 1
    pub fn new(source: Arc<dyn SummarySource>, max_concurrency: usize) -> Self {
        Self {
            source,
            max_concurrency: max_concurrency.max(1),
            task_timeout: None,
            queue: None,
            champion: None,
        }
    }

    /// Classify fetches that exceed `timeout` as failed
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Forward a queue filter on every request
    pub fn with_queue(mut self, queue: Queue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Restrict every request to games on `champion`
    pub fn with_champion(mut self, champion: impl Into<String>) -> Self {
        self.champion = Some(champion.into());
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Populate every entity's `pool` and `against` collections
    ///
    /// Returns `true` only if all ten tasks succeeded and the roster is
    /// complete. Fields that were already set before the call are left
    /// untouched and count as failed tasks.
    pub async fn enrich(&self, roster: &Roster) -> bool {
        self.enrich_with_report(roster).await.complete
    }

    /// Same as [`Enricher::enrich`], keeping the per-task outcomes
    pub async fn enrich_with_report(&self, roster: &Roster) -> EnrichReport {
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for role in Role::ALL {
            for category in Category::ALL {
                let entity = roster.shared(role);
                let request = FetchRequest::for_entity(&entity, role, category)
                    .with_queue(self.queue)
                    .with_champion(self.champion.clone());
                let source = Arc::clone(&self.source);
                let permits = Arc::clone(&permits);
                let task_timeout = self.task_timeout;

                tasks.spawn(async move {
                    // The semaphore is never closed
                    let outcome = match permits.acquire_owned().await {
                        Ok(_permit) => run_task(source.as_ref(), &entity, &request, task_timeout).await,
                        Err(e) => TaskOutcome::Failed(FetchError::Network(e.to_string())),
                    };
                    TaskReport {
                        role,
                        category,
                        outcome,
                    }
                });
            }
        }

        debug!(
            tasks = tasks.len(),
            max_concurrency = self.max_concurrency,
            "Enrichment tasks scheduled"
        );

        let mut reports = Vec::with_capacity(tasks.len());
        let mut aborted = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(error = %e, "Enrichment task did not complete");
                    aborted += 1;
                }
            }
        }

        let all_settled_ok = aborted == 0 && reports.iter().all(|r| r.outcome.is_success());
        let report = EnrichReport {
            complete: all_settled_ok && roster.is_complete(),
            tasks: reports,
            aborted,
        };

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            complete = report.complete,
            "Enrichment finished"
        );

        report
    }
}

async fn run_task(
    source: &dyn SummarySource,
    entity: &Entity,
    request: &FetchRequest,
    task_timeout: Option<Duration>,
) -> TaskOutcome {
    debug!(
        summoner = %request.subject,
        role = %request.role,
        category = %request.category,
        "Fetch started"
    );

    let fetched = match task_timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch(request))
            .await
            .unwrap_or(Err(FetchError::Timeout(limit))),
        None => source.fetch(request).await,
    };

    let summaries = match fetched {
        Ok(summaries) => summaries,
        Err(e) => {
            warn!(
                summoner = %request.subject,
                role = %request.role,
                category = %request.category,
                error = %e,
                "Fetch failed (per-task error isolation)"
            );
            return TaskOutcome::Failed(e);
        }
    };

    let count = summaries.len();
    match entity.set(request.category, summaries) {
        Ok(()) => {
            info!(
                summoner = %request.subject,
                role = %request.role,
                category = %request.category,
                summaries = count,
                "Collection stored"
            );
            TaskOutcome::Succeeded { summaries: count }
        }
        Err(e) => {
            error!(
                summoner = %request.subject,
                role = %request.role,
                category = %request.category,
                error = %e,
                "Fetched collection rejected"
            );
            TaskOutcome::Rejected(e)
        }
    }
}
