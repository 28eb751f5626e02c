//! Shared state of the background jobs run by this server.
//!
//! Workers never touch the job map directly. They push [`JobUpdate`]s into
//! `JobsState::tx`, and [`start_job_updater`] applies them one at a time.
//! Once a job is terminal (completed, failed or cancelled) later updates for
//! it are dropped, so a cancelled export stays cancelled even if its worker
//! finishes afterwards. Finished jobs are forgotten after a retention
//! window by [`start_job_pruner`].

use common::jobs::JobStatus;
use common::model::task::TaskSummary;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// One tracked job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// Kind of work, e.g. `export_csv`. Shown in the task listing.
    pub name: String,
    pub status: JobStatus,
    /// Registration order, used to list jobs oldest first.
    pub seq: u64,
    /// When the job reached a terminal status.
    pub finished_at: Option<Instant>,
}

impl JobRecord {
    fn set_status(&mut self, status: JobStatus) {
        if status.is_terminal() {
            self.finished_at = Some(Instant::now());
        }
        self.status = status;
    }

    pub fn summary(&self, id: &str) -> TaskSummary {
        let (result, error) = match &self.status {
            JobStatus::Completed(url) => (Some(url.clone()), None),
            JobStatus::Failed(e) => (None, Some(e.clone())),
            JobStatus::Cancelled => (None, Some("cancelled by user".to_string())),
            JobStatus::Pending | JobStatus::InProgress(_) => (None, None),
        };
        TaskSummary {
            id: id.to_string(),
            name: self.name.clone(),
            status: self.status.task_status().as_str().to_string(),
            result,
            error,
        }
    }
}

/// Clonable handle on every job, injected into the app as `web::Data`.
#[derive(Clone)]
pub struct JobsState {
    pub jobs: Arc<RwLock<HashMap<String, JobRecord>>>,
    /// Workers report status changes here.
    pub tx: mpsc::Sender<JobUpdate>,
    next_seq: Arc<AtomicU64>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// What happened to a cancel request.
#[derive(Debug, PartialEq)]
pub enum CancelOutcome {
    Cancelled,
    /// The job had already finished; its status is returned unchanged.
    AlreadyFinished(JobStatus),
    NotFound,
}

impl JobsState {
    pub fn new(tx: mpsc::Sender<JobUpdate>) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Inserts a new `Pending` job and returns its record.
    pub async fn register(&self, job_id: &str, name: &str) -> JobRecord {
        let record = JobRecord {
            name: name.to_string(),
            status: JobStatus::Pending,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            finished_at: None,
        };
        self.jobs
            .write()
            .await
            .insert(job_id.to_string(), record.clone());
        record
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).map(|r| r.status.clone())
    }

    /// Every job, oldest first.
    pub async fn summaries(&self) -> Vec<TaskSummary> {
        let jobs = self.jobs.read().await;
        let mut records: Vec<(&String, &JobRecord)> = jobs.iter().collect();
        records.sort_by_key(|(_, record)| record.seq);
        records
            .into_iter()
            .map(|(id, record)| record.summary(id))
            .collect()
    }

    pub async fn cancel(&self, job_id: &str) -> CancelOutcome {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(job_id) {
            None => CancelOutcome::NotFound,
            Some(record) if record.status.is_terminal() => {
                CancelOutcome::AlreadyFinished(record.status.clone())
            }
            Some(record) => {
                record.set_status(JobStatus::Cancelled);
                CancelOutcome::Cancelled
            }
        }
    }

    /// Applies one update. Unknown and terminal jobs are left alone.
    pub async fn apply(&self, update: JobUpdate) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&update.job_id) {
            Some(record) if !record.status.is_terminal() => record.set_status(update.status),
            Some(record) => debug!(
                "dropping update {:?} for finished job {} ({:?})",
                update.status, update.job_id, record.status
            ),
            None => debug!("dropping update for unknown job {}", update.job_id),
        }
    }
}

impl JobsState {
    /// Drops jobs that finished at least `retention` before `now`. Returns how many went.
    pub async fn prune_finished(&self, now: Instant, retention: Duration) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, record| {
            !matches!(record.finished_at, Some(finished) if now.saturating_duration_since(finished) >= retention)
        });
        before - jobs.len()
    }
}

/// Periodically forgets finished jobs. Spawned once at startup.
pub async fn start_job_pruner(state: JobsState, retention: Duration) {
    let mut ticker = tokio::time::interval(retention.max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        let pruned = state.prune_finished(Instant::now(), retention).await;
        if pruned > 0 {
            debug!("pruned {} finished jobs", pruned);
        }
    }
}

/// Drains worker updates into the shared map. Spawned once at startup.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        state.apply(update).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(job_id: &str, status: JobStatus) -> JobUpdate {
        JobUpdate {
            job_id: job_id.to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn updates_stop_at_terminal_status() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);
        state.register("j1", "export_csv").await;

        state.apply(update("j1", JobStatus::InProgress(40))).await;
        assert_eq!(state.status("j1").await, Some(JobStatus::InProgress(40)));

        state.apply(update("j1", JobStatus::Completed("/api/files/a.csv".into()))).await;
        state.apply(update("j1", JobStatus::InProgress(100))).await;
        assert_eq!(
            state.status("j1").await,
            Some(JobStatus::Completed("/api/files/a.csv".into()))
        );
    }

    #[tokio::test]
    async fn unknown_jobs_are_not_created_by_updates() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);
        state.apply(update("ghost", JobStatus::InProgress(10))).await;
        assert_eq!(state.status("ghost").await, None);
    }

    #[tokio::test]
    async fn cancel_sticks_and_leaves_finished_jobs_alone() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);
        state.register("running", "export_csv").await;
        state.register("done", "export_csv").await;
        state.apply(update("done", JobStatus::Failed("disk full".into()))).await;

        assert_eq!(state.cancel("running").await, CancelOutcome::Cancelled);
        state.apply(update("running", JobStatus::Completed("/api/files/x.csv".into()))).await;
        assert_eq!(state.status("running").await, Some(JobStatus::Cancelled));

        assert_eq!(
            state.cancel("done").await,
            CancelOutcome::AlreadyFinished(JobStatus::Failed("disk full".into()))
        );
        assert_eq!(state.cancel("missing").await, CancelOutcome::NotFound);
    }

    #[tokio::test]
    async fn summaries_list_oldest_first() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);
        state.register("b", "export_csv").await;
        state.register("a", "export_csv").await;
        state.apply(update("b", JobStatus::Completed("/api/files/b.csv".into()))).await;

        let listed = state.summaries().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "b");
        assert_eq!(listed[0].status, "completed");
        assert_eq!(listed[0].result.as_deref(), Some("/api/files/b.csv"));
        assert_eq!(listed[1].id, "a");
        assert_eq!(listed[1].status, "pending");
    }

    #[tokio::test]
    async fn prune_forgets_only_jobs_finished_past_retention() {
        let (tx, _rx) = mpsc::channel(8);
        let state = JobsState::new(tx);
        state.register("done", "export_csv").await;
        state.register("cancelled", "export_csv").await;
        state.register("running", "export_csv").await;
        state.apply(update("done", JobStatus::Completed("/api/files/d.csv".into()))).await;
        state.apply(update("running", JobStatus::InProgress(10))).await;
        state.cancel("cancelled").await;

        let retention = Duration::from_secs(3600);
        assert_eq!(state.prune_finished(Instant::now(), retention).await, 0);

        let later = Instant::now() + Duration::from_secs(7200);
        assert_eq!(state.prune_finished(later, retention).await, 2);
        assert_eq!(state.status("done").await, None);
        assert_eq!(state.status("cancelled").await, None);
        assert_eq!(state.status("running").await, Some(JobStatus::InProgress(10)));
    }

    #[tokio::test]
    async fn updater_drains_channel() {
        let (tx, rx) = mpsc::channel(8);
        let state = JobsState::new(tx.clone());
        state.register("j", "export_csv").await;
        tokio::spawn(start_job_updater(state.clone(), rx));

        tx.send(update("j", JobStatus::InProgress(50))).await.unwrap();
        for _ in 0..100 {
            if state.status("j").await == Some(JobStatus::InProgress(50)) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(state.status("j").await, Some(JobStatus::InProgress(50)));
    }
}
