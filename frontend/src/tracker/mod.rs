//! Async task tracker for server-side CSV exports.
//!
//! One tracker drives at most one export at a time:
//!
//! ```text
//! Idle -> Starting -> Processing -> Completed | Failed
//!   ^________________ clear() ______________________|
//! ```
//!
//! [`ExportTracker::start_export`] returns as soon as the server has accepted
//! the job; a spawned poll loop then follows it to a terminal state. The loop
//! is wrapped in an [`Abortable`] whose handle the tracker owns, so starting a
//! new export or calling [`ExportTracker::clear`] drops the previous loop,
//! including a poll that is still in flight. Every mutation is tagged with the
//! generation it belongs to; anything from an older generation is discarded.

mod policy;
mod state;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures_util::future::{AbortHandle, Abortable};

use common::model::export::ExportStatusResponse;
use common::model::task::TaskStatus;

use crate::config::ClientConfig;
use crate::error::TrackerError;
use crate::gateway::{Gateway, Params};
use crate::platform;
use crate::services::export::{fetch_export_status, submit_csv_export, ExportEndpoints};

pub use policy::{PollPolicy, DEFAULT_POLL_INTERVAL};
pub use state::{FailureKind, TaskFailure, TaskRecord, TrackerState};

type Subscriber = Rc<dyn Fn(&TaskRecord)>;

#[derive(Default)]
struct Shared {
    record: TaskRecord,
    generation: u64,
    poller: Option<AbortHandle>,
    live_pollers: usize,
    subscribers: Vec<Subscriber>,
}

/// Applies `f` to the record if `generation` is still current, then notifies
/// subscribers. Returns `false` when the update was stale and dropped.
fn apply(
    shared: &RefCell<Shared>,
    generation: u64,
    f: impl FnOnce(&mut Shared),
) -> bool {
    let (record, subscribers) = {
        let mut guard = shared.borrow_mut();
        if guard.generation != generation {
            return false;
        }
        f(&mut guard);
        (guard.record.clone(), guard.subscribers.clone())
    };
    for subscriber in subscribers {
        subscriber(&record);
    }
    true
}

/// Counts a poll loop as alive for as long as its future exists.
struct PollerGuard {
    shared: Weak<RefCell<Shared>>,
}

impl PollerGuard {
    fn register(shared: &Rc<RefCell<Shared>>) -> Self {
        shared.borrow_mut().live_pollers += 1;
        Self {
            shared: Rc::downgrade(shared),
        }
    }
}

impl Drop for PollerGuard {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            if let Ok(mut shared) = shared.try_borrow_mut() {
                shared.live_pollers = shared.live_pollers.saturating_sub(1);
            }
        }
    }
}

/// Tracks one export at a time. Clones share the same record and poller.
#[derive(Clone)]
pub struct ExportTracker {
    gateway: Gateway,
    endpoints: ExportEndpoints,
    policy: PollPolicy,
    shared: Rc<RefCell<Shared>>,
}

impl ExportTracker {
    pub fn new(gateway: Gateway, policy: PollPolicy) -> Self {
        Self {
            gateway,
            endpoints: ExportEndpoints::default(),
            policy,
            shared: Rc::new(RefCell::new(Shared::default())),
        }
    }

    /// Tracker polling with the configured [`ClientConfig::poll_policy`].
    pub fn from_config(gateway: Gateway, config: &ClientConfig) -> Self {
        Self::new(gateway, config.poll_policy.clone())
    }

    pub fn with_endpoints(mut self, endpoints: ExportEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn snapshot(&self) -> TaskRecord {
        self.shared.borrow().record.clone()
    }

    pub fn state(&self) -> TrackerState {
        self.shared.borrow().record.state
    }

    pub fn is_loading(&self) -> bool {
        self.shared.borrow().record.is_loading()
    }

    /// Poll loops whose future is still alive. An aborted loop is released
    /// the next time the executor gets to it.
    pub fn active_pollers(&self) -> usize {
        self.shared.borrow().live_pollers
    }

    /// Registers `callback` to run after every change of the record.
    pub fn subscribe(&self, callback: impl Fn(&TaskRecord) + 'static) {
        self.shared.borrow_mut().subscribers.push(Rc::new(callback));
    }

    /// Submits a new export and starts polling it.
    ///
    /// Any export already being tracked is abandoned first. Resolves with the
    /// task id once the server has accepted the job; the outcome of the job
    /// itself shows up in [`ExportTracker::snapshot`].
    pub async fn start_export(&self, data: Params) -> Result<String, TrackerError> {
        let generation = self.reset(TaskRecord::starting());
        log::info!("starting export via {}", self.endpoints.submit);

        let accepted = submit_csv_export(&self.gateway, &self.endpoints, data).await;
        let task_id = match accepted {
            Ok(accepted) => accepted.task_id,
            Err(err) => {
                apply(&self.shared, generation, |shared| {
                    shared.record.fail(FailureKind::from(&err), err.to_string())
                });
                return Err(err.into());
            }
        };

        let (handle, registration) = AbortHandle::new_pair();
        let accepted = apply(&self.shared, generation, |shared| {
            shared.record.accept(task_id.clone());
            shared.poller = Some(handle);
        });
        if !accepted {
            log::debug!("export {} accepted after being superseded", task_id);
            return Err(TrackerError::Superseded);
        }

        let guard = PollerGuard::register(&self.shared);
        let poll = poll_until_settled(
            self.gateway.clone(),
            self.endpoints.clone(),
            self.policy.clone(),
            Rc::downgrade(&self.shared),
            generation,
            task_id.clone(),
        );
        platform::spawn_local(async move {
            let _guard = guard;
            if Abortable::new(poll, registration).await.is_err() {
                log::debug!("export poller cancelled");
            }
        });

        Ok(task_id)
    }

    /// Cancels polling and returns to `Idle`. Safe to call in any state.
    pub fn clear(&self) {
        self.reset(TaskRecord::default());
    }

    /// Aborts the current poller, starts a new generation with `record`.
    fn reset(&self, record: TaskRecord) -> u64 {
        let (generation, snapshot, subscribers) = {
            let mut shared = self.shared.borrow_mut();
            if let Some(handle) = shared.poller.take() {
                handle.abort();
            }
            shared.generation += 1;
            shared.record = record;
            (
                shared.generation,
                shared.record.clone(),
                shared.subscribers.clone(),
            )
        };
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
        generation
    }
}

/// Sequential poll loop: the next sleep starts only after the previous poll settled.
async fn poll_until_settled(
    gateway: Gateway,
    endpoints: ExportEndpoints,
    policy: PollPolicy,
    shared: Weak<RefCell<Shared>>,
    generation: u64,
    task_id: String,
) {
    let mut delay = policy.interval;
    let mut waited = std::time::Duration::ZERO;
    let mut attempts = 0u32;

    loop {
        if !policy.allows(attempts, waited.saturating_add(delay)) {
            log::warn!(
                "export {} not finished after {} polls ({:?}), giving up",
                task_id,
                attempts,
                waited
            );
            if let Some(shared) = shared.upgrade() {
                apply(&shared, generation, |shared| {
                    shared.poller = None;
                    shared.record.fail(
                        FailureKind::Timeout,
                        format!("export did not finish after {} status checks", attempts),
                    );
                });
            }
            return;
        }

        platform::sleep(delay).await;
        waited = waited.saturating_add(delay);
        attempts = attempts.saturating_add(1);

        let outcome = fetch_export_status(&gateway, &endpoints, &task_id).await;
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let mut finished = false;
        let current = match outcome {
            Ok(status) => apply(&shared, generation, |shared| {
                finished = record_status(shared, attempts, status);
            }),
            Err(err) => {
                finished = true;
                apply(&shared, generation, |shared| {
                    shared.poller = None;
                    shared.record.polls = attempts;
                    shared.record.fail(FailureKind::from(&err), err.to_string());
                })
            }
        };
        if finished || !current {
            return;
        }

        delay = policy.next_delay(delay);
    }
}

/// Folds one status response into the record. Returns `true` when terminal.
fn record_status(shared: &mut Shared, attempts: u32, status: ExportStatusResponse) -> bool {
    let record = &mut shared.record;
    record.polls = attempts;
    match status.kind() {
        TaskStatus::Completed => {
            log::info!("export {:?} completed", record.task_id);
            shared.poller = None;
            record.complete(status.download_url);
            true
        }
        kind @ (TaskStatus::Failed | TaskStatus::Cancelled) => {
            shared.poller = None;
            let message = status
                .error
                .unwrap_or_else(|| format!("export {}", kind.as_str()));
            record.status_text = Some(status.status);
            record.fail(FailureKind::Job, message);
            true
        }
        TaskStatus::Pending | TaskStatus::Processing => {
            record.status_text = Some(status.status);
            if status.progress.is_some() {
                record.progress = status.progress;
            }
            false
        }
    }
}
