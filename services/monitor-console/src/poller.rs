//! Fixed-interval status polling

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::notice::{Notice, NoticeSink};
use crate::session::SessionHandle;

/// The status endpoint has no documented payload yet, so success is only acknowledged
pub const STATUS_PLACEHOLDER: &str = "Status updated";

const FAILURE_WARN_THRESHOLD: u32 = 5;

/// Outcome counters of the poller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub polls: u64,
    pub consecutive_failures: u32,
    pub last_poll_epoch_ms: u64,
    pub last_message: Option<String>,
}

/// Thread-safe poll status handle
pub type PollStatusHandle = Arc<RwLock<PollStatus>>;

/// Issues a status request on a fixed interval
#[derive(Debug, Clone)]
pub struct StatusPoller {
    api: Arc<ApiClient>,
    session: SessionHandle,
    notices: Arc<dyn NoticeSink>,
    interval: Duration,
    status: PollStatusHandle,
}

impl StatusPoller {
    pub fn new(
        api: Arc<ApiClient>,
        session: SessionHandle,
        notices: Arc<dyn NoticeSink>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            session,
            notices,
            interval,
            status: PollStatusHandle::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> PollStatusHandle {
        Arc::clone(&self.status)
    }

    /// Spawn the polling task. The first request goes out one interval from now.
    pub fn start(&self, cancel: CancellationToken) -> PollHandle {
        let poller = self.clone();
        let task_cancel = cancel.clone();
        tracing::debug!("Starting status poller every {:?}", self.interval);
        let task = tokio::spawn(async move { poller.run(task_cancel).await });
        PollHandle { cancel, task }
    }

    async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() completes its first tick immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel.cancelled() => break,
            }
            tokio::select! {
                _ = self.poll_once() => {}
                _ = cancel.cancelled() => break,
            }
        }
        tracing::debug!("Status poller stopped");
    }

    /// Issue one status request with the credential current at send time
    pub async fn poll_once(&self) -> bool {
        let credential = self.session.get().await;
        let outcome = match self.api.status(&credential).await {
            Ok(result) if result.is_success() => {
                tracing::debug!("Status payload: {:?}", result.payload);
                Ok(STATUS_PLACEHOLDER.to_string())
            }
            Ok(result) => Err(result.message()),
            Err(e) => Err(e.to_string()),
        };

        let mut status = self.status.write().await;
        status.polls += 1;
        status.last_poll_epoch_ms = current_epoch_ms();

        match outcome {
            Ok(message) => {
                status.consecutive_failures = 0;
                status.last_message = Some(message.clone());
                drop(status);
                self.notices.show(Notice::info(message));
                true
            }
            Err(message) => {
                status.consecutive_failures += 1;
                status.last_message = Some(message.clone());
                if status.consecutive_failures == FAILURE_WARN_THRESHOLD {
                    tracing::warn!(
                        "Status poll has failed {} times in a row",
                        status.consecutive_failures
                    );
                }
                drop(status);
                self.notices.show(Notice::error(message));
                false
            }
        }
    }
}

/// Owns the running polling task
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Cancel the polling task; in-flight requests are abandoned
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop and wait for the task to finish
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Status poller task ended abnormally: {}", e);
        }
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
