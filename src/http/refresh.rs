use crate::error::RefreshFailure;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::debug;

pub type RefreshOutcome = std::result::Result<(), RefreshFailure>;

#[derive(Default)]
struct RefreshState {
    in_progress: bool,
    generation: u64,
    /// Outcome of the refresh that closed the current generation.
    last: Option<RefreshOutcome>,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

enum Turn {
    Lead,
    Wait(oneshot::Receiver<RefreshOutcome>),
    AlreadySettled(RefreshOutcome),
}

/// Serializes token refreshes for one client.
///
/// The first caller runs the refresh; callers arriving while it is in
/// flight queue behind it and receive the same outcome, in arrival order.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of callers queued behind the in-flight refresh.
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Bumped after every refresh that ran to completion, successful or not.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Run `refresh`, or join the one already in flight.
    ///
    /// `observed` is the generation the caller's request was sent under.
    /// If a refresh has completed since then, the caller gets that refresh's
    /// outcome without running another one.
    pub async fn run<F, Fut>(&self, observed: u64, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let turn = {
            let mut state = self.lock();
            if state.in_progress {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                debug!(queued = state.waiters.len(), "joining in-flight refresh");
                Turn::Wait(rx)
            } else if state.generation != observed {
                Turn::AlreadySettled(state.last.clone().unwrap_or(Ok(())))
            } else {
                state.in_progress = true;
                Turn::Lead
            }
        };

        match turn {
            Turn::AlreadySettled(outcome) => outcome,
            Turn::Wait(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RefreshFailure::new("Token refresh was abandoned"))),
            Turn::Lead => {
                let mut guard = SettleGuard {
                    coordinator: self,
                    settled: false,
                };
                let outcome = refresh().await;
                guard.settle(&outcome);
                outcome
            }
        }
    }

    /// Close the in-flight refresh and hand `outcome` to every waiter.
    ///
    /// An abandoned refresh does not close the generation, so the next
    /// caller to see a 401 leads a fresh attempt.
    fn settle(&self, outcome: &RefreshOutcome, completed: bool) {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            if completed {
                state.generation = state.generation.wrapping_add(1);
                state.last = Some(outcome.clone());
            }
            std::mem::take(&mut state.waiters)
        };

        debug!(
            queued = waiters.len(),
            success = outcome.is_ok(),
            "refresh settled"
        );
        for waiter in waiters {
            // A dropped receiver means that caller stopped waiting
            let _ = waiter.send(outcome.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases the queue if the leading caller is dropped mid-refresh.
struct SettleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl SettleGuard<'_> {
    fn settle(&mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.coordinator.settle(outcome, true);
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator
                .settle(&Err(RefreshFailure::new("Token refresh was abandoned")), false);
        }
    }
}
