//! Daily Boundary Trigger
//!
//! Clears every quest's completion flag at local midnight, then re-arms for
//! the following midnight until cancelled.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::quest::{QuestAction, ResetTrigger};
use crate::storage::RecordStorage;
use crate::store::QuestStore;

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Time from `now` until 00:00:00 of the next calendar day in `now`'s zone.
///
/// When that midnight falls in a DST gap the first valid instant after it
/// is used instead.
pub fn duration_until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return ONE_DAY;
    };
    let midnight = tomorrow.and_time(NaiveTime::MIN);
    let tz = now.timezone();

    // Gaps are at most a few hours; probe forward in quarter hours
    let Some(next) = (0..=16).find_map(|step| {
        tz.from_local_datetime(&(midnight + TimeDelta::minutes(15 * step)))
            .earliest()
    }) else {
        return ONE_DAY;
    };

    (next - now.clone()).to_std().unwrap_or(Duration::ZERO)
}

/// Delay until the next midnight on the local wall clock
pub fn until_local_midnight() -> Duration {
    duration_until_next_midnight(&Local::now())
}

/// Handle to a running daily reset task
pub struct DailyResetHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DailyResetHandle {
    /// Stop the timer before its next firing. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Cancel and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!("Daily reset task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DailyResetHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct DailyReset;

impl DailyReset {
    /// Arm the trigger for local midnight
    pub fn spawn<S>(store: Arc<QuestStore<S>>) -> DailyResetHandle
    where
        S: RecordStorage + 'static,
    {
        Self::spawn_with_schedule(store, until_local_midnight)
    }

    /// Arm the trigger with a custom schedule. `next_delay` is called before
    /// every wait, so each firing re-reads the clock.
    pub fn spawn_with_schedule<S, F>(store: Arc<QuestStore<S>>, next_delay: F) -> DailyResetHandle
    where
        S: RecordStorage + 'static,
        F: Fn() -> Duration + Send + 'static,
    {
        let (cancel, mut cancelled) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                let delay = next_delay();
                info!("Next daily reset in {}s", delay.as_secs());

                tokio::select! {
                    biased;
                    _ = &mut cancelled => {
                        info!("Daily reset cancelled");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {
                        let state = store
                            .dispatch(QuestAction::ResetQuests {
                                trigger: ResetTrigger::DailyBoundary,
                            })
                            .await;
                        info!(
                            "Daily reset cleared {} quest(s) across {} chain(s)",
                            state.quest_count(),
                            state.chains.len()
                        );
                    }
                }
            }
        });

        DailyResetHandle {
            cancel: Some(cancel),
            task,
        }
    }
}
