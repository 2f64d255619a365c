use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::calendar::Event;
use crate::notifications::{Notification, NotificationCenter};

pub type SharedEvents = Arc<RwLock<Vec<Event>>>;

/// Source of the current local wall-clock time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Handle to a running poller.
pub struct ScheduledTask {
    task_handle: JoinHandle<NotificationCenter>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    pub fn new(
        task_handle: JoinHandle<NotificationCenter>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            task_handle,
            cancellation_token,
        }
    }

    /// Stops the poller and returns its final session state, or `None` if it
    /// did not finish within `timeout`.
    pub async fn cancel(self, timeout: Duration) -> Option<NotificationCenter> {
        self.cancellation_token.cancel();
        match time::timeout(timeout, self.task_handle).await {
            Ok(Ok(center)) => Some(center),
            Ok(Err(error)) => {
                warn!("Notification poller ended abnormally: {}", error);
                None
            }
            Err(_) => None,
        }
    }
}

/// Checks the shared event snapshot on a fixed cadence and forwards every
/// newly raised notification to `sink`.
pub struct NotificationPoller<C> {
    events: SharedEvents,
    clock: C,
    interval: Duration,
    center: NotificationCenter,
}

impl<C> NotificationPoller<C>
where
    C: Clock + Send + 'static,
{
    pub fn new(events: SharedEvents, clock: C, interval: Duration) -> Self {
        Self {
            events,
            clock,
            interval,
            center: NotificationCenter::new(),
        }
    }

    pub fn spawn(self, sink: mpsc::Sender<Notification>) -> ScheduledTask {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task_handle = tokio::spawn(self.run(sink, task_cancellation_token));

        ScheduledTask::new(task_handle, cancellation_token)
    }

    async fn run(
        mut self,
        sink: mpsc::Sender<Notification>,
        cancellation_token: CancellationToken,
    ) -> NotificationCenter {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    debug!("Notification poller cancelled");
                    break;
                },
                _ = ticker.tick() => {
                    if !self.poll_once(&sink).await {
                        debug!("Notification sink closed, stopping poller");
                        break;
                    }
                }
            }
        }

        self.center
    }

    /// One check against the current snapshot. Returns `false` once the
    /// receiving side has gone away.
    async fn poll_once(&mut self, sink: &mpsc::Sender<Notification>) -> bool {
        let now = self.clock.now();
        let already_raised = self.center.notifications().len();

        let added = {
            let events = self.events.read().await;
            self.center.check(&events, now)
        };
        if added == 0 {
            return true;
        }

        let fresh: Vec<Notification> = self.center.notifications()[already_raised..].to_vec();
        for notification in fresh {
            if sink.send(notification).await.is_err() {
                return false;
            }
        }

        true
    }
}
