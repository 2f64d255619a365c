use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::{Event, EventId};
use crate::notifications::scheduler::{due_notifications, format_message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EventId,
    pub message: String,
}

/// Reminders raised during one session.
///
/// Every event is notified at most once; visible notifications stay until
/// they are dismissed.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    notified: HashSet<EventId>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_notified(&self, event_id: &EventId) -> bool {
        self.notified.contains(event_id)
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    /// Raises a notification for every event that became due at `now` and
    /// returns how many were added.
    pub fn check(&mut self, events: &[Event], now: NaiveDateTime) -> usize {
        let due = due_notifications(events, now, &self.notified);
        let added = due.len();

        for event in due {
            let notification = Notification {
                id: event.id.clone(),
                message: format_message(event),
            };
            info!("Reminder for event {}: {}", notification.id, notification.message);
            self.notified.insert(event.id.clone());
            self.notifications.push(notification);
        }

        added
    }

    /// Dismisses the notification at `index`; out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.notifications.len() {
            self.notifications.remove(index);
        }
    }
}
