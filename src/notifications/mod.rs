pub mod center;
pub mod poller;
pub mod scheduler;

pub use center::{Notification, NotificationCenter};
pub use poller::{Clock, NotificationPoller, ScheduledTask, SharedEvents, SystemClock};
pub use scheduler::{due_notifications, format_message, is_due, reminder_occurrences};
