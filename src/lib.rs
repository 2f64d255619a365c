pub mod app;
pub mod calendar;
pub mod notifications;
pub mod storage;

pub use app::{AppState, CalendarView, Navigation, ViewType};
pub use calendar::{Event, EventForm, EventId, RepeatInfo, RepeatType};
pub use notifications::{Notification, NotificationCenter};
