pub mod date_utils;
pub mod event;
pub mod filter;
pub mod holidays;
pub mod overlap;
pub mod recurrence;

pub use event::{Event, EventForm, EventId, RepeatInfo, RepeatType};
pub use filter::filter_events;
pub use overlap::{find_overlaps, overlaps, to_range, EventInstant, Schedulable, TimeRange};
