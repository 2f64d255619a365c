use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::calendar::date_utils::parse_date_time;
use crate::calendar::{Event, EventForm, EventId};

/// A point in local time built from a `date` and a time-of-day string.
///
/// `Invalid` stands for a string that did not parse. It is unordered with
/// respect to everything, itself included, so every `<`, `<=`, `>` or `==`
/// involving it is false.
#[derive(Debug, Clone, Copy)]
pub enum EventInstant {
    Valid(NaiveDateTime),
    Invalid,
}

impl EventInstant {
    pub fn parse(date: &str, time: &str) -> Self {
        parse_date_time(date, time).map_or(Self::Invalid, Self::Valid)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Valid(at) => Some(*at),
            Self::Invalid => None,
        }
    }
}

impl PartialEq for EventInstant {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (Self::Valid(a), Self::Valid(b)) if a == b)
    }
}

impl PartialOrd for EventInstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Valid(a), Self::Valid(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: EventInstant,
    pub end: EventInstant,
}

impl TimeRange {
    /// Half-open intersection: ranges that only touch do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Anything with a date and a start/end time that can be checked for overlap.
pub trait Schedulable {
    fn event_id(&self) -> Option<&EventId>;
    fn date(&self) -> &str;
    fn start_time(&self) -> &str;
    fn end_time(&self) -> &str;
}

impl Schedulable for Event {
    fn event_id(&self) -> Option<&EventId> {
        Some(&self.id)
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }

    fn end_time(&self) -> &str {
        &self.end_time
    }
}

impl Schedulable for EventForm {
    fn event_id(&self) -> Option<&EventId> {
        None
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn start_time(&self) -> &str {
        &self.start_time
    }

    fn end_time(&self) -> &str {
        &self.end_time
    }
}

pub fn to_range(item: &impl Schedulable) -> TimeRange {
    TimeRange {
        start: EventInstant::parse(item.date(), item.start_time()),
        end: EventInstant::parse(item.date(), item.end_time()),
    }
}

pub fn overlaps(a: &impl Schedulable, b: &impl Schedulable) -> bool {
    to_range(a).overlaps(&to_range(b))
}

/// Members of `pool` overlapping `candidate`, in pool order. A pool member with
/// the candidate's own identifier is never reported.
pub fn find_overlaps<'a>(candidate: &impl Schedulable, pool: &'a [Event]) -> Vec<&'a Event> {
    let candidate_range = to_range(candidate);
    let candidate_id = candidate.event_id();

    pool.iter()
        .filter(|event| candidate_id != Some(&event.id))
        .filter(|event| to_range(*event).overlaps(&candidate_range))
        .collect()
}
