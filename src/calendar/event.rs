use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::calendar::date_utils::{parse_date, parse_date_time};
use crate::calendar::{overlap, recurrence};

/// Opaque event identifier.
///
/// Stored documents may carry numeric identifiers; they are converted to
/// their decimal string form when read, so the rest of the crate only ever
/// deals with strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => EventId::from(text),
            RawId::Integer(number) => EventId::from(number),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatInfo {
    #[serde(rename = "type", default)]
    pub repeat_type: RepeatType,
    #[serde(default)]
    pub interval: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl RepeatInfo {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(repeat_type: RepeatType, interval: i32, end_date: Option<&str>) -> Self {
        Self {
            repeat_type,
            interval,
            end_date: end_date.map(String::from),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_type != RepeatType::None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatInfo,
    #[serde(default)]
    pub notification_time: u32,
}

impl Event {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn start_at(&self) -> Option<NaiveDateTime> {
        parse_date_time(&self.date, &self.start_time)
    }

    pub fn end_at(&self) -> Option<NaiveDateTime> {
        parse_date_time(&self.date, &self.end_time)
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        Some((self.end_at()? - self.start_at()?).num_minutes())
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        overlap::overlaps(self, other)
    }

    /// Dates of every occurrence of this event, starting with its own date.
    /// An unparseable `date` yields no occurrences at all.
    pub fn occurrence_dates(&self) -> Vec<String> {
        match self.calendar_date() {
            Some(anchor) => recurrence::expand(&self.repeat, anchor),
            None => Vec::new(),
        }
    }
}

/// An event that has not been assigned an identifier yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatInfo,
    #[serde(default)]
    pub notification_time: u32,
}

impl EventForm {
    pub fn new(title: &str, date: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            ..Self::default()
        }
    }

    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
            location: self.location,
            category: self.category,
            repeat: self.repeat,
            notification_time: self.notification_time,
        }
    }
}

impl From<&Event> for EventForm {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            category: event.category.clone(),
            repeat: event.repeat.clone(),
            notification_time: event.notification_time,
        }
    }
}
