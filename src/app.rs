use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::holidays::holidays_for_month;
use crate::calendar::{filter_events, find_overlaps, Event, EventId, Schedulable};
use crate::notifications::NotificationCenter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Week,
    #[default]
    Month,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown view '{0}', expected 'week' or 'month'")]
pub struct ParseViewError(String);

impl FromStr for ViewType {
    type Err = ParseViewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "week" => Ok(ViewType::Week),
            "month" => Ok(ViewType::Month),
            other => Err(ParseViewError(other.to_string())),
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewType::Week => f.write_str("week"),
            ViewType::Month => f.write_str("month"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Navigation {
    Prev,
    Next,
}

/// Which slice of the calendar is visible, plus the holidays of its month.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub view: ViewType,
    pub current_date: NaiveDate,
    pub holidays: BTreeMap<String, String>,
}

impl CalendarView {
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            view: ViewType::default(),
            current_date,
            holidays: holidays_for_month(current_date),
        }
    }

    pub fn with_view(mut self, view: ViewType) -> Self {
        self.view = view;
        self
    }

    pub fn set_view(&mut self, view: ViewType) {
        self.view = view;
    }

    pub fn set_current_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.holidays = holidays_for_month(date);
    }

    /// Week view moves by seven days. Month view moves to the first day of the
    /// previous or next month.
    pub fn navigate(&mut self, direction: Navigation) {
        let target = match (self.view, direction) {
            (ViewType::Week, Navigation::Prev) => self.current_date.checked_sub_days(Days::new(7)),
            (ViewType::Week, Navigation::Next) => self.current_date.checked_add_days(Days::new(7)),
            (ViewType::Month, Navigation::Prev) => self
                .first_of_month()
                .and_then(|first| first.checked_sub_months(Months::new(1))),
            (ViewType::Month, Navigation::Next) => self
                .first_of_month()
                .and_then(|first| first.checked_add_months(Months::new(1))),
        };

        if let Some(date) = target {
            self.set_current_date(date);
        }
    }

    fn first_of_month(&self) -> Option<NaiveDate> {
        self.current_date.with_day(1)
    }
}

/// State owned by the presentation layer: the current event snapshot, what is
/// on screen, and the reminders raised this session.
pub struct AppState {
    pub events: Vec<Event>,
    pub calendar: CalendarView,
    pub search_term: String,
    pub notifications: NotificationCenter,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            events: Vec::new(),
            calendar: CalendarView::new(today),
            search_term: String::new(),
            notifications: NotificationCenter::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn add_event(&mut self, event: Event) {
        match self.events.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    pub fn remove_event(&mut self, event_id: &EventId) {
        self.events.retain(|event| &event.id != event_id);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn filtered_events(&self) -> Vec<&Event> {
        filter_events(
            &self.events,
            &self.search_term,
            self.calendar.current_date,
            self.calendar.view,
        )
    }

    pub fn overlapping_events(&self, candidate: &impl Schedulable) -> Vec<&Event> {
        find_overlaps(candidate, &self.events)
    }

    pub fn check_notifications(&mut self, now: NaiveDateTime) -> usize {
        self.notifications.check(&self.events, now)
    }
}
