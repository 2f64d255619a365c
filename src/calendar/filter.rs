use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::app::ViewType;
use crate::calendar::date_utils::{is_date_in_range, week_dates};
use crate::calendar::Event;

/// Events matching `search_term` that fall inside the `view` window around
/// `reference`, in their original order.
pub fn filter_events<'a>(
    events: &'a [Event],
    search_term: &str,
    reference: NaiveDate,
    view: ViewType,
) -> Vec<&'a Event> {
    let filtered: Vec<&Event> = events
        .iter()
        .filter(|event| matches_search(event, search_term))
        .filter(|event| is_in_view(event, reference, view))
        .collect();

    debug!(
        "Filtered {} of {} events for {:?} view around {}",
        filtered.len(),
        events.len(),
        view,
        reference
    );

    filtered
}

/// Case-insensitive substring match on title, description or location.
pub fn matches_search(event: &Event, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }

    let needle = search_term.to_lowercase();
    [&event.title, &event.description, &event.location]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Whether the event's date lies in the week or month containing `reference`.
/// Events with an unparseable date are never in view.
pub fn is_in_view(event: &Event, reference: NaiveDate, view: ViewType) -> bool {
    let Some(date) = event.calendar_date() else {
        return false;
    };

    match view {
        ViewType::Week => {
            let week = week_dates(reference);
            match (week.first(), week.last()) {
                (Some(start), Some(end)) => is_date_in_range(date, *start, *end),
                _ => false,
            }
        }
        ViewType::Month => date.year() == reference.year() && date.month() == reference.month(),
    }
}
