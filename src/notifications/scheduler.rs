use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};

use crate::calendar::recurrence::occurrence_events;
use crate::calendar::{Event, EventId};

/// Events whose reminder window contains `now` and which have not been
/// notified yet, in input order.
///
/// The window is `[start - notification_time, start)`. A zero
/// `notification_time` gives an empty window, so such events are never due.
pub fn due_notifications<'a>(
    events: &'a [Event],
    now: NaiveDateTime,
    already_notified: &HashSet<EventId>,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| !already_notified.contains(&event.id))
        .filter(|event| is_due(event, now))
        .collect()
}

pub fn is_due(event: &Event, now: NaiveDateTime) -> bool {
    let Some(start) = event.start_at() else {
        return false;
    };
    let lead = TimeDelta::minutes(i64::from(event.notification_time));
    let Some(threshold) = start.checked_sub_signed(lead) else {
        return false;
    };

    threshold <= now && now < start
}

/// Expands repeating events into one reminder target per occurrence.
///
/// Occurrences of a repeating event are keyed `<id>@<date>` so each of them is
/// notified once per session; single events keep their own identifier.
pub fn reminder_occurrences(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .flat_map(|event| {
            let repeating = event.repeat.is_repeating();
            occurrence_events(event).into_iter().map(move |mut occurrence| {
                if repeating {
                    occurrence.id = EventId::new(format!("{}@{}", occurrence.id, occurrence.date));
                }
                occurrence
            })
        })
        .collect()
}

pub fn format_message(event: &Event) -> String {
    format!("{}분 후 {} 일정이 시작됩니다.", event.notification_time, event.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EventForm, RepeatInfo, RepeatType};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn create_event(id: &str, date: &str, start_time: &str, notification_time: u32) -> Event {
        let mut form = EventForm::new(&format!("이벤트 {}", id), date, start_time, "23:00");
        form.notification_time = notification_time;
        form.into_event(EventId::from(id))
    }

    fn events() -> Vec<Event> {
        vec![
            create_event("1", "2023-05-10", "10:00", 10),
            create_event("2", "2023-05-10", "14:00", 30),
            create_event("3", "2023-05-11", "09:00", 60),
        ]
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|event| event.id.to_string()).collect()
    }

    #[test]
    fn returns_event_whose_reminder_time_arrived() {
        let events = events();

        let due = due_notifications(&events, at("2023-05-10", 9, 50), &HashSet::new());

        assert_eq!(ids(&due), vec!["1"]);
    }

    #[test]
    fn skips_already_notified_events() {
        let events = events();
        let notified: HashSet<EventId> = [EventId::from("1")].into_iter().collect();

        let due = due_notifications(&events, at("2023-05-10", 13, 35), &notified);

        assert_eq!(ids(&due), vec!["2"]);
    }

    #[test]
    fn ignores_events_before_reminder_window() {
        let events = events();

        let due = due_notifications(&events, at("2023-05-10", 9, 0), &HashSet::new());

        assert!(due.is_empty());
    }

    #[test]
    fn ignores_events_that_already_started() {
        let events = events();

        let due = due_notifications(&events, at("2023-05-10", 10, 1), &HashSet::new());

        assert!(due.is_empty());
    }

    #[test]
    fn window_is_closed_at_threshold_and_open_at_start() {
        let event = create_event("1", "2023-05-10", "10:00", 10);

        assert!(is_due(&event, at("2023-05-10", 9, 50)));
        assert!(is_due(&event, at("2023-05-10", 9, 59)));
        assert!(!is_due(&event, at("2023-05-10", 10, 0)));
        assert!(!is_due(&event, at("2023-05-10", 9, 49)));
    }

    #[test]
    fn zero_lead_time_is_never_due() {
        let event = create_event("1", "2023-05-10", "10:00", 0);

        assert!(!is_due(&event, at("2023-05-10", 10, 0)));
        assert!(!is_due(&event, at("2023-05-10", 9, 59)));
    }

    #[test]
    fn reminder_window_crosses_midnight() {
        let event = create_event("1", "2023-05-11", "00:10", 30);

        assert!(is_due(&event, at("2023-05-10", 23, 45)));
    }

    #[test]
    fn malformed_start_is_never_due() {
        let event = create_event("1", "2023-05-10", "10:7x", 10);

        assert!(!is_due(&event, at("2023-05-10", 10, 0)));
    }

    #[test]
    fn formats_reminder_message() {
        let mut event = create_event("1", "2023-05-10", "10:00", 15);
        event.title = "중요 회의".to_string();

        assert_eq!(format_message(&event), "15분 후 중요 회의 일정이 시작됩니다.");
    }

    fn daily_event() -> Event {
        let mut event = create_event("7", "2024-10-01", "10:00", 10);
        event.repeat = RepeatInfo::new(RepeatType::Daily, 1, Some("2024-10-05"));
        event
    }

    #[test]
    fn later_occurrence_of_repeating_event_becomes_due() {
        let stored = vec![daily_event()];
        let now = at("2024-10-03", 9, 55);

        assert!(due_notifications(&stored, now, &HashSet::new()).is_empty());

        let targets = reminder_occurrences(&stored);
        let due = due_notifications(&targets, now, &HashSet::new());

        assert_eq!(ids(&due), vec!["7@2024-10-03"]);
    }

    #[test]
    fn each_occurrence_is_notified_separately() {
        let targets = reminder_occurrences(&[daily_event()]);
        let notified: HashSet<EventId> = [EventId::from("7@2024-10-03")].into_iter().collect();

        let due = due_notifications(&targets, at("2024-10-04", 9, 55), &notified);

        assert_eq!(ids(&due), vec!["7@2024-10-04"]);
        assert_eq!(targets.len(), 5);
    }

    #[test]
    fn single_event_keeps_its_identifier() {
        let targets = reminder_occurrences(&[create_event("1", "2023-05-10", "10:00", 10)]);

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, EventId::from("1"));
    }

    proptest! {
        #[test]
        fn polling_twice_gives_identical_results(minute_of_day in 0u32..(2 * 24 * 60), notified_mask in 0u8..8) {
            let events = events();
            let now = at("2023-05-10", 0, 0) + TimeDelta::minutes(i64::from(minute_of_day));
            let notified: HashSet<EventId> = (0..3)
                .filter(|bit| notified_mask & (1 << bit) != 0)
                .map(|bit| EventId::from((bit + 1).to_string()))
                .collect();

            let first = ids(&due_notifications(&events, now, &notified));
            let second = ids(&due_notifications(&events, now, &notified));

            prop_assert_eq!(first, second);
        }
    }
}
