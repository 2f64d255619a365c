use chrono::{Days, Months, NaiveDate};
use tracing::{debug, warn};

use crate::calendar::date_utils::{format_date, is_last_day_of_month, last_day_of_month, parse_date};
use crate::calendar::{Event, RepeatInfo, RepeatType};

/// Expands `rule` into the dates of every occurrence, anchored at `anchor`.
///
/// The first element is always the anchor. Without an end date, with
/// `RepeatType::None` or with a non-positive interval nothing past the anchor
/// is produced. Occurrence `n` is computed from the anchor rather than from
/// occurrence `n - 1`, so a day clamped into a short month does not drift.
/// This differs from stepping the previous date: a monthly rule from Jan 30
/// gives Feb 29 then Mar 30, not Mar 29.
/// An anchor on the last day of its month stays on the last day of every
/// target month.
pub fn expand(rule: &RepeatInfo, anchor: NaiveDate) -> Vec<String> {
    expand_dates(rule, anchor)
        .into_iter()
        .map(|date| format_date(date, None))
        .collect()
}

pub fn expand_dates(rule: &RepeatInfo, anchor: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = vec![anchor];

    if rule.repeat_type == RepeatType::None {
        return dates;
    }

    let Some(end_date) = rule.end_date.as_deref().filter(|value| !value.trim().is_empty()) else {
        return dates;
    };

    let Some(deadline) = parse_date(end_date) else {
        warn!("Ignoring repeat rule with malformed end date '{}'", end_date);
        return dates;
    };

    if rule.interval <= 0 {
        return dates;
    }
    let interval = rule.interval as u32;
    let sticks_to_month_end = is_last_day_of_month(anchor);

    for step in 1u32.. {
        let Some(offset) = step.checked_mul(interval) else { break };
        let Some(next) = occurrence(rule.repeat_type, anchor, offset, sticks_to_month_end) else {
            break;
        };

        if next > deadline {
            break;
        }
        dates.push(next);
    }

    debug!(
        "Expanded {:?} rule from {} to {} occurrence(s)",
        rule.repeat_type,
        anchor,
        dates.len()
    );

    dates
}

/// One copy of `event` per occurrence, each carrying the occurrence's date.
pub fn occurrence_events(event: &Event) -> Vec<Event> {
    event
        .occurrence_dates()
        .into_iter()
        .map(|date| Event { date, ..event.clone() })
        .collect()
}

fn occurrence(
    repeat_type: RepeatType,
    anchor: NaiveDate,
    offset: u32,
    sticks_to_month_end: bool,
) -> Option<NaiveDate> {
    match repeat_type {
        RepeatType::None => None,
        RepeatType::Daily => anchor.checked_add_days(Days::new(offset as u64)),
        RepeatType::Weekly => anchor.checked_add_days(Days::new(offset as u64 * 7)),
        RepeatType::Monthly => add_months(anchor, offset, sticks_to_month_end),
        RepeatType::Yearly => add_months(anchor, offset.checked_mul(12)?, sticks_to_month_end),
    }
}

fn add_months(anchor: NaiveDate, months: u32, sticks_to_month_end: bool) -> Option<NaiveDate> {
    // chrono clamps the day to the end of a shorter target month.
    let shifted = anchor.checked_add_months(Months::new(months))?;

    if sticks_to_month_end {
        Some(last_day_of_month(shifted))
    } else {
        Some(shifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EventForm, EventId};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn rule(repeat_type: RepeatType, interval: i32, end_date: &str) -> RepeatInfo {
        RepeatInfo::new(repeat_type, interval, Some(end_date))
    }

    #[test]
    fn none_type_returns_only_anchor() {
        let dates = expand(&rule(RepeatType::None, 1, "2024-12-31"), date(2024, 7, 1));

        assert_eq!(dates, vec!["2024-07-01"]);
    }

    #[test]
    fn missing_end_date_returns_only_anchor() {
        let repeat = RepeatInfo::new(RepeatType::Daily, 1, None);

        assert_eq!(expand(&repeat, date(2024, 7, 1)), vec!["2024-07-01"]);
    }

    #[test]
    fn empty_end_date_returns_only_anchor() {
        assert_eq!(
            expand(&rule(RepeatType::Daily, 1, ""), date(2024, 7, 1)),
            vec!["2024-07-01"]
        );
    }

    #[test]
    fn malformed_end_date_returns_only_anchor() {
        assert_eq!(
            expand(&rule(RepeatType::Daily, 1, "2024/12/31"), date(2024, 7, 1)),
            vec!["2024-07-01"]
        );
    }

    #[test]
    fn zero_interval_returns_only_anchor() {
        assert_eq!(
            expand(&rule(RepeatType::Daily, 0, "2024-07-01"), date(2024, 7, 1)),
            vec!["2024-07-01"]
        );
    }

    #[test]
    fn negative_interval_returns_only_anchor() {
        assert_eq!(
            expand(&rule(RepeatType::Weekly, -2, "2024-12-31"), date(2024, 7, 1)),
            vec!["2024-07-01"]
        );
    }

    #[test]
    fn daily_repeats_until_end_date_inclusive() {
        let dates = expand(&rule(RepeatType::Daily, 2, "2024-07-07"), date(2024, 7, 1));

        assert_eq!(dates, vec!["2024-07-01", "2024-07-03", "2024-07-05", "2024-07-07"]);
    }

    #[test]
    fn weekly_steps_by_seven_days() {
        let dates = expand(&rule(RepeatType::Weekly, 1, "2024-07-25"), date(2024, 7, 1));

        assert_eq!(dates, vec!["2024-07-01", "2024-07-08", "2024-07-15", "2024-07-22"]);
    }

    #[test]
    fn biweekly_crosses_month_boundary() {
        let dates = expand(&rule(RepeatType::Weekly, 2, "2024-08-31"), date(2024, 7, 20));

        assert_eq!(dates, vec!["2024-07-20", "2024-08-03", "2024-08-17", "2024-08-31"]);
    }

    #[test]
    fn monthly_month_end_anchor_sticks_to_month_end() {
        let dates = expand(&rule(RepeatType::Monthly, 1, "2024-05-31"), date(2024, 1, 31));

        assert_eq!(
            dates,
            vec!["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30", "2024-05-31"]
        );
    }

    #[test]
    fn monthly_month_end_anchor_in_common_year() {
        let dates = expand(&rule(RepeatType::Monthly, 1, "2023-03-31"), date(2023, 1, 31));

        assert_eq!(dates, vec!["2023-01-31", "2023-02-28", "2023-03-31"]);
    }

    #[test]
    fn monthly_thirtieth_of_april_is_month_end() {
        let dates = expand(&rule(RepeatType::Monthly, 1, "2024-07-31"), date(2024, 4, 30));

        assert_eq!(dates, vec!["2024-04-30", "2024-05-31", "2024-06-30", "2024-07-31"]);
    }

    #[test]
    fn monthly_mid_month_keeps_day_of_month() {
        let dates = expand(&rule(RepeatType::Monthly, 1, "2024-04-15"), date(2024, 1, 15));

        assert_eq!(dates, vec!["2024-01-15", "2024-02-15", "2024-03-15", "2024-04-15"]);
    }

    #[test]
    fn monthly_clamped_day_does_not_drift() {
        let dates = expand(&rule(RepeatType::Monthly, 1, "2024-03-31"), date(2024, 1, 30));

        assert_eq!(dates, vec!["2024-01-30", "2024-02-29", "2024-03-30"]);
    }

    #[test]
    fn monthly_with_interval_crosses_year() {
        let dates = expand(&rule(RepeatType::Monthly, 3, "2025-04-30"), date(2024, 10, 31));

        assert_eq!(dates, vec!["2024-10-31", "2025-01-31", "2025-04-30"]);
    }

    #[test]
    fn yearly_leap_day_lands_on_february_end() {
        let dates = expand(&rule(RepeatType::Yearly, 1, "2028-12-31"), date(2024, 2, 29));

        assert_eq!(
            dates,
            vec!["2024-02-29", "2025-02-28", "2026-02-28", "2027-02-28", "2028-02-29"]
        );
    }

    #[test]
    fn yearly_keeps_month_and_day() {
        let dates = expand(&rule(RepeatType::Yearly, 2, "2030-01-01"), date(2024, 6, 15));

        assert_eq!(dates, vec!["2024-06-15", "2026-06-15", "2028-06-15"]);
    }

    #[test]
    fn end_date_before_anchor_keeps_anchor_only() {
        let dates = expand(&rule(RepeatType::Daily, 1, "2024-06-01"), date(2024, 7, 1));

        assert_eq!(dates, vec!["2024-07-01"]);
    }

    #[test]
    fn occurrence_events_carry_occurrence_dates() {
        let mut form = EventForm::new("Standup", "2024-07-01", "09:00", "09:15");
        form.repeat = rule(RepeatType::Daily, 1, "2024-07-03");
        let event = form.into_event(EventId::from("1"));

        let occurrences = occurrence_events(&event);

        let dates: Vec<&str> = occurrences.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-07-01", "2024-07-02", "2024-07-03"]);
        assert!(occurrences.iter().all(|e| e.title == "Standup" && e.start_time == "09:00"));
    }

    proptest! {
        #[test]
        fn expansion_is_sorted_unique_and_bounded(
            offset_days in 0i64..3000,
            interval in 1i32..5,
            span_days in 0i64..800,
            kind in 0usize..4,
        ) {
            let repeat_type = [
                RepeatType::Daily,
                RepeatType::Weekly,
                RepeatType::Monthly,
                RepeatType::Yearly,
            ][kind];
            let anchor = date(2020, 1, 1) + chrono::Duration::days(offset_days);
            let end = anchor + chrono::Duration::days(span_days);
            let repeat = RepeatInfo::new(repeat_type, interval, Some(&format_date(end, None)));

            let dates = expand_dates(&repeat, anchor);

            prop_assert_eq!(dates[0], anchor);
            prop_assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert!(dates.iter().all(|d| *d <= end));
        }

        #[test]
        fn month_end_anchor_always_lands_on_month_end(
            year in 2000i32..2100,
            month in 1u32..=12,
            interval in 1i32..4,
        ) {
            let anchor = last_day_of_month(date(year, month, 1));
            let repeat = RepeatInfo::new(RepeatType::Monthly, interval, Some("2110-12-31"));

            let dates = expand_dates(&repeat, anchor);

            prop_assert!(dates.iter().all(|d| is_last_day_of_month(*d)));
        }
    }
}
