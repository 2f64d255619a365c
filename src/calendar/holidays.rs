use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::date_utils::{format_date, is_date_in_range, parse_date};

const HOLIDAYS: &[(&str, &str)] = &[
    ("2024-01-01", "신정"),
    ("2024-02-09", "설날"),
    ("2024-02-10", "설날"),
    ("2024-02-11", "설날"),
    ("2024-03-01", "삼일절"),
    ("2024-05-05", "어린이날"),
    ("2024-06-06", "현충일"),
    ("2024-08-15", "광복절"),
    ("2024-09-16", "추석"),
    ("2024-09-17", "추석"),
    ("2024-09-18", "추석"),
    ("2024-10-03", "개천절"),
    ("2024-10-09", "한글날"),
    ("2024-12-25", "크리스마스"),
    ("2025-01-01", "신정"),
    ("2025-01-28", "설날"),
    ("2025-01-29", "설날"),
    ("2025-01-30", "설날"),
    ("2025-03-01", "삼일절"),
    ("2025-05-05", "어린이날"),
    ("2025-06-06", "현충일"),
    ("2025-08-15", "광복절"),
    ("2025-10-03", "개천절"),
    ("2025-10-05", "추석"),
    ("2025-10-06", "추석"),
    ("2025-10-07", "추석"),
    ("2025-10-09", "한글날"),
    ("2025-12-25", "크리스마스"),
];

/// Public holidays in the month of `date`, keyed by `YYYY-MM-DD`.
pub fn holidays_for_month(date: NaiveDate) -> BTreeMap<String, String> {
    let formatted = format_date(date, None);
    let month_prefix = &formatted[..8];

    HOLIDAYS
        .iter()
        .filter(|(day, _)| day.starts_with(month_prefix))
        .map(|(day, name)| (day.to_string(), name.to_string()))
        .collect()
}

/// Public holidays from `start` to `end` inclusive, keyed by `YYYY-MM-DD`.
pub fn holidays_between(start: NaiveDate, end: NaiveDate) -> BTreeMap<String, String> {
    HOLIDAYS
        .iter()
        .filter(|(day, _)| parse_date(day).is_some_and(|date| is_date_in_range(date, start, end)))
        .map(|(day, name)| (day.to_string(), name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn returns_only_holidays_of_given_month() {
        let holidays = holidays_for_month(date(2024, 5, 1));

        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays.get("2024-05-05").map(String::as_str), Some("어린이날"));
    }

    #[test]
    fn month_without_holidays_is_empty() {
        assert!(holidays_for_month(date(2024, 4, 1)).is_empty());
    }

    #[test]
    fn returns_every_holiday_of_month_in_order() {
        let holidays = holidays_for_month(date(2024, 9, 1));

        let days: Vec<&str> = holidays.keys().map(String::as_str).collect();
        assert_eq!(days, vec!["2024-09-16", "2024-09-17", "2024-09-18"]);
        assert!(holidays.values().all(|name| name == "추석"));
    }

    #[test]
    fn same_month_of_other_year_is_not_mixed_in() {
        let holidays = holidays_for_month(date(2024, 10, 20));

        let days: Vec<&str> = holidays.keys().map(String::as_str).collect();
        assert_eq!(days, vec!["2024-10-03", "2024-10-09"]);
    }

    #[test]
    fn range_keeps_only_holidays_inside_it() {
        let holidays = holidays_between(date(2024, 9, 29), date(2024, 10, 5));

        let days: Vec<&str> = holidays.keys().map(String::as_str).collect();
        assert_eq!(days, vec!["2024-10-03"]);
    }

    #[test]
    fn range_spans_year_boundary() {
        let holidays = holidays_between(date(2024, 12, 29), date(2025, 1, 4));

        let days: Vec<&str> = holidays.keys().map(String::as_str).collect();
        assert_eq!(days, vec!["2025-01-01"]);
    }
}
