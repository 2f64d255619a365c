use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::calendar::Event;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// One row of a month grid. Slots outside the month are `None`.
pub type WeekRow = [Option<u32>; 7];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_date(date)?.and_time(parse_time(time)?))
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the 1-based `month` of `year`; `0` for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// The seven dates of the Sunday-starting week that contains `date`.
pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let days_from_sunday = date.weekday().num_days_from_sunday() as u64;
    let sunday = date
        .checked_sub_days(Days::new(days_from_sunday))
        .unwrap_or(date);

    sunday.iter_days().take(7).collect()
}

/// Week rows of the month containing `date`, Sunday first. Day 1 sits in its
/// weekday column and the last row is padded with empty slots.
pub fn month_grid(date: NaiveDate) -> Vec<WeekRow> {
    let year = date.year();
    let month = date.month();
    let total_days = days_in_month(year, month);

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let offset = first_day.weekday().num_days_from_sunday();

    let mut weeks = Vec::new();
    let mut current_week: WeekRow = [None; 7];

    for day in 1..=total_days {
        let column = ((offset + day - 1) % 7) as usize;
        current_week[column] = Some(day);

        if column == 6 || day == total_days {
            weeks.push(current_week);
            current_week = [None; 7];
        }
    }

    weeks
}

/// Renders `YYYY-MM-DD`, optionally substituting the day-of-month.
pub fn format_date(date: NaiveDate, day_override: Option<u32>) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        day_override.unwrap_or_else(|| date.day())
    )
}

/// Inclusive range test on calendar days; any time-of-day component is ignored.
pub fn is_date_in_range<D: Datelike>(date: D, start: D, end: D) -> bool {
    let day_key = |d: &D| (d.year(), d.ordinal());
    let date = day_key(&date);

    day_key(&start) <= date && date <= day_key(&end)
}

/// Week label such as `2024년 7월 1주`.
///
/// A week belongs to the month that contains its Thursday and is counted from
/// that month's first Thursday.
pub fn format_week(date: NaiveDate) -> String {
    let days_from_sunday = date.weekday().num_days_from_sunday() as i64;
    let Some(thursday) = date.checked_add_signed(TimeDelta::days(4 - days_from_sunday)) else {
        return format_month(date);
    };

    let Some(first_of_month) = thursday.with_day(1) else {
        return format_month(thursday);
    };
    let first_weekday = first_of_month.weekday().num_days_from_sunday();
    let first_thursday_day = 1 + (4 + 7 - first_weekday) % 7;
    let first_thursday = first_of_month.with_day(first_thursday_day).unwrap_or(first_of_month);

    let week_number = (thursday - first_thursday).num_days() / 7 + 1;

    format!("{}년 {}월 {}주", thursday.year(), thursday.month(), week_number)
}

/// Month label such as `2024년 7월`.
pub fn format_month(date: NaiveDate) -> String {
    format!("{}년 {}월", date.year(), date.month())
}

/// Events whose date falls on the given day-of-month.
pub fn events_for_day(events: &[Event], day: u32) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.calendar_date().is_some_and(|date| date.day() == day))
        .collect()
}
