use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tokio::sync::{RwLock, mpsc};

use event_planner::{
    app::ViewType,
    calendar::{
        date_utils::{format_month, format_week, parse_date, week_dates},
        filter_events, find_overlaps,
        holidays::{holidays_between, holidays_for_month},
        recurrence::occurrence_events,
        Event,
    },
    notifications::{NotificationPoller, SystemClock, reminder_occurrences},
    storage::{Config, EventStore},
};

pub const USAGE: &str =
    "Usage: event-planner [--agenda [YYYY-MM-DD]] [--week | --month] [--search TERM] [--events PATH] [--watch] [--help]";

#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Help,
    Agenda {
        date: NaiveDate,
        view: Option<ViewType>,
        search: String,
    },
    Watch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub mode: CliMode,
    pub events_file: Option<PathBuf>,
}

pub fn parse_cli_mode<I>(args: I, today: NaiveDate) -> Result<CliOptions, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut agenda_date = None;
    let mut view = None;
    let mut search = String::new();
    let mut events_file = None;
    let mut watch = false;
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--agenda" => {
                let target_date = match args.next_if(|next| !next.starts_with("--")) {
                    Some(value) => parse_date(&value).ok_or(CliError::InvalidDate(value))?,
                    None => today,
                };
                agenda_date = Some(target_date);
            }
            "--week" => view = Some(ViewType::Week),
            "--month" => view = Some(ViewType::Month),
            "--search" => {
                search = args.next().ok_or(CliError::MissingValue("--search"))?;
            }
            "--events" => {
                let path = args.next().ok_or(CliError::MissingValue("--events"))?;
                events_file = Some(PathBuf::from(path));
            }
            "--watch" => watch = true,
            "--help" | "-h" => {
                return Ok(CliOptions {
                    mode: CliMode::Help,
                    events_file,
                });
            }
            _ => return Err(CliError::UnknownArgument(arg)),
        }
    }

    let mode = if watch {
        CliMode::Watch
    } else {
        CliMode::Agenda {
            date: agenda_date.unwrap_or(today),
            view,
            search,
        }
    };

    Ok(CliOptions { mode, events_file })
}

fn load_store(config: &Config, events_file: Option<PathBuf>) -> anyhow::Result<EventStore> {
    let path = events_file.unwrap_or_else(|| config.storage.events_file.clone());

    if !path.exists() {
        tracing::warn!("Events file {} not found, starting empty", path.display());
        return Ok(EventStore::new());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    EventStore::from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn run_agenda_mode(
    config: &Config,
    events_file: Option<PathBuf>,
    date: NaiveDate,
    view: ViewType,
    search: &str,
) -> anyhow::Result<()> {
    let store = load_store(config, events_file)?;

    let occurrences: Vec<Event> = store.list().iter().flat_map(occurrence_events).collect();
    let mut visible = filter_events(&occurrences, search, date, view);
    visible.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));

    let agenda = format_agenda_text(date, view, &visible, &occurrences);
    println!("{agenda}");
    Ok(())
}

fn format_agenda_text(date: NaiveDate, view: ViewType, events: &[&Event], pool: &[Event]) -> String {
    let mut lines = Vec::new();
    let heading = match view {
        ViewType::Week => format_week(date),
        ViewType::Month => format_month(date),
    };
    lines.push(format!("Agenda – {}", heading));

    let holidays = match view {
        ViewType::Week => {
            let week = week_dates(date);
            match (week.first(), week.last()) {
                (Some(start), Some(end)) => holidays_between(*start, *end),
                _ => Default::default(),
            }
        }
        ViewType::Month => holidays_for_month(date),
    };
    for (day, name) in holidays {
        lines.push(format!("  {} {}", day, name));
    }
    lines.push(String::new());

    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(event)));

            let conflicts: Vec<&str> = find_overlaps(*event, pool)
                .iter()
                .map(|other| other.title.as_str())
                .collect();
            if !conflicts.is_empty() {
                lines.push(format!("    overlaps with: {}", conflicts.join(", ")));
            }
        }
    }

    lines.join("\n")
}

fn build_agenda_line(event: &Event) -> String {
    let mut line = format!(
        "{} {}-{} {}",
        event.date, event.start_time, event.end_time, event.title
    );
    if let Some(minutes) = event.duration_minutes() {
        line.push_str(&format!(" ({} min)", minutes));
    }
    if !event.location.is_empty() {
        line.push_str(&format!(" @ {}", event.location));
    }
    if event.repeat.is_repeating() {
        line.push_str(" (repeats)");
    }
    line
}

pub async fn run_watch_mode(config: &Config, events_file: Option<PathBuf>) -> anyhow::Result<()> {
    let store = load_store(config, events_file)?;
    let events = Arc::new(RwLock::new(reminder_occurrences(store.list())));
    let (sender, mut receiver) = mpsc::channel(16);

    let interval = config.notifications.poll_interval();
    tracing::info!("Watching for reminders every {:?}", interval);
    let task = NotificationPoller::new(events, SystemClock, interval).spawn(sender);

    println!("Watching for reminders. Press Ctrl-C to stop.");
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Some(notification) => println!("[{}] {}", Local::now().format("%H:%M"), notification.message),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Some(center) = task.cancel(Duration::from_secs(1)).await {
        tracing::info!("Raised {} reminder(s) this session", center.notified_count());
    }
    Ok(())
}

pub fn to_io_error(error: anyhow::Error) -> io::Error {
    io::Error::other(format!("{error:#}"))
}
