use std::io;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use event_planner::storage::Config;

mod cli;
use cli::{CliMode, USAGE, parse_cli_mode, run_agenda_mode, run_watch_mode, to_io_error};

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    setup_logging();

    let today = Local::now().date_naive();
    let options = match parse_cli_mode(std::env::args().skip(1), today) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Falling back to default config: {}", e);
            Config::default()
        }
    };

    match options.mode {
        CliMode::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliMode::Agenda { date, view, search } => {
            let view = view.unwrap_or(config.ui.default_view);
            run_agenda_mode(&config, options.events_file, date, view, &search).map_err(to_io_error)
        }
        CliMode::Watch => run_watch_mode(&config, options.events_file)
            .await
            .map_err(to_io_error),
    }
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "event-planner.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("event-planner started");
}
