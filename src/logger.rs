use std::fs;
use std::path::Path;

use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "planner.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the planner's global logger: coloured output on stderr and a plain copy in `logs/planner.log`.
///
/// stdout stays free for the schedule document. The level comes from `RUST_LOG` and
/// defaults to `info`; `debug` shows every site decision, `trace` every candidate site.
/// Without a writable log directory the planner keeps logging to stderr only.
pub fn init() {
    let level = std::env::var("RUST_LOG").ok().and_then(|level| level.parse().ok()).unwrap_or(LevelFilter::Info);
    let log_file = Path::new(LOG_DIR).join(LOG_FILE);

    let mut dispatch = Dispatch::new().level(level).chain(console());
    match file(&log_file) {
        Ok(file_dispatch) => dispatch = dispatch.chain(file_dispatch),
        Err(e) => eprintln!("Planner log file '{}' unavailable, logging to stderr only: {}", log_file.display(), e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Planner logger already installed: {}", e);
        return;
    }
    log::debug!("Planner logging at level {} to stderr and '{}'.", level, log_file.display());
}

fn console() -> Dispatch {
    let colors = ColoredLevelConfig::new().error(Color::Red).warn(Color::Yellow).info(Color::Green).debug(Color::Blue).trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr())
}

fn file(path: &Path) -> std::io::Result<Dispatch> {
    fs::create_dir_all(LOG_DIR)?;
    let file = fern::log_file(path)?;

    Ok(Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), record.level(), record.target(), message)))
        .chain(file))
}
