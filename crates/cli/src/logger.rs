//! Logger for the `topo` binary.
//!
//! Writes `timestamp level [target] message` lines to stderr, or appends
//! them to a file when one is given. Every line carries the run id so the
//! output of several replays can share one file.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

pub struct TopoLogger {
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
    run_id: String,
}

impl TopoLogger {
    /// Creates a logger writing to `path`, or to stderr without one.
    pub fn new(level: LevelFilter, path: Option<&Path>) -> Result<Self> {
        let sink: Box<dyn Write + Send> = match path {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    create_dir_all(dir).with_context(|| {
                        format!("Failed to create log directory: {}", dir.display())
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Box::new(file)
            }
            None => Box::new(io::stderr()),
        };

        Ok(Self {
            level,
            sink: Mutex::new(sink),
            run_id: Self::new_run_id(),
        })
    }

    /// `{timestamp}_{short uuid}`, unique per process.
    fn new_run_id() -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid = Uuid::new_v4().to_string();
        let short = uuid.split('-').next().unwrap_or("unknown");
        format!("{timestamp}_{short}")
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Installs the logger as the global `log` backend.
    pub fn init(level: LevelFilter, path: Option<&Path>) -> Result<()> {
        let logger = Self::new(level, path)?;
        let run_id = logger.run_id.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::debug!("topo logger initialized. Run ID: {}", run_id);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} {:<5} [{}] {}",
            timestamp,
            self.run_id,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for TopoLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        if let Ok(mut sink) = self.sink.lock() {
            // A failed log write must not abort a replay.
            let _ = writeln!(sink, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}
