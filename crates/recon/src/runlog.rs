//! The log-sink seam and the per-run log that ends up in a dated log sheet.

use chrono::{NaiveDate, NaiveDateTime};
use ctrlsync_engine::{CellAddr, CellValue};

use crate::error::ReconError;
use crate::grid::Grid;

/// Divider written between the per-item sections of a run.
pub const SEPARATOR: &str = "------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

pub trait LogSink {
    fn record(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.record(Level::Error, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    /// Text as written to the sheet, severity prefix included.
    pub text: String,
}

/// Ordered lines of one run, mirrored to the `log` facade as they arrive.
#[derive(Debug, Clone)]
pub struct RunLog {
    name: String,
    started: NaiveDateTime,
    lines: Vec<LogLine>,
}

impl RunLog {
    pub fn new(name: impl Into<String>, started: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            started,
            lines: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines.iter().filter(|l| l.level == level).count()
    }

    /// True when any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }

    pub fn header(&self) -> String {
        format!(
            "Logs generated for run \"{}\" at {}",
            self.name,
            self.started.format("%H:%M")
        )
    }

    /// Write the header into A1 and every line below it, in order.
    pub fn write_to<G: Grid + ?Sized>(&self, grid: &mut G, font_size: f32) -> Result<(), ReconError> {
        let a1 = CellAddr::new(0, 0);
        grid.set_value(a1, CellValue::text(self.header()))?;
        grid.set_font(a1, font_size, true);
        for line in &self.lines {
            grid.append_line(&line.text)?;
        }
        Ok(())
    }
}

impl LogSink for RunLog {
    fn record(&mut self, level: Level, message: &str) {
        let text = match level {
            Level::Info => {
                log::info!("{message}");
                message.to_string()
            }
            Level::Warn => {
                log::warn!("{message}");
                format!("WARNING: {message}")
            }
            Level::Error => {
                log::error!("{message}");
                format!("ERROR: {message}")
            }
        };
        self.lines.push(LogLine { level, text });
    }
}

/// Name of the log sheet for one action, e.g. `(7/3/2025) - Logs COMPARE for "Mapping"`.
pub fn sheet_name(date: NaiveDate, action: &str, subject: Option<&str>) -> String {
    let day = date.format("%-d/%-m/%Y");
    match subject {
        Some(subject) => format!("({day}) - Logs {action} for \"{subject}\""),
        None => format!("({day}) - Logs {action}"),
    }
}
