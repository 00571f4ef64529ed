// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Warn => "warning",
            Level::Error => "error",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Record {
    pub level: Level,
    pub at: Duration,
    pub message: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{:>8.3}s] {}",
            self.level.label(),
            self.at.as_secs_f64(),
            self.message
        )
    }
}

#[derive(Debug)]
pub struct Diagnostics {
    started: Instant,
    records: Vec<Record>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            records: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warn, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        self.records.push(Record {
            level,
            at: self.started.elapsed(),
            message,
        });
    }

    /// Call only after the terminal has left the alternate screen; stderr
    /// written during raw mode lands in the middle of the animation.
    pub fn flush_to_stderr(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let mut err = std::io::stderr().lock();
        for r in self.records.drain(..) {
            let _ = writeln!(err, "{}", r);
        }
        let _ = err.flush();
    }
}

#[cfg(test)]
impl Diagnostics {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn count(&self, level: Level) -> usize {
        self.records.iter().filter(|r| r.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_kept_in_order_with_levels() {
        let mut d = Diagnostics::new();
        d.warn("first");
        d.error("second");
        d.warn("third");

        let msgs: Vec<&str> = d.records().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(msgs, ["first", "second", "third"]);
        assert_eq!(d.count(Level::Warn), 2);
        assert_eq!(d.count(Level::Error), 1);
    }

    #[test]
    fn record_display_starts_with_level_label() {
        let r = Record {
            level: Level::Warn,
            at: Duration::from_millis(1500),
            message: "no audio".to_string(),
        };
        let s = r.to_string();
        assert!(s.starts_with("warning: ["));
        assert!(s.ends_with("no audio"));
        assert!(s.contains("1.500s"));
    }
}
