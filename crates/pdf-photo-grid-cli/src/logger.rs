use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Console logger: progress to stdout, warnings and errors to stderr
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S");
        let tag = match record.level() {
            Level::Error => "[X]",
            Level::Warn => "[!]",
            Level::Info => "[*]",
            Level::Debug | Level::Trace => "[.]",
        };

        // Console write failures are ignored
        if record.level() <= Level::Warn {
            let _ = writeln!(std::io::stderr(), "{} {} {}", timestamp, tag, record.args());
        } else {
            let _ = writeln!(std::io::stdout(), "{} {} {}", timestamp, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}
