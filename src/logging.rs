//! A minimal file-backed `log::Log` so diagnostics land in `harrier.log`
//! instead of mixing into the UCI stdout stream a GUI is parsing.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct FileLogger {
    file: Mutex<std::fs::File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut file = self.file.lock().unwrap();
        let _ = writeln!(file, "[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = self.file.lock().unwrap().flush();
    }
}

/// Installs the file logger at `harrier.log` in the working directory.
/// Safe to call more than once; only the first call takes effect.
pub fn init() {
    let Ok(file) = OpenOptions::new().create(true).append(true).open("harrier.log") else {
        return;
    };
    let logger = Box::new(FileLogger { file: Mutex::new(file) });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}
