//! The append-only report log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use verifuzz_common::{FuzzResult, InternalError};

/// Append-only log of fuzz-loop events, one line per event.
///
/// The file handle sits behind a mutex so there is exactly one writer no
/// matter who holds the log; nothing else is shared across iterations.
#[derive(Debug)]
pub struct ReportLog {
    file: Mutex<File>,
}

impl ReportLog {
    /// Opens (or creates) the log file in append mode.
    pub fn open(path: &Path) -> FuzzResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| InternalError::new(format!("cannot open {}: {e}", path.display())))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one line to the log.
    pub fn append(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}
