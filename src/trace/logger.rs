use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

use tracing::warn;

use crate::trace::trace::ScanTraceEvent;

/// JSONL sink for [`ScanTraceEvent`]s, one line per event.
///
/// A trace that cannot be opened or written is reported through `tracing`
/// and dropped; it never fails the scan it describes.
pub struct TraceLogger {
    sink: Option<Mutex<BufWriter<File>>>,
}

impl TraceLogger {
    /// Append to `path`, creating it when missing.
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self { sink: Some(Mutex::new(BufWriter::new(file))) },
            Err(err) => {
                warn!("Trace disabled, cannot open '{}': {}", path, err);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &ScanTraceEvent) {
        let Some(sink) = &self.sink else { return };
        if let Err(err) = write_event(sink, event) {
            warn!("Dropped {} trace event: {}", event.phase, err);
        }
    }
}

fn write_event(sink: &Mutex<BufWriter<File>>, event: &ScanTraceEvent) -> io::Result<()> {
    let line = serde_json::to_string(event)?;
    let mut writer = sink.lock().map_err(|_| io::Error::other("trace sink poisoned"))?;
    writeln!(writer, "{}", line)?;
    writer.flush()
}
