#![warn(missing_docs)]
//! Deterministic testing surfaces: tick-stepped worldtests, event logs and JSON reports.

mod micro_worldtest;
mod snapshot;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tilecraft_core::SimTick;

pub use micro_worldtest::*;
pub use snapshot::*;

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a, P: Serialize> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Short kind label.
    pub kind: &'a str,
    /// Event details.
    pub payload: &'a P,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
    written: u64,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        Ok(Self {
            file: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append an event to the log.
    pub fn write<P: Serialize>(&mut self, event: &EventRecord<'_, P>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "tilecraft-{}-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos(),
            name
        ))
    }

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = temp_path("events.jsonl");
        let mut sink = JsonlSink::create(&path).expect("sink create");
        let payload = serde_json::json!({ "col": 3, "row": 4 });
        sink.write(&EventRecord {
            tick: SimTick(1),
            kind: "mined",
            payload: &payload,
        })
        .expect("write succeeds");
        sink.write(&EventRecord {
            tick: SimTick(2),
            kind: "placed",
            payload: &payload,
        })
        .expect("write succeeds");
        assert_eq!(sink.written(), 2);
        sink.flush().expect("flush succeeds");

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], "mined");
        assert_eq!(first["tick"], 1);
        assert_eq!(first["payload"]["row"], 4);
    }
}
