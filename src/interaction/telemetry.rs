//! Session telemetry for range transitions and the committed choice.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use super::events::{ChoiceRangeChanged, ChoiceSelected};
use crate::core::plugin::FrameClock;

/// Rolling buffer of recent session records.
#[derive(Resource, Debug)]
pub struct SessionTelemetry {
    capacity: usize,
    records: VecDeque<SessionTelemetryRecord>,
}

impl SessionTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: SessionTelemetryRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn records(&self) -> impl Iterator<Item = &SessionTelemetryRecord> {
        self.records.iter()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionTelemetryRecord {
    pub occurred_at_seconds: f64,
    pub event: SessionTelemetryEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionTelemetryEvent {
    RangeEntered { index: usize },
    RangeLeft,
    ChoiceSelected { index: usize, label: String },
}

impl From<&ChoiceRangeChanged> for SessionTelemetryEvent {
    fn from(value: &ChoiceRangeChanged) -> Self {
        match value {
            ChoiceRangeChanged::Entered { index } => Self::RangeEntered { index: *index },
            ChoiceRangeChanged::Left => Self::RangeLeft,
        }
    }
}

pub fn record_interaction_telemetry(
    clock: Res<FrameClock>,
    mut telemetry: ResMut<SessionTelemetry>,
    mut log: ResMut<SessionTelemetryLog>,
    mut ranges: MessageReader<ChoiceRangeChanged>,
    mut selections: MessageReader<ChoiceSelected>,
) {
    let now = clock.elapsed_secs();

    let events = ranges
        .read()
        .map(SessionTelemetryEvent::from)
        .chain(selections.read().map(|selected| SessionTelemetryEvent::ChoiceSelected {
            index: selected.index,
            label: selected.label.clone(),
        }));

    for event in events {
        let record = SessionTelemetryRecord {
            occurred_at_seconds: now,
            event,
        };
        log.push(&record);
        telemetry.push(record);
    }
}

/// Pending records appended to a JSON lines file on flush.
#[derive(Resource, Debug)]
pub struct SessionTelemetryLog {
    output_path: PathBuf,
    pending: Vec<SessionTelemetryRecord>,
}

impl SessionTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &SessionTelemetryRecord) {
        self.pending.push(record.clone());
    }

    /// Appends every pending record to the log file.
    ///
    /// The batch is taken up front, so a failed write drops it instead of
    /// retrying it on every following frame.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.pending);

        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in batch {
            let serialisable: SerializableSessionRecord = record.into();
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

pub fn flush_session_telemetry(mut log: ResMut<SessionTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Dropped session telemetry batch for {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct SerializableSessionRecord {
    occurred_at_seconds: f64,
    event: SerializableSessionEvent,
}

impl From<SessionTelemetryRecord> for SerializableSessionRecord {
    fn from(value: SessionTelemetryRecord) -> Self {
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            event: value.event.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableSessionEvent {
    RangeEntered { choice_index: usize },
    RangeLeft,
    ChoiceSelected { choice_index: usize, label: String },
}

impl From<SessionTelemetryEvent> for SerializableSessionEvent {
    fn from(value: SessionTelemetryEvent) -> Self {
        match value {
            SessionTelemetryEvent::RangeEntered { index } => Self::RangeEntered {
                choice_index: index,
            },
            SessionTelemetryEvent::RangeLeft => Self::RangeLeft,
            SessionTelemetryEvent::ChoiceSelected { index, label } => Self::ChoiceSelected {
                choice_index: index,
                label,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn record(at: f64, event: SessionTelemetryEvent) -> SessionTelemetryRecord {
        SessionTelemetryRecord {
            occurred_at_seconds: at,
            event,
        }
    }

    #[test]
    fn telemetry_drops_old_records_when_full() {
        let mut telemetry = SessionTelemetry::new(2);
        telemetry.push(record(1.0, SessionTelemetryEvent::RangeEntered { index: 0 }));
        telemetry.push(record(2.0, SessionTelemetryEvent::RangeLeft));
        telemetry.push(record(3.0, SessionTelemetryEvent::RangeEntered { index: 1 }));

        assert_eq!(telemetry.len(), 2);
        assert!(telemetry
            .records()
            .all(|record| record.occurred_at_seconds >= 2.0));
    }

    #[test]
    fn range_messages_map_to_events() {
        assert_eq!(
            SessionTelemetryEvent::from(&ChoiceRangeChanged::Entered { index: 3 }),
            SessionTelemetryEvent::RangeEntered { index: 3 }
        );
        assert_eq!(
            SessionTelemetryEvent::from(&ChoiceRangeChanged::Left),
            SessionTelemetryEvent::RangeLeft
        );
    }

    #[test]
    fn telemetry_log_writes_json_lines() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir()
            .join(format!("rosefield_session_{}", unique_suffix))
            .join("session.jsonl");

        let mut log = SessionTelemetryLog::new(&path);
        log.push(&record(4.5, SessionTelemetryEvent::RangeEntered { index: 0 }));
        log.push(&record(
            6.0,
            SessionTelemetryEvent::ChoiceSelected {
                index: 0,
                label: "Yes".into(),
            },
        ));
        log.flush().expect("telemetry log should flush");
        assert!(log.is_empty());

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let entered: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(entered["event"]["event_type"], "range_entered");
        assert_eq!(entered["event"]["choice_index"], 0);

        let selected: Value = serde_json::from_str(lines[1]).expect("json line should parse");
        assert_eq!(selected["occurred_at_seconds"], 6.0);
        assert_eq!(selected["event"]["event_type"], "choice_selected");
        assert_eq!(selected["event"]["label"], "Yes");

        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn failed_flush_drops_the_batch() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let blocker = env::temp_dir().join(format!("rosefield_blocker_{}", unique_suffix));
        fs::write(&blocker, b"not a directory").expect("blocker file should be written");

        let mut log = SessionTelemetryLog::new(blocker.join("session.jsonl"));
        log.push(&record(1.0, SessionTelemetryEvent::RangeLeft));

        assert!(log.flush().is_err());
        assert!(log.is_empty());
        // Nothing left to retry, so the next frame stays quiet.
        assert!(log.flush().is_ok());

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn empty_flush_creates_nothing() {
        let path = env::temp_dir().join("rosefield_never_written").join("session.jsonl");
        let mut log = SessionTelemetryLog::new(&path);
        log.flush().expect("empty flush is a no-op");
        assert!(!path.exists());
    }
}
