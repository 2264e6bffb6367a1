// Bounded operational event log, newest entry first
use serde::Serialize;
use std::collections::VecDeque;

pub const EVENT_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Tracing level used when the event is mirrored to the service log.
    pub fn level(self) -> tracing::Level {
        match self {
            Severity::Info => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLogEntry {
    pub time: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<EventLogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    /// Record an event stamped with the local wall-clock time.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        self.push_entry(EventLogEntry {
            time,
            message: message.into(),
            severity,
        });
    }

    pub fn push_entry(&mut self, entry: EventLogEntry) {
        if self.entries.len() == EVENT_LOG_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&EventLogEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_severity_maps_to_tracing_level() {
        assert_eq!(Severity::Info.level(), tracing::Level::INFO);
        assert_eq!(Severity::Warning.level(), tracing::Level::WARN);
        assert_eq!(Severity::Error.level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_newest_entry_is_first() {
        let mut log = EventLog::new();
        log.push("first", Severity::Info);
        log.push("second", Severity::Warning);

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().message, "second");
        assert_eq!(log.iter().last().unwrap().message, "first");
    }

    #[test]
    fn test_oldest_entry_is_evicted_when_full() {
        let mut log = EventLog::new();
        for i in 0..12 {
            log.push(format!("event {i}"), Severity::Info);
        }

        let messages: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), EVENT_LOG_CAPACITY);
        assert_eq!(messages[0], "event 11");
        assert_eq!(messages[9], "event 2");
    }

    #[test]
    fn test_serializes_as_list_with_type_tag() {
        let mut log = EventLog::new();
        log.push_entry(EventLogEntry {
            time: "12:00:00".to_string(),
            message: "Invalid max power limit".to_string(),
            severity: Severity::Error,
        });

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["type"], "ERROR");
        assert_eq!(json[0]["time"], "12:00:00");
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(count in 0usize..64) {
            let mut log = EventLog::new();
            for i in 0..count {
                log.push(i.to_string(), Severity::Info);
                prop_assert!(log.len() <= EVENT_LOG_CAPACITY);
                prop_assert_eq!(&log.latest().unwrap().message, &i.to_string());
            }
            prop_assert_eq!(log.len(), count.min(EVENT_LOG_CAPACITY));
        }
    }
}
