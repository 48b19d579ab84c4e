//! Debug Signals
//!
//! A per-run bag of debug state that demos write into, plus a short history
//! of structured events. Each event is also logged as one JSON line on the
//! `signals` log target so a run can be checked by grepping the console:
//!
//! ```text
//! [INFO signals] {"event":"dash_started","t":3.21,"dashCount":1,"direction":"right"}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// How many events are kept in memory
pub const MAX_EVENTS: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct Signals {
    values: Map<String, Value>,
    events: Vec<Value>,
    /// Seconds since the scene started, stamped on every event
    time: f64,
    /// Log events as they are emitted
    log_events: bool,
}

impl Signals {
    pub fn new(log_events: bool) -> Self {
        Self {
            log_events,
            ..Self::default()
        }
    }

    /// Set a state value. Values that fail to serialize are stored as null.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Record an event. `payload` should serialize to a JSON object; its
    /// fields are merged next to `event` and `t`.
    pub fn emit<T: Serialize>(&mut self, event: &str, payload: T) {
        let mut record = Map::new();
        record.insert("event".to_string(), Value::from(event));
        record.insert("t".to_string(), Value::from((self.time * 1000.0).round() / 1000.0));

        match serde_json::to_value(payload) {
            Ok(Value::Object(fields)) => record.extend(fields),
            Ok(Value::Null) => {}
            Ok(other) => {
                record.insert("data".to_string(), other);
            }
            Err(e) => {
                log::warn!("signal '{}' payload not serializable: {}", event, e);
            }
        }

        let record = Value::Object(record);
        if self.log_events {
            log::info!(target: "signals", "{}", record);
        }

        if self.events.len() == MAX_EVENTS {
            self.events.remove(0);
        }
        self.events.push(record);
    }

    /// Record an event with no extra fields
    pub fn mark(&mut self, event: &str) {
        self.emit(event, Value::Null);
    }

    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// How many events with this name are still in the history
    pub fn count(&self, event: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.get("event").and_then(Value::as_str) == Some(event))
            .count()
    }

    pub fn last_event(&self) -> Option<&str> {
        self.events.last().and_then(|e| e.get("event")).and_then(Value::as_str)
    }

    /// Snapshot of the state values as a JSON object
    pub fn snapshot(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Forget everything (scene restart)
    pub fn clear(&mut self) {
        self.values.clear();
        self.events.clear();
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut signals = Signals::new(false);
        signals.set("health", 12);
        signals.set("isInvincible", false);
        assert_eq!(signals.get_i64("health"), Some(12));
        assert_eq!(signals.get_bool("isInvincible"), Some(false));
        signals.set("health", 11);
        assert_eq!(signals.snapshot(), json!({"health": 11, "isInvincible": false}));
    }

    #[test]
    fn test_emit_merges_payload() {
        let mut signals = Signals::new(false);
        signals.set_time(1.5);
        signals.emit("dash_started", json!({"dashCount": 1}));
        let ev = &signals.events()[0];
        assert_eq!(ev["event"], "dash_started");
        assert_eq!(ev["t"], 1.5);
        assert_eq!(ev["dashCount"], 1);
    }

    #[test]
    fn test_non_object_payload_goes_to_data() {
        let mut signals = Signals::new(false);
        signals.emit("score", 42);
        assert_eq!(signals.events()[0]["data"], 42);
        signals.mark("plain");
        assert!(signals.events()[1].get("data").is_none());
    }

    #[test]
    fn test_history_is_capped() {
        let mut signals = Signals::new(false);
        for i in 0..(MAX_EVENTS + 10) {
            signals.emit("tick", json!({ "i": i }));
        }
        assert_eq!(signals.events().len(), MAX_EVENTS);
        assert_eq!(signals.events()[0]["i"], 10);
        assert_eq!(signals.count("tick"), MAX_EVENTS);
        assert_eq!(signals.last_event(), Some("tick"));
    }

    #[test]
    fn test_clear() {
        let mut signals = Signals::new(false);
        signals.set("a", 1);
        signals.mark("b");
        signals.clear();
        assert!(signals.get("a").is_none());
        assert!(signals.events().is_empty());
    }
}
