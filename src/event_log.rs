//! Evaluation event log (v0.1)
//!
//! Records what the engine did and why:
//! - Event: envelope with id + timestamp + kind
//! - EventKind: input changes, invalidation, recompute/reuse, rule failures
//! - EventLog: thread-safe, append-only log shared by handle

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Single event in the evaluation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    /// Time since the log was created (ms)
    pub timestamp_ms: u64,
    /// Event type and data
    pub kind: EventKind,
}

/// All possible event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// An input received a new value
    InputSet { node: Arc<str>, version: u64 },
    /// A derived node was marked stale
    NodeInvalidated { node: Arc<str> },
    /// The rule ran; `changed` is false when it produced an equal value
    NodeRecomputed {
        node: Arc<str>,
        changed: bool,
        version: u64,
    },
    /// Dependencies came back unchanged, the cached value was kept
    NodeReused { node: Arc<str> },
    RuleFailed { node: Arc<str>, error: String },
}

impl EventKind {
    pub fn node(&self) -> &str {
        match self {
            Self::InputSet { node, .. }
            | Self::NodeInvalidated { node }
            | Self::NodeRecomputed { node, .. }
            | Self::NodeReused { node }
            | Self::RuleFailed { node, .. } => node,
        }
    }

    pub fn is_recompute(&self) -> bool {
        matches!(self, Self::NodeRecomputed { .. } | Self::RuleFailed { .. })
    }
}

/// Thread-safe, append-only event log
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<Vec<Event>>>,
    start_time: Instant,
    next_id: Arc<AtomicU64>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            start_time: Instant::now(),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event (thread-safe, returns event ID)
    pub fn emit(&self, kind: EventKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            kind,
        };

        self.events.write().push(event);
        id
    }

    /// Get all events (cloned)
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Filter events by node id
    pub fn filter_node(&self, node: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.node() == node)
            .collect()
    }

    /// Ids of nodes whose rule ran, in evaluation order
    pub fn recomputed_nodes(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter(|e| e.kind.is_recompute())
            .map(|e| e.kind.node().to_string())
            .collect()
    }

    /// Drop recorded events; ids keep increasing
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Serialize to JSON for persistence/debugging
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self.events()).unwrap_or(JsonValue::Null)
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .finish()
    }
}
