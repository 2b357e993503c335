//! In-memory sink for tests and embedding.
//!
//! [`ListSink`] appends every event it receives to a `Vec` behind a
//! `Mutex`. Order of the vector equals delivery order; concurrent
//! `receive` calls are serialized by the lock so no event is lost or
//! duplicated.

use std::sync::{Mutex, MutexGuard, PoisonError};

use plume_types::LogEvent;

use crate::error::SinkResult;
use crate::traits::Sink;

/// A [`Sink`] that records events in memory.
pub struct ListSink {
    name: String,
    events: Mutex<Vec<LogEvent>>,
}

impl ListSink {
    /// Create a new empty sink with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the events received so far, in delivery order.
    pub fn events(&self) -> Vec<LogEvent> {
        self.guard().clone()
    }

    /// Messages of the recorded events, in delivery order.
    pub fn messages(&self) -> Vec<String> {
        self.guard().iter().map(|e| e.message.clone()).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Returns `true` if no events are recorded.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.guard().clear();
    }

    /// Remove and return all recorded events.
    pub fn take(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.guard())
    }
}

impl Sink for ListSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, event: &LogEvent) -> SinkResult<()> {
        self.guard().push(event.clone());
        Ok(())
    }
}

impl std::fmt::Debug for ListSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListSink")
            .field("name", &self.name)
            .field("event_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_types::Level;
    use std::sync::Arc;
    use std::thread;

    fn event(message: &str) -> LogEvent {
        LogEvent::new("test", Level::Info, message)
    }

    #[test]
    fn records_in_delivery_order() {
        let sink = ListSink::new("List");
        sink.receive(&event("one")).unwrap();
        sink.receive(&event("two")).unwrap();
        sink.receive(&event("three")).unwrap();
        assert_eq!(sink.messages(), vec!["one", "two", "three"]);
    }

    #[test]
    fn clear_empties() {
        let sink = ListSink::new("List");
        sink.receive(&event("x")).unwrap();
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn take_drains() {
        let sink = ListSink::new("List");
        sink.receive(&event("a")).unwrap();
        let taken = sink.take();
        assert_eq!(taken.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn events_is_a_snapshot() {
        let sink = ListSink::new("List");
        sink.receive(&event("before")).unwrap();
        let snapshot = sink.events();
        sink.receive(&event("after")).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn concurrent_receive_loses_nothing() {
        let sink = Arc::new(ListSink::new("List"));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..100 {
                        sink.receive(&event(&format!("{t}-{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let mut messages = sink.messages();
        assert_eq!(messages.len(), 800);
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), 800);
    }

    #[test]
    fn per_thread_order_is_preserved() {
        let sink = Arc::new(ListSink::new("List"));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..50 {
                        sink.receive(&event(&format!("{t}:{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        for t in 0..4 {
            let prefix = format!("{t}:");
            let seq: Vec<usize> = sink
                .messages()
                .iter()
                .filter_map(|m| m.strip_prefix(&prefix).map(|n| n.parse().unwrap()))
                .collect();
            assert_eq!(seq, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn receive_recovers_from_poisoned_lock() {
        let sink = Arc::new(ListSink::new("List"));
        sink.receive(&event("before")).unwrap();

        let poisoner = Arc::clone(&sink);
        let result = thread::spawn(move || {
            let _held = poisoner.events.lock().unwrap();
            panic!("poison the event lock");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.events.is_poisoned());

        sink.receive(&event("after")).unwrap();
        assert_eq!(sink.messages(), vec!["before", "after"]);
    }

    #[test]
    fn debug_format() {
        let sink = ListSink::new("List");
        sink.receive(&event("x")).unwrap();
        let debug = format!("{sink:?}");
        assert!(debug.contains("ListSink"));
        assert!(debug.contains("event_count"));
    }
}
