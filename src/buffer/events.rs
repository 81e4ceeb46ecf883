// SPDX-License-Identifier: MIT
//! Change notification for buffer mutations.
//!
//! Each mutation fires a typed event (`Overwrite`, `Insert` or `Delete`)
//! followed by a generic `Change` event carrying the same payload, so an
//! observer interested in every edit subscribes once to `Change`.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::trace;

/// Kind of buffer mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Overwrite,
    Insert,
    Delete,
    Change,
}

impl ChangeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeKind::Overwrite => "overwrite",
            ChangeKind::Insert => "insert",
            ChangeKind::Delete => "delete",
            ChangeKind::Change => "change",
        }
    }
}

/// Payload delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub start_offset: usize,
    pub end_offset: usize,
    pub length: usize,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, start_offset: usize, end_offset: usize, length: usize) -> Self {
        Self {
            kind,
            start_offset,
            end_offset,
            length,
        }
    }

    fn with_kind(self, kind: ChangeKind) -> Self {
        Self { kind, ..self }
    }
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

enum Sink {
    Callback(Callback),
    Channel(mpsc::UnboundedSender<ChangeEvent>),
}

struct Subscription {
    id: SubscriptionId,
    kind: ChangeKind,
    sink: Sink,
}

/// Registry of listeners attached to one buffer
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: ChangeKind, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.push(kind, Sink::Callback(Box::new(callback)))
    }

    /// Subscribe through an unbounded channel.
    ///
    /// The subscription is dropped automatically once the receiver is gone.
    pub fn watch(&mut self, kind: ChangeKind) -> (SubscriptionId, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.push(kind, Sink::Channel(tx)), rx)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Fire `event` and then the generic `Change` event with the same payload.
    pub fn emit(&mut self, event: ChangeEvent) {
        if event.kind != ChangeKind::Change {
            self.dispatch(event);
        }
        self.dispatch(event.with_kind(ChangeKind::Change));
    }

    fn push(&mut self, kind: ChangeKind, sink: Sink) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription { id, kind, sink });
        id
    }

    fn dispatch(&mut self, event: ChangeEvent) {
        trace!(
            kind = event.kind.name(),
            start = event.start_offset,
            end = event.end_offset,
            length = event.length,
            "dispatching buffer event"
        );
        self.subscriptions.retain(|sub| {
            if sub.kind != event.kind {
                return true;
            }
            match &sub.sink {
                Sink::Callback(callback) => {
                    callback(&event);
                    true
                }
                Sink::Channel(tx) => tx.send(event).is_ok(),
            }
        });
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_emit_fires_typed_then_change() {
        let mut listeners = Listeners::new();
        let (_, mut typed) = listeners.watch(ChangeKind::Insert);
        let (_, mut change) = listeners.watch(ChangeKind::Change);

        listeners.emit(ChangeEvent::new(ChangeKind::Insert, 1, 2, 3));

        let ev = typed.try_recv().unwrap();
        assert_eq!(ev.kind, ChangeKind::Insert);
        assert_eq!((ev.start_offset, ev.end_offset, ev.length), (1, 2, 3));

        let ev = change.try_recv().unwrap();
        assert_eq!(ev.kind, ChangeKind::Change);
        assert_eq!((ev.start_offset, ev.end_offset, ev.length), (1, 2, 3));
    }

    #[test]
    fn test_change_event_is_not_doubled() {
        let mut listeners = Listeners::new();
        let (_, mut change) = listeners.watch(ChangeKind::Change);

        listeners.emit(ChangeEvent::new(ChangeKind::Change, 0, 4, 4));

        assert!(change.try_recv().is_ok());
        assert!(change.try_recv().is_err());
    }

    #[test]
    fn test_unsubscribe() {
        let mut listeners = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = listeners.subscribe(ChangeKind::Overwrite, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        listeners.emit(ChangeEvent::new(ChangeKind::Overwrite, 0, 1, 1));
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(ChangeEvent::new(ChangeKind::Overwrite, 0, 1, 1));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let mut listeners = Listeners::new();
        let (_, rx) = listeners.watch(ChangeKind::Change);
        assert_eq!(listeners.len(), 1);

        drop(rx);
        listeners.emit(ChangeEvent::new(ChangeKind::Delete, 0, 1, 0));
        assert!(listeners.is_empty());
    }
}
